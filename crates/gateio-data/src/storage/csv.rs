//! 타임프레임별 CSV 파일 저장소.
//!
//! 산출물 배치:
//!
//! ```text
//! <root>/data_gateio_1m/BTCUSDT_1m.csv
//! <root>/data_gateio_1d/BTCUSDT_1d.csv
//! ```

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::Result;
use crate::storage::BarStore;
use crate::types::{Kline, Timeframe};

/// CSV 캔들 저장소.
pub struct CsvBarStore {
    root: PathBuf,
}

impl CsvBarStore {
    /// 출력 루트 디렉터리 기준으로 생성.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// 타임프레임별 데이터 디렉터리 경로.
    pub fn timeframe_dir(&self, timeframe: Timeframe) -> PathBuf {
        self.root.join(format!("data_gateio_{}", timeframe.suffix()))
    }

    /// (심볼, 타임프레임) 산출물 파일 경로.
    pub fn output_path(&self, symbol: &str, timeframe: Timeframe) -> PathBuf {
        self.timeframe_dir(timeframe)
            .join(format!("{}_{}.csv", symbol, timeframe.suffix()))
    }

    /// 출력 루트.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// 모든 타임프레임 디렉터리를 미리 생성.
    pub fn ensure_dirs(&self, timeframes: &[Timeframe]) -> Result<()> {
        for tf in timeframes {
            std::fs::create_dir_all(self.timeframe_dir(*tf))?;
        }
        Ok(())
    }
}

impl BarStore for CsvBarStore {
    fn exists(&self, symbol: &str, timeframe: Timeframe) -> bool {
        self.output_path(symbol, timeframe).exists()
    }

    fn write(&self, symbol: &str, timeframe: Timeframe, klines: &[Kline]) -> Result<()> {
        let path = self.output_path(symbol, timeframe);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = File::create(&path)?;
        let mut writer = BufWriter::new(file);

        writeln!(writer, "datetime,symbol,open,high,low,close,volume")?;
        for kline in klines {
            writeln!(
                writer,
                "{},{},{},{},{},{},{}",
                kline.open_time.format("%Y-%m-%d %H:%M:%S"),
                symbol,
                kline.open,
                kline.high,
                kline.low,
                kline.close,
                kline.volume
            )?;
        }
        writer.flush()?;

        info!(symbol, %timeframe, bars = klines.len(), path = %path.display(), "CSV 저장 완료");
        Ok(())
    }
}
