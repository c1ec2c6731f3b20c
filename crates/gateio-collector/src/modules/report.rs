//! 런 요약 리포트 모듈.
//!
//! 통계를 읽기만 하며 수집 상태를 변경하지 않습니다. 산출물:
//! - 실패가 있는 타임프레임별 `_failed_symbols_<suffix>.txt` (전체 목록)
//! - 출력 루트의 런 요약 텍스트 파일 (실패 목록은 앞 10개만 표시)
//!
//! 두 파일 모두 런마다 덮어씁니다.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use chrono::Utc;
use tracing::info;

use gateio_data::CsvBarStore;

use crate::stats::RunStats;
use crate::{CollectorConfig, Result};

/// 요약 파일 이름.
const SUMMARY_FILE: &str = "gateio_collection_summary.txt";

/// 요약에 표시할 실패 심볼 최대 개수 (전체 목록은 별도 파일에).
const FAILED_DISPLAY_LIMIT: usize = 10;

/// 런 요약을 로그로 남기고 요약/실패 목록 파일을 기록.
pub fn write_report(
    stats: &RunStats,
    symbol_count: usize,
    config: &CollectorConfig,
    store: &CsvBarStore,
) -> Result<PathBuf> {
    // 타임프레임별 요약 로그 + 실패 심볼 파일
    for (tf, tf_stats) in stats.iter() {
        info!(
            timeframe = %tf,
            successful = tf_stats.successful,
            failed = tf_stats.failed.len(),
            success_rate = format!("{:.1}%", tf_stats.success_rate()),
            dir = %store.timeframe_dir(tf).display(),
            "타임프레임 결과"
        );

        if tf_stats.failed.is_empty() {
            continue;
        }

        let failed_path = store
            .timeframe_dir(tf)
            .join(format!("_failed_symbols_{}.txt", tf.suffix()));
        let mut writer = BufWriter::new(File::create(&failed_path)?);
        for symbol in &tf_stats.failed {
            writeln!(writer, "{}", symbol)?;
        }
        writer.flush()?;

        info!(timeframe = %tf, path = %failed_path.display(), "실패 심볼 목록 저장");
    }

    info!(
        total_successful = stats.total_successful(),
        total_failed = stats.total_failed(),
        overall_success_rate = format!("{:.1}%", stats.overall_success_rate()),
        "전체 요약"
    );

    // 런 요약 파일
    let summary_path = store.root().join(SUMMARY_FILE);
    let mut writer = BufWriter::new(File::create(&summary_path)?);

    writeln!(
        writer,
        "Gate.io Collection Summary - {}",
        Utc::now().format("%Y-%m-%d %H:%M:%S")
    )?;
    writeln!(writer, "{}", "=".repeat(70))?;
    writeln!(writer)?;
    writeln!(writer, "Exchange: {}", config.chart_exchange)?;
    writeln!(writer, "Total symbols: {}", symbol_count)?;
    writeln!(
        writer,
        "Timeframes: {}",
        config
            .timeframes
            .iter()
            .map(|tf| tf.suffix())
            .collect::<Vec<_>>()
            .join(", ")
    )?;
    writeln!(writer, "Bars per symbol: {}", config.n_bars)?;

    for (tf, tf_stats) in stats.iter() {
        writeln!(writer)?;
        writeln!(writer, "{} Timeframe:", tf.suffix().to_uppercase())?;
        writeln!(writer, "  Successful: {}", tf_stats.successful)?;
        writeln!(writer, "  Failed: {}", tf_stats.failed.len())?;
        writeln!(
            writer,
            "  Success rate: {:.1}%",
            tf_stats.success_rate()
        )?;

        if !tf_stats.failed.is_empty() {
            let shown = tf_stats
                .failed
                .iter()
                .take(FAILED_DISPLAY_LIMIT)
                .map(String::as_str)
                .collect::<Vec<_>>()
                .join(", ");
            if tf_stats.failed.len() > FAILED_DISPLAY_LIMIT {
                writeln!(
                    writer,
                    "  Failed symbols: {} ... and {} more",
                    shown,
                    tf_stats.failed.len() - FAILED_DISPLAY_LIMIT
                )?;
            } else {
                writeln!(writer, "  Failed symbols: {}", shown)?;
            }
        }
    }

    writeln!(writer)?;
    writeln!(writer, "Overall:")?;
    writeln!(writer, "  Total successful: {}", stats.total_successful())?;
    writeln!(writer, "  Total failed: {}", stats.total_failed())?;
    writeln!(
        writer,
        "  Overall success rate: {:.1}%",
        stats.overall_success_rate()
    )?;
    writeln!(
        writer,
        "  Elapsed: {:.1}s",
        stats.elapsed.as_secs_f64()
    )?;
    writer.flush()?;

    info!(path = %summary_path.display(), "런 요약 저장");
    Ok(summary_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use gateio_data::Timeframe;

    fn test_config(timeframes: Vec<Timeframe>) -> CollectorConfig {
        CollectorConfig {
            timeframes,
            ..Default::default()
        }
    }

    #[test]
    fn test_failed_symbols_file_content() {
        let dir = tempfile::tempdir().unwrap();
        let store = CsvBarStore::new(dir.path());
        let config = test_config(vec![Timeframe::D1]);
        store.ensure_dirs(&config.timeframes).unwrap();

        let mut stats = RunStats::new(&config.timeframes);
        stats.record_success(Timeframe::D1);
        stats.record_failure(Timeframe::D1, "XUSDT");

        write_report(&stats, 2, &config, &store).unwrap();

        let failed_path = store
            .timeframe_dir(Timeframe::D1)
            .join("_failed_symbols_1d.txt");
        let content = std::fs::read_to_string(failed_path).unwrap();
        assert_eq!(content, "XUSDT\n");
    }

    #[test]
    fn test_no_failed_file_without_failures() {
        let dir = tempfile::tempdir().unwrap();
        let store = CsvBarStore::new(dir.path());
        let config = test_config(vec![Timeframe::H1]);
        store.ensure_dirs(&config.timeframes).unwrap();

        let mut stats = RunStats::new(&config.timeframes);
        stats.record_success(Timeframe::H1);

        write_report(&stats, 1, &config, &store).unwrap();

        let failed_path = store
            .timeframe_dir(Timeframe::H1)
            .join("_failed_symbols_1h.txt");
        assert!(!failed_path.exists());
    }

    #[test]
    fn test_summary_truncates_long_failed_list() {
        let dir = tempfile::tempdir().unwrap();
        let store = CsvBarStore::new(dir.path());
        let config = test_config(vec![Timeframe::M1]);
        store.ensure_dirs(&config.timeframes).unwrap();

        let mut stats = RunStats::new(&config.timeframes);
        for i in 0..12 {
            stats.record_failure(Timeframe::M1, &format!("SYM{:02}USDT", i));
        }

        let summary_path = write_report(&stats, 12, &config, &store).unwrap();
        let content = std::fs::read_to_string(summary_path).unwrap();

        assert!(content.contains("and 2 more"));
        assert!(content.contains("SYM00USDT"));
        assert!(!content.contains("SYM11USDT"));

        // 전체 목록은 실패 파일에 있음
        let failed = std::fs::read_to_string(
            store
                .timeframe_dir(Timeframe::M1)
                .join("_failed_symbols_1m.txt"),
        )
        .unwrap();
        assert_eq!(failed.lines().count(), 12);
        assert!(failed.contains("SYM11USDT"));
    }

    #[test]
    fn test_summary_overwritten_each_run() {
        let dir = tempfile::tempdir().unwrap();
        let store = CsvBarStore::new(dir.path());
        let config = test_config(vec![Timeframe::D1]);
        store.ensure_dirs(&config.timeframes).unwrap();

        let mut first = RunStats::new(&config.timeframes);
        first.record_failure(Timeframe::D1, "XUSDT");
        write_report(&first, 1, &config, &store).unwrap();

        let mut second = RunStats::new(&config.timeframes);
        second.record_success(Timeframe::D1);
        let path = write_report(&second, 1, &config, &store).unwrap();

        let content = std::fs::read_to_string(path).unwrap();
        assert!(!content.contains("XUSDT"));
        assert!(content.contains("Total successful: 1"));
    }
}
