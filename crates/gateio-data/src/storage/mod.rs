//! 수집 결과 저장소.

pub mod csv;

pub use csv::CsvBarStore;

use crate::error::Result;
use crate::types::{Kline, Timeframe};

/// 심볼/타임프레임별 캔들 저장소.
///
/// `exists`는 재실행 시 중복 수집을 막는 유일한 장치입니다.
/// 성공적으로 `write`된 항목만 존재하는 것으로 판별되어야 합니다.
pub trait BarStore: Send + Sync {
    /// 해당 (심볼, 타임프레임)의 산출물이 이미 존재하는지 확인.
    fn exists(&self, symbol: &str, timeframe: Timeframe) -> bool;

    /// 캔들 데이터를 산출물로 기록. 성공 시 정확히 1개 파일 생성.
    fn write(&self, symbol: &str, timeframe: Timeframe, klines: &[Kline]) -> Result<()>;
}
