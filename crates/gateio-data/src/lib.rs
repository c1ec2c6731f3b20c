//! 시장 데이터 타입, Provider, 저장소.
//!
//! 이 crate는 다음을 제공합니다:
//! - 공용 타입 (`Timeframe`, `Kline`)
//! - 심볼 목록 / 차트 과거 데이터 Provider trait과 Gate.io 구현
//! - 타임프레임별 CSV 파일 저장소

pub mod error;
pub mod provider;
pub mod storage;
pub mod types;

pub use error::{DataError, Result};
pub use types::{Kline, Timeframe};

// Provider 재내보내기
pub use provider::{
    CurrencyPair, GateioSymbolSource, HistoricalDataProvider, SymbolSource, UdfHistoryProvider,
};

// 저장소 재내보내기
pub use storage::{BarStore, CsvBarStore};
