//! 에러 타입 정의.

use thiserror::Error;

use gateio_data::DataError;

/// Collector 에러 타입.
#[derive(Debug, Error)]
pub enum CollectorError {
    /// 설정 에러
    #[error("Configuration error: {0}")]
    Config(String),

    /// 데이터 소스 에러 (심볼 목록, 차트 API)
    #[error("Data source error: {0}")]
    Source(#[from] DataError),

    /// 수집할 심볼이 하나도 없음 (preflight 실패)
    #[error("No symbols to collect")]
    NoSymbols,

    /// 리포트/산출물 쓰기 에러
    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),
}

/// Result 타입 별칭.
pub type Result<T> = std::result::Result<T, CollectorError>;
