//! Gate.io 현물 전체 심볼의 과거 OHLCV 일괄 수집기.
//!
//! 이 crate는 배치 수집 엔진을 제공합니다:
//! - 심볼 목록 정규화 (tradable 필터, quote 허용 목록, 수동 매핑)
//! - 초당 요청 수 제한 + 랜덤 지터 (sliding window)
//! - 지수 백오프 재시도
//! - 재실행 시 기존 산출물 건너뛰기 (resumable)
//! - 런 단위 통계와 요약 리포트

pub mod config;
pub mod error;
pub mod fetch;
pub mod modules;
pub mod ratelimit;
pub mod stats;

pub use config::CollectorConfig;
pub use error::{CollectorError, Result};
pub use fetch::{backoff_delay, fetch_with_retry, FetchOutcome, RetryPolicy};
pub use ratelimit::RateLimiter;
pub use stats::{RunStats, TimeframeStats};
