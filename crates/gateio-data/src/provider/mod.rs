//! 데이터 소스 Provider trait 정의.
//!
//! 심볼 목록 조회와 과거 캔들 조회를 분리된 trait으로 제공하여
//! 수집 엔진이 구체 구현(REST, mock)에 의존하지 않도록 합니다.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{Kline, Timeframe};

pub mod gateio;
pub mod udf;

pub use gateio::{CurrencyPair, GateioSymbolSource};
pub use udf::UdfHistoryProvider;

/// 거래소 심볼 목록 소스.
///
/// 목록 조회는 런 시작 시 1회만 호출되는 preflight 단계이며,
/// 실패 시 재시도 없이 에러를 반환합니다.
#[async_trait]
pub trait SymbolSource: Send + Sync {
    /// 전체 통화쌍 목록 조회.
    async fn list_pairs(&self) -> Result<Vec<CurrencyPair>>;
}

/// 과거 캔들 데이터 제공자.
#[async_trait]
pub trait HistoricalDataProvider: Send + Sync {
    /// 캔들스틱 데이터 조회.
    ///
    /// # 인자
    /// * `symbol` - 정규화된 심볼 (예: "BTCUSDT")
    /// * `timeframe` - 타임프레임
    /// * `limit` - 최대 캔들 개수
    ///
    /// 데이터가 없는 심볼은 에러가 아닌 빈 Vec을 반환합니다.
    async fn get_klines(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        limit: usize,
    ) -> Result<Vec<Kline>>;
}
