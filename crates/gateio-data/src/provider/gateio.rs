//! Gate.io 심볼 목록 소스.
//!
//! `/api/v4/spot/currency_pairs` 엔드포인트에서 전체 현물 통화쌍을
//! 조회합니다. 응답은 통화쌍 배열이며 거래 가능 여부는 `trade_status`
//! 필드로 판별합니다.

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

use crate::error::{DataError, Result};
use crate::provider::SymbolSource;

/// Gate.io REST API 기본 URL.
pub const DEFAULT_API_URL: &str = "https://api.gateio.ws";

/// 현물 통화쌍 엔드포인트 경로.
const CURRENCY_PAIRS_PATH: &str = "/api/v4/spot/currency_pairs";

/// Gate.io 통화쌍 목록 레코드.
#[derive(Debug, Clone, Deserialize)]
pub struct CurrencyPair {
    /// 통화쌍 ID (예: "10SET_USDT")
    pub id: String,
    /// 기준 통화 (예: "10SET")
    #[serde(default)]
    pub base: String,
    /// 호가 통화 (예: "USDT")
    #[serde(default)]
    pub quote: String,
    /// 거래 상태 ("tradable", "untradable", "sellable" 등)
    #[serde(default)]
    pub trade_status: String,
}

impl CurrencyPair {
    /// 거래 가능 여부.
    pub fn is_tradable(&self) -> bool {
        self.trade_status == "tradable"
    }
}

/// Gate.io 심볼 목록 소스.
pub struct GateioSymbolSource {
    client: reqwest::Client,
    base_url: String,
}

impl GateioSymbolSource {
    /// 기본 API URL로 생성.
    pub fn new(timeout: Duration) -> Result<Self> {
        Self::with_base_url(DEFAULT_API_URL, timeout)
    }

    /// 임의의 base URL로 생성 (테스트/프록시용).
    pub fn with_base_url(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DataError::Network(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl SymbolSource for GateioSymbolSource {
    async fn list_pairs(&self) -> Result<Vec<CurrencyPair>> {
        let url = format!("{}{}", self.base_url, CURRENCY_PAIRS_PATH);

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(DataError::Api(format!(
                "currency_pairs returned HTTP {}",
                status
            )));
        }

        // Gate.io는 배열을 그대로 반환; 다른 형태는 파싱 에러로 처리
        let pairs: Vec<CurrencyPair> = response
            .json()
            .await
            .map_err(|e| DataError::Parse(format!("unexpected currency_pairs shape: {}", e)))?;

        tracing::debug!(count = pairs.len(), "Gate.io 통화쌍 조회 완료");
        Ok(pairs)
    }
}
