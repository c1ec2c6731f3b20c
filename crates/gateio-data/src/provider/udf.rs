//! UDF 형식 차트 과거 데이터 제공자.
//!
//! TradingView UDF 호환 `/history` 엔드포인트에서 캔들 데이터를
//! 조회합니다. 응답은 병렬 배열 형식입니다:
//!
//! ```text
//! { "s": "ok", "t": [...], "o": [...], "h": [...], "l": [...], "c": [...], "v": [...] }
//! ```
//!
//! `s == "no_data"`는 에러가 아니라 "해당 심볼에 히스토리 없음"이며
//! 빈 Vec으로 반환됩니다.

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use crate::error::{DataError, Result};
use crate::provider::HistoricalDataProvider;
use crate::types::{Kline, Timeframe};

/// UDF history 응답 구조.
#[derive(Debug, Deserialize)]
struct UdfHistoryResponse {
    /// 상태: "ok" | "no_data" | "error"
    s: String,
    /// 에러 메시지 (s == "error"일 때)
    #[serde(default)]
    errmsg: Option<String>,
    /// 캔들 시작 시간 (unix epoch 초)
    #[serde(default)]
    t: Vec<i64>,
    #[serde(default)]
    o: Vec<f64>,
    #[serde(default)]
    h: Vec<f64>,
    #[serde(default)]
    l: Vec<f64>,
    #[serde(default)]
    c: Vec<f64>,
    #[serde(default)]
    v: Vec<f64>,
}

/// UDF 차트 과거 데이터 제공자.
pub struct UdfHistoryProvider {
    client: reqwest::Client,
    base_url: String,
    /// UDF 심볼 접두사로 쓰이는 거래소 코드 (예: "GATEIO")
    exchange: String,
}

impl UdfHistoryProvider {
    /// 새로운 제공자 생성.
    ///
    /// `timeout`은 업스트림 호출 자체의 상한이며, 재시도 정책과는
    /// 별개입니다.
    pub fn new(base_url: &str, exchange: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DataError::Network(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            exchange: exchange.to_string(),
        })
    }

    fn to_decimal(value: f64, field: &str) -> Result<Decimal> {
        Decimal::from_f64_retain(value)
            .ok_or_else(|| DataError::Parse(format!("invalid {} value: {}", field, value)))
    }
}

#[async_trait]
impl HistoricalDataProvider for UdfHistoryProvider {
    async fn get_klines(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        limit: usize,
    ) -> Result<Vec<Kline>> {
        let url = format!("{}/history", self.base_url);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("symbol", format!("{}:{}", self.exchange, symbol)),
                ("resolution", timeframe.to_resolution().to_string()),
                ("countback", limit.to_string()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(DataError::Api(format!("history returned HTTP {}", status)));
        }

        let body: UdfHistoryResponse = response
            .json()
            .await
            .map_err(|e| DataError::Parse(format!("unexpected history shape: {}", e)))?;

        match body.s.as_str() {
            "ok" => {}
            "no_data" => {
                debug!(symbol, %timeframe, "업스트림 데이터 없음");
                return Ok(Vec::new());
            }
            "error" => {
                return Err(DataError::Api(
                    body.errmsg.unwrap_or_else(|| "unknown upstream error".to_string()),
                ));
            }
            other => {
                return Err(DataError::Parse(format!("unknown status: {}", other)));
            }
        }

        let n = body.t.len();
        if body.o.len() != n
            || body.h.len() != n
            || body.l.len() != n
            || body.c.len() != n
            || body.v.len() != n
        {
            return Err(DataError::Parse(
                "history arrays have mismatched lengths".to_string(),
            ));
        }

        let mut klines = Vec::with_capacity(n);
        for i in 0..n {
            let open_time = Utc
                .timestamp_opt(body.t[i], 0)
                .single()
                .ok_or_else(|| DataError::Parse(format!("invalid timestamp: {}", body.t[i])))?;

            klines.push(Kline {
                open_time,
                open: Self::to_decimal(body.o[i], "open")?,
                high: Self::to_decimal(body.h[i], "high")?,
                low: Self::to_decimal(body.l[i], "low")?,
                close: Self::to_decimal(body.c[i], "close")?,
                volume: Self::to_decimal(body.v[i], "volume")?,
            });
        }

        debug!(symbol, %timeframe, count = klines.len(), "캔들 조회 완료");
        Ok(klines)
    }
}
