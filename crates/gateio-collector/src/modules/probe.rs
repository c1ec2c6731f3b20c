//! 심볼 형식 진단 모듈.
//!
//! 본 수집을 돌리기 전에, 거래소 네이티브 통화쌍 ID가 업스트림
//! 차트 API에서 어떤 형식으로 조회되는지 확인하는 용도입니다.
//! 변형별로 3개 캔들만 요청하며 재시도는 하지 않습니다.

use tracing::{info, warn};

use gateio_data::{HistoricalDataProvider, Timeframe};

use crate::ratelimit::RateLimiter;

/// 변형당 요청하는 캔들 수.
const PROBE_BARS: usize = 3;

/// 한 형식 변형의 진단 결과.
#[derive(Debug, Clone)]
pub struct ProbeResult {
    /// 시도한 심볼 형식
    pub variant: String,
    /// 수신한 캔들 수 (None = 에러 또는 데이터 없음)
    pub bars: Option<usize>,
}

impl ProbeResult {
    /// 업스트림이 이 형식을 인식했는지 여부.
    pub fn works(&self) -> bool {
        self.bars.is_some_and(|n| n > 0)
    }
}

/// 네이티브 통화쌍 ID의 후보 형식 변형.
///
/// 예: "10SET_USDT" → ["10SETUSDT", "10SET_USDT", "10SET/USDT"]
pub fn candidate_variants(raw_pair: &str) -> Vec<String> {
    let upper = raw_pair.to_uppercase();
    let mut variants = vec![
        upper.replace('_', ""),
        upper.clone(),
        upper.replace('_', "/"),
    ];
    variants.dedup();
    variants
}

/// 각 변형을 업스트림에 시도하고 결과를 수집.
pub async fn probe_formats(
    provider: &dyn HistoricalDataProvider,
    limiter: &RateLimiter,
    raw_pair: &str,
) -> Vec<ProbeResult> {
    let mut results = Vec::new();

    for variant in candidate_variants(raw_pair) {
        limiter.acquire().await;

        let bars = match provider
            .get_klines(&variant, Timeframe::D1, PROBE_BARS)
            .await
        {
            Ok(klines) if !klines.is_empty() => {
                info!(variant = %variant, bars = klines.len(), "형식 인식됨");
                Some(klines.len())
            }
            Ok(_) => {
                info!(variant = %variant, "데이터 없음");
                None
            }
            Err(e) => {
                warn!(variant = %variant, error = %e, "조회 실패");
                None
            }
        };

        results.push(ProbeResult { variant, bars });
    }

    results
}
