//! OHLCV 수집 계획/실행 모듈.
//!
//! 계획 단계는 심볼 × 타임프레임 전체 행렬에서 이미 산출물이 있는
//! 항목을 제외하고, 제외된 항목은 즉시 성공으로 계상합니다. 덕분에
//! 중단된 런을 그대로 다시 실행하면 남은 항목만 수집됩니다.

use std::time::Instant;

use tracing::{error, info, warn};

use gateio_data::{BarStore, HistoricalDataProvider, Timeframe};

use crate::fetch::{fetch_with_retry, FetchOutcome, RetryPolicy};
use crate::ratelimit::RateLimiter;
use crate::stats::RunStats;
use crate::{CollectorConfig, Result};

/// 수집 단위: (심볼, 타임프레임) 쌍.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkItem {
    pub symbol: String,
    pub timeframe: Timeframe,
}

/// 수집 계획 수립.
///
/// 심볼 우선(major) 순서로 전체 교차 곱을 만들되, `store.exists`가
/// 참인 항목은 계획에서 제외하고 성공으로 기록합니다. 순서는 입력
/// 심볼 순서와 설정된 타임프레임 순서를 그대로 따릅니다.
pub fn plan(
    symbols: &[String],
    timeframes: &[Timeframe],
    store: &dyn BarStore,
    stats: &mut RunStats,
) -> Vec<WorkItem> {
    let mut items = Vec::new();

    for symbol in symbols {
        for tf in timeframes {
            if store.exists(symbol, *tf) {
                stats.record_success(*tf);
                continue;
            }
            items.push(WorkItem {
                symbol: symbol.clone(),
                timeframe: *tf,
            });
        }
    }

    items
}

/// OHLCV 데이터 수집 실행.
///
/// 계획된 항목을 순차 처리합니다. 항목 하나의 실패는 기록만 하고
/// 다음 항목으로 진행하며, 항목 간에 재시도 예산을 공유하지 않습니다.
pub async fn collect_ohlcv(
    provider: &dyn HistoricalDataProvider,
    store: &dyn BarStore,
    limiter: &RateLimiter,
    config: &CollectorConfig,
    symbols: &[String],
) -> Result<RunStats> {
    let start = Instant::now();
    let mut stats = RunStats::new(&config.timeframes);

    let total_operations = symbols.len() * config.timeframes.len();
    let items = plan(symbols, &config.timeframes, store, &mut stats);
    let skipped = total_operations - items.len();

    info!(
        symbols = symbols.len(),
        timeframes = config.timeframes.len(),
        total_operations,
        skipped,
        planned = items.len(),
        "수집 계획 수립 완료"
    );

    let policy = RetryPolicy {
        max_retries: config.max_retries,
        base_delay: config.base_delay(),
    };

    for (idx, item) in items.iter().enumerate() {
        let progress = ((idx + 1) as f64 / items.len() as f64) * 100.0;
        info!(
            symbol = %item.symbol,
            timeframe = %item.timeframe,
            progress = format!("{}/{} ({:.1}%)", idx + 1, items.len(), progress),
            "수집 시작"
        );

        let outcome = fetch_with_retry(
            limiter,
            provider,
            &item.symbol,
            item.timeframe,
            config.n_bars,
            policy,
        )
        .await;

        match outcome {
            FetchOutcome::Success(klines) => {
                // 산출물 쓰기 실패는 해당 항목의 실패로 기록.
                // 파일이 없으므로 다음 런에서 다시 시도된다.
                match store.write(&item.symbol, item.timeframe, &klines) {
                    Ok(()) => {
                        stats.total_klines += klines.len();
                        stats.record_success(item.timeframe);
                    }
                    Err(e) => {
                        error!(
                            symbol = %item.symbol,
                            timeframe = %item.timeframe,
                            error = %e,
                            "산출물 저장 실패"
                        );
                        stats.record_failure(item.timeframe, &item.symbol);
                    }
                }
            }
            FetchOutcome::Empty => {
                warn!(symbol = %item.symbol, timeframe = %item.timeframe, "빈 데이터");
                stats.record_failure(item.timeframe, &item.symbol);
            }
            FetchOutcome::Exhausted(e) => {
                error!(
                    symbol = %item.symbol,
                    timeframe = %item.timeframe,
                    error = %e,
                    retries = config.max_retries,
                    "재시도 한도 소진"
                );
                stats.record_failure(item.timeframe, &item.symbol);
            }
        }
    }

    stats.elapsed = start.elapsed();
    Ok(stats)
}
