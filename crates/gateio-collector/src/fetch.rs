//! 재시도 포함 fetch 래퍼.
//!
//! 한 번의 `fetch_with_retry` 호출 안에서만 유지되는 시도 카운터로
//! 지수 백오프 재시도를 수행합니다. 분류는 의도적으로 단순합니다:
//! 빈 결과는 "히스토리 없는 심볼"이므로 즉시 종료하고, 그 외 모든
//! 에러는 한도까지 재시도합니다. 백오프 자체에는 지터가 없습니다
//! (요청별 지터는 RateLimiter가 담당).

use std::time::Duration;

use tokio::time::sleep;
use tracing::warn;

use gateio_data::{DataError, HistoricalDataProvider, Kline, Timeframe};

use crate::ratelimit::RateLimiter;

/// 재시도 정책.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// 최대 재시도 횟수 (첫 시도 제외)
    pub max_retries: u32,
    /// 백오프 기본 딜레이
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 4,
            base_delay: Duration::from_millis(500),
        }
    }
}

/// 한 (심볼, 타임프레임) fetch의 최종 결과.
#[derive(Debug)]
pub enum FetchOutcome {
    /// 비어 있지 않은 캔들 데이터 수신
    Success(Vec<Kline>),
    /// 업스트림에 히스토리 없음 (재시도 대상 아님)
    Empty,
    /// 재시도 한도 소진
    Exhausted(DataError),
}

/// n번째 재시도 전 대기 시간: `base * 2^(retry-1)`.
///
/// retry=1..=4, base=0.5s이면 0.5 → 1 → 2 → 4초.
pub fn backoff_delay(base: Duration, retry: u32) -> Duration {
    base * 2u32.saturating_pow(retry.saturating_sub(1))
}

/// 속도 제한 + 재시도를 적용한 단일 WorkItem fetch.
pub async fn fetch_with_retry(
    limiter: &RateLimiter,
    provider: &dyn HistoricalDataProvider,
    symbol: &str,
    timeframe: Timeframe,
    n_bars: usize,
    policy: RetryPolicy,
) -> FetchOutcome {
    let mut retry = 0u32;

    loop {
        limiter.acquire().await;

        match provider.get_klines(symbol, timeframe, n_bars).await {
            Ok(klines) if klines.is_empty() => return FetchOutcome::Empty,
            Ok(klines) => return FetchOutcome::Success(klines),
            Err(e) => {
                retry += 1;
                if retry > policy.max_retries {
                    return FetchOutcome::Exhausted(e);
                }
                let delay = backoff_delay(policy.base_delay, retry);
                warn!(
                    symbol,
                    %timeframe,
                    error = %e,
                    retry,
                    max_retries = policy.max_retries,
                    delay_secs = delay.as_secs_f64(),
                    "조회 실패, 재시도 예정"
                );
                sleep(delay).await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};
    use gateio_data::Result as DataResult;
    use rust_decimal_macros::dec;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::time::Instant;

    /// `fail_first`번 실패 후 `bars`개 캔들을 반환하는 테스트 제공자.
    struct ScriptedProvider {
        fail_first: usize,
        bars: usize,
        calls: AtomicUsize,
    }

    impl ScriptedProvider {
        fn new(fail_first: usize, bars: usize) -> Self {
            Self {
                fail_first,
                bars,
                calls: AtomicUsize::new(0),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl HistoricalDataProvider for ScriptedProvider {
        async fn get_klines(
            &self,
            _symbol: &str,
            _timeframe: Timeframe,
            _limit: usize,
        ) -> DataResult<Vec<Kline>> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call < self.fail_first {
                return Err(DataError::Network("connection reset".to_string()));
            }
            Ok((0..self.bars)
                .map(|i| Kline {
                    open_time: Utc.timestamp_opt(1_700_000_000 + i as i64 * 60, 0).unwrap(),
                    open: dec!(1),
                    high: dec!(2),
                    low: dec!(0.5),
                    close: dec!(1.5),
                    volume: dec!(10),
                })
                .collect())
        }
    }

    fn limiter() -> RateLimiter {
        // 테스트에서는 제한에 걸리지 않도록 넉넉하게
        RateLimiter::new(100, (Duration::ZERO, Duration::ZERO))
    }

    #[test]
    fn test_backoff_delay_sequence() {
        let base = Duration::from_millis(500);
        let delays: Vec<_> = (1..=4).map(|r| backoff_delay(base, r)).collect();
        assert_eq!(
            delays,
            vec![
                Duration::from_millis(500),
                Duration::from_secs(1),
                Duration::from_secs(2),
                Duration::from_secs(4),
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhausted_after_max_retries() {
        let provider = ScriptedProvider::new(usize::MAX, 0);
        let limiter = limiter();
        let start = Instant::now();

        let outcome = fetch_with_retry(
            &limiter,
            &provider,
            "BTCUSDT",
            Timeframe::D1,
            100,
            RetryPolicy::default(),
        )
        .await;

        assert!(matches!(outcome, FetchOutcome::Exhausted(_)));
        // 5회 시도, 대기 0.5+1+2+4 = 7.5초
        assert_eq!(provider.calls(), 5);
        assert!(start.elapsed() >= Duration::from_millis(7500));
        assert!(start.elapsed() < Duration::from_millis(7700));
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_is_terminal_without_retry() {
        let provider = ScriptedProvider::new(0, 0);
        let limiter = limiter();

        let outcome = fetch_with_retry(
            &limiter,
            &provider,
            "NOHISTUSDT",
            Timeframe::M1,
            100,
            RetryPolicy::default(),
        )
        .await;

        assert!(matches!(outcome, FetchOutcome::Empty));
        assert_eq!(provider.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_recovers_after_transient_failures() {
        let provider = ScriptedProvider::new(2, 3);
        let limiter = limiter();
        let start = Instant::now();

        let outcome = fetch_with_retry(
            &limiter,
            &provider,
            "ETHUSDT",
            Timeframe::H1,
            3,
            RetryPolicy::default(),
        )
        .await;

        match outcome {
            FetchOutcome::Success(klines) => assert_eq!(klines.len(), 3),
            other => panic!("expected Success, got {:?}", other),
        }
        assert_eq!(provider.calls(), 3);
        // 대기 0.5 + 1 = 1.5초
        assert!(start.elapsed() >= Duration::from_millis(1500));
    }

    #[tokio::test(start_paused = true)]
    async fn test_retry_state_is_local_to_one_call() {
        let provider = ScriptedProvider::new(1, 2);
        let limiter = limiter();

        let first = fetch_with_retry(
            &limiter,
            &provider,
            "AUSDT",
            Timeframe::M5,
            2,
            RetryPolicy::default(),
        )
        .await;
        assert!(matches!(first, FetchOutcome::Success(_)));

        // 두 번째 호출은 새 카운터로 시작 (이전 호출의 재시도와 무관)
        let second = fetch_with_retry(
            &limiter,
            &provider,
            "BUSDT",
            Timeframe::M5,
            2,
            RetryPolicy::default(),
        )
        .await;
        assert!(matches!(second, FetchOutcome::Success(_)));
    }
}
