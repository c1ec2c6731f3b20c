//! 요청 속도 제한기.
//!
//! 최근 1초간의 요청 시각을 sliding window로 추적하여 초당 N회를
//! 넘지 않도록 합니다. 대기 시간에는 랜덤 지터가 두 번 더해집니다:
//! 발신 전 지터는 burst를 흩뜨리고, 발신 후 지터는 고정 간격 패턴을
//! 무너뜨립니다.
//!
//! 하나의 인스턴스를 모든 호출 경로가 공유하며, 동시 호출에도
//! 안전합니다 (window는 Mutex로 보호).

use std::collections::VecDeque;
use std::time::Duration;

use rand::Rng;
use tokio::sync::Mutex;
use tokio::time::{sleep, Instant};

/// Sliding window 길이.
const WINDOW: Duration = Duration::from_secs(1);

/// 공유 요청 속도 제한기.
pub struct RateLimiter {
    max_per_sec: usize,
    jitter_min: Duration,
    jitter_max: Duration,
    window: Mutex<VecDeque<Instant>>,
}

impl RateLimiter {
    /// 새 제한기 생성.
    ///
    /// `jitter` 범위가 (0, 0)이면 지터 없이 동작합니다.
    pub fn new(max_per_sec: usize, jitter: (Duration, Duration)) -> Self {
        Self {
            max_per_sec: max_per_sec.max(1),
            jitter_min: jitter.0,
            jitter_max: jitter.1,
            window: Mutex::new(VecDeque::new()),
        }
    }

    /// 다음 요청을 보내도 안전해질 때까지 대기.
    ///
    /// 대기 후에는 window를 다시 확인합니다. 같은 시점에 깨어난 다른
    /// 호출자가 슬롯을 먼저 차지했으면 남은 대기를 다시 계산하므로,
    /// 동시 호출자 수와 무관하게 초당 N개 한도가 유지됩니다.
    pub async fn acquire(&self) {
        loop {
            let wait = {
                let mut window = self.window.lock().await;
                let now = Instant::now();
                Self::prune(&mut window, now);

                if window.len() < self.max_per_sec {
                    window.push_back(now);
                    None
                } else {
                    // 가장 오래된 요청이 window를 벗어날 때까지 + 지터
                    let oldest = window[0];
                    let remaining = WINDOW.saturating_sub(now.duration_since(oldest));
                    Some(remaining + self.draw_jitter())
                }
            };

            match wait {
                None => break,
                Some(wait) => sleep(wait).await,
            }
        }

        // 발신 후 추가 지터
        let pacing = self.draw_jitter();
        if !pacing.is_zero() {
            sleep(pacing).await;
        }
    }

    fn prune(window: &mut VecDeque<Instant>, now: Instant) {
        while window
            .front()
            .is_some_and(|&t| now.duration_since(t) >= WINDOW)
        {
            window.pop_front();
        }
    }

    fn draw_jitter(&self) -> Duration {
        if self.jitter_max.is_zero() {
            return Duration::ZERO;
        }
        let secs = rand::thread_rng()
            .gen_range(self.jitter_min.as_secs_f64()..=self.jitter_max.as_secs_f64());
        Duration::from_secs_f64(secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn no_jitter(max_per_sec: usize) -> RateLimiter {
        RateLimiter::new(max_per_sec, (Duration::ZERO, Duration::ZERO))
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_n_acquires_pass_immediately() {
        let limiter = no_jitter(4);
        let start = Instant::now();

        for _ in 0..4 {
            limiter.acquire().await;
        }

        assert!(start.elapsed() < Duration::from_millis(10));
    }

    #[tokio::test(start_paused = true)]
    async fn test_fifth_acquire_waits_full_window() {
        let limiter = no_jitter(4);
        let start = Instant::now();

        for _ in 0..5 {
            limiter.acquire().await;
        }

        // 5번째 호출은 첫 호출로부터 1초가 지날 때까지 지연
        assert!(start.elapsed() >= Duration::from_secs(1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_expired_window_does_not_block() {
        let limiter = no_jitter(2);

        limiter.acquire().await;
        limiter.acquire().await;
        sleep(Duration::from_millis(1100)).await;

        let before = Instant::now();
        limiter.acquire().await;
        assert!(before.elapsed() < Duration::from_millis(10));
    }

    #[tokio::test(start_paused = true)]
    async fn test_burst_of_many_callers_never_exceeds_bound() {
        // 호출자 수가 한도의 몇 배라도 1초 window당 발신은 N개 이하
        let max_per_sec = 4;
        let limiter = Arc::new(no_jitter(max_per_sec));
        let emissions = Arc::new(std::sync::Mutex::new(Vec::new()));
        let start = Instant::now();

        let mut handles = Vec::new();
        for _ in 0..12 {
            let limiter = Arc::clone(&limiter);
            let emissions = Arc::clone(&emissions);
            handles.push(tokio::spawn(async move {
                limiter.acquire().await;
                emissions.lock().unwrap().push(start.elapsed());
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let mut times = emissions.lock().unwrap().clone();
        times.sort();
        assert_eq!(times.len(), 12);

        // 발신 시각 기준 1초 미만 간격의 sliding window 최대 점유 확인
        for i in 0..times.len() {
            let in_window = times[i..]
                .iter()
                .take_while(|t| **t - times[i] < Duration::from_secs(1))
                .count();
            assert!(
                in_window <= max_per_sec,
                "{} emissions within 1s starting at {:?}",
                in_window,
                times[i]
            );
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_shared_across_tasks() {
        let limiter = Arc::new(no_jitter(4));
        let start = Instant::now();

        let mut handles = Vec::new();
        for _ in 0..8 {
            let limiter = Arc::clone(&limiter);
            handles.push(tokio::spawn(async move {
                limiter.acquire().await;
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        // 8개 요청 / 초당 4개 → 두 번째 batch는 1초 이후에만 통과
        assert!(start.elapsed() >= Duration::from_secs(1));
    }
}
