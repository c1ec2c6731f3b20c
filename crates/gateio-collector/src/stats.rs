//! 수집 통계 구조체.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use gateio_data::Timeframe;

/// 타임프레임별 수집 통계.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TimeframeStats {
    /// 성공 횟수 (기존 산출물 스킵 포함)
    pub successful: usize,
    /// 실패한 심볼 (수집 순서 유지)
    pub failed: Vec<String>,
}

impl TimeframeStats {
    /// 성공률 계산 (%).
    pub fn success_rate(&self) -> f64 {
        let total = self.successful + self.failed.len();
        if total == 0 {
            0.0
        } else {
            (self.successful as f64 / total as f64) * 100.0
        }
    }
}

/// 런 전체 수집 통계.
///
/// Runner가 소유하며 수집 중에만 갱신됩니다. 리포트 단계에서는
/// 읽기 전용으로 전달됩니다.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunStats {
    /// 타임프레임 순서대로 정렬된 통계 (설정된 수집 순서 유지)
    entries: Vec<(Timeframe, TimeframeStats)>,
    /// 저장된 총 캔들 수
    pub total_klines: usize,
    /// 소요 시간
    #[serde(skip)]
    pub elapsed: Duration,
}

impl RunStats {
    /// 주어진 타임프레임 목록으로 초기화.
    pub fn new(timeframes: &[Timeframe]) -> Self {
        Self {
            entries: timeframes
                .iter()
                .map(|tf| (*tf, TimeframeStats::default()))
                .collect(),
            total_klines: 0,
            elapsed: Duration::ZERO,
        }
    }

    fn entry_mut(&mut self, timeframe: Timeframe) -> &mut TimeframeStats {
        // new()에 없던 타임프레임이 기록되면 뒤에 추가
        if let Some(idx) = self.entries.iter().position(|(tf, _)| *tf == timeframe) {
            &mut self.entries[idx].1
        } else {
            self.entries.push((timeframe, TimeframeStats::default()));
            let last = self.entries.len() - 1;
            &mut self.entries[last].1
        }
    }

    /// 성공 1건 기록.
    pub fn record_success(&mut self, timeframe: Timeframe) {
        self.entry_mut(timeframe).successful += 1;
    }

    /// 실패 심볼 기록.
    pub fn record_failure(&mut self, timeframe: Timeframe, symbol: &str) {
        self.entry_mut(timeframe).failed.push(symbol.to_string());
    }

    /// 타임프레임별 통계 조회.
    pub fn get(&self, timeframe: Timeframe) -> Option<&TimeframeStats> {
        self.entries
            .iter()
            .find(|(tf, _)| *tf == timeframe)
            .map(|(_, stats)| stats)
    }

    /// (타임프레임, 통계) 순회 (수집 순서).
    pub fn iter(&self) -> impl Iterator<Item = (Timeframe, &TimeframeStats)> {
        self.entries.iter().map(|(tf, stats)| (*tf, stats))
    }

    /// 전체 성공 수.
    pub fn total_successful(&self) -> usize {
        self.entries.iter().map(|(_, s)| s.successful).sum()
    }

    /// 전체 실패 수.
    pub fn total_failed(&self) -> usize {
        self.entries.iter().map(|(_, s)| s.failed.len()).sum()
    }

    /// 전체 성공률 (%).
    pub fn overall_success_rate(&self) -> f64 {
        let total = self.total_successful() + self.total_failed();
        if total == 0 {
            0.0
        } else {
            (self.total_successful() as f64 / total as f64) * 100.0
        }
    }

    /// 통계 요약 로그 출력.
    pub fn log_summary(&self, operation: &str) {
        tracing::info!(
            operation = operation,
            successful = self.total_successful(),
            failed = self.total_failed(),
            total_klines = self.total_klines,
            success_rate = format!("{:.1}%", self.overall_success_rate()),
            elapsed = format!("{:.1}s", self.elapsed.as_secs_f64()),
            "수집 완료"
        );
    }
}
