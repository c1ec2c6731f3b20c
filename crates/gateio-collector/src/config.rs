//! 환경변수 기반 설정 모듈.

use std::collections::HashMap;
use std::time::Duration;

use gateio_data::Timeframe;

use crate::{CollectorError, Result};

/// Collector 전체 설정.
#[derive(Debug, Clone)]
pub struct CollectorConfig {
    /// 초당 최대 요청 수
    pub max_req_per_sec: usize,
    /// 요청 전후 랜덤 지터 범위 (밀리초)
    pub jitter_min_ms: u64,
    pub jitter_max_ms: u64,
    /// 최대 재시도 횟수
    pub max_retries: u32,
    /// 재시도 백오프 기본 딜레이 (밀리초, 0.5→1→2→4초)
    pub base_delay_ms: u64,
    /// 요청당 캔들 수
    pub n_bars: usize,
    /// 수집 타임프레임 (고정 순서)
    pub timeframes: Vec<Timeframe>,
    /// quote 통화 허용 목록 (비어 있으면 전체 허용)
    pub quote_filter: Vec<String>,
    /// 변환 후 적용되는 수동 심볼 매핑 (업스트림 예외 케이스)
    pub symbol_overrides: HashMap<String, String>,
    /// 산출물 루트 디렉터리
    pub output_dir: String,
    /// Gate.io REST API URL
    pub gateio_api_url: String,
    /// 차트 history API URL
    pub chart_api_url: String,
    /// UDF 심볼 접두사 거래소 코드
    pub chart_exchange: String,
    /// 업스트림 요청 타임아웃 (초)
    pub request_timeout_secs: u64,
}

impl CollectorConfig {
    /// 환경변수에서 설정 로드.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let config = Self {
            max_req_per_sec: env_var_parse("MAX_REQ_PER_SEC", 4),
            jitter_min_ms: env_var_parse("JITTER_MIN_MS", 50),
            jitter_max_ms: env_var_parse("JITTER_MAX_MS", 150),
            max_retries: env_var_parse("MAX_RETRIES", 4),
            base_delay_ms: env_var_parse("RETRY_BASE_DELAY_MS", 500),
            n_bars: env_var_parse("N_BARS", 5000),
            timeframes: parse_timeframes(&std::env::var("TIMEFRAMES").unwrap_or_default())?,
            quote_filter: env_var_list("QUOTE_FILTER"),
            symbol_overrides: parse_overrides(
                &std::env::var("SYMBOL_OVERRIDES").unwrap_or_default(),
            )?,
            output_dir: std::env::var("OUTPUT_DIR").unwrap_or_else(|_| ".".to_string()),
            gateio_api_url: std::env::var("GATEIO_API_URL")
                .unwrap_or_else(|_| gateio_data::provider::gateio::DEFAULT_API_URL.to_string()),
            chart_api_url: std::env::var("CHART_API_URL")
                .unwrap_or_else(|_| "https://udf.tradingview.com".to_string()),
            chart_exchange: std::env::var("CHART_EXCHANGE")
                .unwrap_or_else(|_| "GATEIO".to_string()),
            request_timeout_secs: env_var_parse("REQUEST_TIMEOUT_SECS", 15),
        };

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.max_req_per_sec == 0 {
            return Err(CollectorError::Config(
                "MAX_REQ_PER_SEC는 1 이상이어야 합니다".to_string(),
            ));
        }
        if self.jitter_min_ms > self.jitter_max_ms {
            return Err(CollectorError::Config(format!(
                "지터 범위가 잘못되었습니다: min {}ms > max {}ms",
                self.jitter_min_ms, self.jitter_max_ms
            )));
        }
        if self.timeframes.is_empty() {
            return Err(CollectorError::Config(
                "TIMEFRAMES가 비어 있습니다".to_string(),
            ));
        }
        Ok(())
    }

    /// 지터 범위를 Duration 쌍으로 반환.
    pub fn jitter_range(&self) -> (Duration, Duration) {
        (
            Duration::from_millis(self.jitter_min_ms),
            Duration::from_millis(self.jitter_max_ms),
        )
    }

    /// 백오프 기본 딜레이를 Duration으로 반환.
    pub fn base_delay(&self) -> Duration {
        Duration::from_millis(self.base_delay_ms)
    }

    /// 업스트림 요청 타임아웃을 Duration으로 반환.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            max_req_per_sec: 4,
            jitter_min_ms: 50,
            jitter_max_ms: 150,
            max_retries: 4,
            base_delay_ms: 500,
            n_bars: 5000,
            timeframes: Timeframe::all().to_vec(),
            quote_filter: Vec::new(),
            symbol_overrides: HashMap::new(),
            output_dir: ".".to_string(),
            gateio_api_url: gateio_data::provider::gateio::DEFAULT_API_URL.to_string(),
            chart_api_url: "https://udf.tradingview.com".to_string(),
            chart_exchange: "GATEIO".to_string(),
            request_timeout_secs: 15,
        }
    }
}

/// 환경변수에서 값을 파싱 (실패 시 기본값 사용).
fn env_var_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// 쉼표로 구분된 목록 환경변수 파싱.
fn env_var_list(key: &str) -> Vec<String> {
    std::env::var(key)
        .map(|v| {
            v.split(',')
                .map(|s| s.trim().to_uppercase())
                .filter(|s| !s.is_empty())
                .collect()
        })
        .unwrap_or_default()
}

/// "1m,5m,1d" 형식의 타임프레임 목록 파싱 (빈 문자열 = 전체).
fn parse_timeframes(value: &str) -> Result<Vec<Timeframe>> {
    if value.trim().is_empty() {
        return Ok(Timeframe::all().to_vec());
    }

    value
        .split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| {
            Timeframe::from_suffix(s)
                .ok_or_else(|| CollectorError::Config(format!("알 수 없는 타임프레임: {}", s)))
        })
        .collect()
}

/// "FROM=TO,FROM2=TO2" 형식의 수동 매핑 파싱.
fn parse_overrides(value: &str) -> Result<HashMap<String, String>> {
    let mut map = HashMap::new();
    for entry in value.split(',').map(|s| s.trim()).filter(|s| !s.is_empty()) {
        let (from, to) = entry.split_once('=').ok_or_else(|| {
            CollectorError::Config(format!("잘못된 SYMBOL_OVERRIDES 항목: {}", entry))
        })?;
        map.insert(from.trim().to_uppercase(), to.trim().to_uppercase());
    }
    Ok(map)
}
