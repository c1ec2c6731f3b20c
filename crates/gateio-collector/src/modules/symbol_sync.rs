//! 심볼 목록 조회/정규화 모듈.
//!
//! 목록 조회는 런당 1회의 preflight 단계이며, 항목별 fetch와 달리
//! 재시도하지 않습니다. 실패나 빈 결과는 수집 시작 전에 런 전체를
//! 중단시킵니다.

use std::collections::{BTreeSet, HashMap};

use tracing::info;

use gateio_data::{CurrencyPair, SymbolSource};

use crate::{CollectorConfig, CollectorError, Result};

/// 통화쌍 목록을 업스트림 차트 심볼 집합으로 정규화.
///
/// - `trade_status == "tradable"`만 통과
/// - quote 허용 목록이 비어 있지 않으면 해당 quote만 통과
/// - 구분자(`_`, `-`, `/`) 제거 후 대문자화 (예: 10SET_USDT → 10SETUSDT)
/// - 변환 결과에 수동 매핑을 마지막으로 적용
/// - 중복 제거 후 정렬하여 재실행 간 순서를 고정
pub fn normalize_listing(
    pairs: &[CurrencyPair],
    quote_filter: &[String],
    overrides: &HashMap<String, String>,
) -> Vec<String> {
    let mut set = BTreeSet::new();

    for pair in pairs {
        if !pair.is_tradable() || pair.id.is_empty() {
            continue;
        }
        if !quote_filter.is_empty() && !quote_filter.iter().any(|q| *q == pair.quote) {
            continue;
        }

        let symbol: String = pair
            .id
            .chars()
            .filter(|c| !matches!(c, '_' | '-' | '/'))
            .collect::<String>()
            .to_uppercase();

        let symbol = overrides.get(&symbol).cloned().unwrap_or(symbol);
        set.insert(symbol);
    }

    set.into_iter().collect()
}

/// 전체 심볼 목록 조회 + 정규화 (preflight).
pub async fn load_symbols(
    source: &dyn SymbolSource,
    config: &CollectorConfig,
) -> Result<Vec<String>> {
    info!("Gate.io 심볼 목록 조회 시작");

    let pairs = source.list_pairs().await?;
    let symbols = normalize_listing(&pairs, &config.quote_filter, &config.symbol_overrides);

    if symbols.is_empty() {
        return Err(CollectorError::NoSymbols);
    }

    info!(
        listed = pairs.len(),
        unique = symbols.len(),
        sample = ?&symbols[..symbols.len().min(10)],
        "심볼 정규화 완료"
    );
    Ok(symbols)
}
