//! Gate.io 과거 데이터 일괄 수집 CLI.

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gateio_collector::{modules, CollectorConfig, RateLimiter};
use gateio_data::{CsvBarStore, GateioSymbolSource, UdfHistoryProvider};

#[derive(Parser)]
#[command(name = "gateio-collector")]
#[command(about = "Gate.io Multi-Timeframe OHLCV Collector", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// 로그 레벨 (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// 전체 수집 워크플로우 실행 (심볼 조회 → 계획 → 수집 → 리포트)
    Collect {
        /// 특정 심볼만 수집 (쉼표로 구분, 정규화된 형식, 예: "BTCUSDT,ETHUSDT")
        #[arg(long)]
        symbols: Option<String>,
    },

    /// 심볼 목록 조회/정규화 결과만 출력 (preflight 확인용)
    ListSymbols,

    /// 네이티브 통화쌍 ID의 업스트림 심볼 형식 진단
    Probe {
        /// Gate.io 통화쌍 ID (예: "10SET_USDT")
        #[arg(long)]
        pair: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // 로깅 초기화
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("gateio_collector={}", cli.log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Gate.io Data Collector 시작");

    // 설정 로드
    let config = CollectorConfig::from_env()?;
    tracing::debug!(?config, "설정 로드 완료");

    match cli.command {
        Commands::Collect { symbols } => {
            let store = CsvBarStore::new(&config.output_dir);
            store.ensure_dirs(&config.timeframes)?;

            let limiter = RateLimiter::new(config.max_req_per_sec, config.jitter_range());
            let provider = UdfHistoryProvider::new(
                &config.chart_api_url,
                &config.chart_exchange,
                config.request_timeout(),
            )?;

            let symbols = match symbols {
                Some(s) => {
                    let syms: Vec<String> = s
                        .split(',')
                        .map(|s| s.trim().to_uppercase())
                        .filter(|s| !s.is_empty())
                        .collect();
                    tracing::info!(count = syms.len(), "수동 심볼 목록 사용");
                    syms
                }
                None => {
                    let source = GateioSymbolSource::with_base_url(
                        &config.gateio_api_url,
                        config.request_timeout(),
                    )?;
                    modules::load_symbols(&source, &config).await?
                }
            };

            if symbols.is_empty() {
                tracing::error!("수집할 심볼이 없습니다. 종료합니다.");
                return Err(gateio_collector::CollectorError::NoSymbols.into());
            }

            let stats =
                modules::collect_ohlcv(&provider, &store, &limiter, &config, &symbols).await?;
            modules::write_report(&stats, symbols.len(), &config, &store)?;
            stats.log_summary("OHLCV 수집");
        }
        Commands::ListSymbols => {
            let source = GateioSymbolSource::with_base_url(
                &config.gateio_api_url,
                config.request_timeout(),
            )?;
            let symbols = modules::load_symbols(&source, &config).await?;
            for symbol in &symbols {
                println!("{}", symbol);
            }
            tracing::info!(count = symbols.len(), "심볼 목록 출력 완료");
        }
        Commands::Probe { pair } => {
            let limiter = RateLimiter::new(config.max_req_per_sec, config.jitter_range());
            let provider = UdfHistoryProvider::new(
                &config.chart_api_url,
                &config.chart_exchange,
                config.request_timeout(),
            )?;

            let results = modules::probe_formats(&provider, &limiter, &pair).await;
            for result in &results {
                match result.bars {
                    Some(bars) => println!("{}  OK ({} bars)", result.variant, bars),
                    None => println!("{}  no data", result.variant),
                }
            }
            if !results.iter().any(|r| r.works()) {
                tracing::warn!(pair = %pair, "인식되는 형식이 없습니다");
            }
        }
    }

    tracing::info!("Gate.io Data Collector 종료");
    Ok(())
}
