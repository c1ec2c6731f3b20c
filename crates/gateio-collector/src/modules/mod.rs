//! 수집 워크플로우 모듈.

pub mod ohlcv_collect;
pub mod probe;
pub mod report;
pub mod symbol_sync;

pub use ohlcv_collect::{collect_ohlcv, plan, WorkItem};
pub use probe::{probe_formats, ProbeResult};
pub use report::write_report;
pub use symbol_sync::{load_symbols, normalize_listing};
