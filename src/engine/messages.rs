use std::sync::Arc;

use crate::analysis::{ScreenProgress, ScreenReport};
use crate::config::ScreenerConfig;
use crate::data::BarSource;

/// A request to screen a batch of symbols
#[derive(Clone)]
pub struct ScreenJob {
    pub symbols: Vec<String>,
    pub config: ScreenerConfig,
    // Shared, read-only bar provider
    pub source: Arc<dyn BarSource>,
}

/// Events streamed back by the worker
#[derive(Debug, Clone)]
pub enum ScreenEvent {
    Progress(ScreenProgress),
    Finished {
        report: ScreenReport,
        duration_ms: u128,
    },
}
