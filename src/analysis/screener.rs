use std::sync::atomic::{AtomicUsize, Ordering};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::analysis::breakout::{PriorSession, detect_breakout};
use crate::analysis::symbol_analysis::{prior_context, volume_gate};
use crate::config::{ANALYSIS, DEBUG_FLAGS, ScreenerConfig};
use crate::data::BarSource;
use crate::errors::CprError;
use crate::models::{BreakoutReason, BreakoutResult, CprTrend, CprWidth};

/// One qualifying symbol, in export column order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreenRow {
    pub symbol: String,
    pub trigger_open: f64,
    pub trigger_close: f64,
    pub yesterday_high: f64,
    pub trend: CprTrend,
    pub width: CprWidth,
}

/// What happened to a single symbol during a screen.
#[derive(Debug, Clone, PartialEq)]
pub enum SymbolOutcome {
    /// Enough data to evaluate; `row` is set only when the breakout qualified.
    Screened {
        trend: CprTrend,
        width: CprWidth,
        breakout: BreakoutResult,
        row: Option<ScreenRow>,
    },
    /// Not enough history or an empty session.
    Skipped { reason: String },
    /// Bad or unobtainable data.
    Failed { error: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct SymbolReport {
    pub symbol: String,
    pub outcome: SymbolOutcome,
}

impl SymbolReport {
    pub fn row(&self) -> Option<&ScreenRow> {
        match &self.outcome {
            SymbolOutcome::Screened { row, .. } => row.as_ref(),
            _ => None,
        }
    }

    /// Human-readable explanation of the outcome.
    pub fn reason(&self) -> String {
        match &self.outcome {
            SymbolOutcome::Screened { breakout, .. } => breakout.reason.to_string(),
            SymbolOutcome::Skipped { reason } => reason.clone(),
            SymbolOutcome::Failed { error } => error.clone(),
        }
    }
}

/// Per-symbol results in input order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScreenReport {
    pub symbols: Vec<SymbolReport>,
}

impl ScreenReport {
    /// Qualifying rows, still in input order.
    pub fn qualified(&self) -> Vec<&ScreenRow> {
        self.symbols.iter().filter_map(|s| s.row()).collect()
    }

    pub fn skipped(&self) -> impl Iterator<Item = &SymbolReport> {
        self.symbols
            .iter()
            .filter(|s| matches!(s.outcome, SymbolOutcome::Skipped { .. }))
    }

    pub fn failed(&self) -> impl Iterator<Item = &SymbolReport> {
        self.symbols
            .iter()
            .filter(|s| matches!(s.outcome, SymbolOutcome::Failed { .. }))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreenProgress {
    pub processed: usize,
    pub total: usize,
    pub symbol: String,
}

impl ScreenProgress {
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            return 1.0;
        }
        self.processed as f64 / self.total as f64
    }
}

/// Batch screen over a symbol list. Each symbol is evaluated independently;
/// no symbol's failure reaches another symbol's result.
pub struct Screener<'a> {
    source: &'a dyn BarSource,
    config: ScreenerConfig,
}

impl<'a> Screener<'a> {
    pub fn new(source: &'a dyn BarSource, config: ScreenerConfig) -> Self {
        Self { source, config }
    }

    pub fn config(&self) -> &ScreenerConfig {
        &self.config
    }

    /// Sequential screen; `progress` fires after every symbol.
    pub fn run(
        &self,
        symbols: &[String],
        mut progress: impl FnMut(&ScreenProgress),
    ) -> ScreenReport {
        let total = symbols.len();
        let mut reports = Vec::with_capacity(total);

        for (idx, symbol) in symbols.iter().enumerate() {
            reports.push(self.screen_symbol(symbol));
            self.report_progress(&mut progress, idx + 1, total, symbol);
        }

        ScreenReport { symbols: reports }
    }

    /// Same as [`run`](Self::run) on the rayon pool. Results keep input order;
    /// progress arrives in completion order.
    pub fn run_parallel(
        &self,
        symbols: &[String],
        progress: impl Fn(&ScreenProgress) + Sync,
    ) -> ScreenReport {
        let total = symbols.len();
        let processed = AtomicUsize::new(0);

        let reports = symbols
            .par_iter()
            .map(|symbol| {
                let report = self.screen_symbol(symbol);
                let done = processed.fetch_add(1, Ordering::Relaxed) + 1;
                progress(&ScreenProgress {
                    processed: done,
                    total,
                    symbol: symbol.clone(),
                });
                report
            })
            .collect();

        ScreenReport { symbols: reports }
    }

    fn report_progress(
        &self,
        progress: &mut impl FnMut(&ScreenProgress),
        processed: usize,
        total: usize,
        symbol: &str,
    ) {
        if DEBUG_FLAGS.print_screener_progress {
            log::info!("[{}/{}] {}", processed, total, symbol);
        }
        progress(&ScreenProgress {
            processed,
            total,
            symbol: symbol.to_string(),
        });
    }

    /// Evaluates one symbol. Never panics on bad data: every failure becomes an outcome.
    pub fn screen_symbol(&self, symbol: &str) -> SymbolReport {
        let outcome = match self.evaluate(symbol) {
            Ok(outcome) => outcome,
            Err(e) if e.is_insufficient_data() => {
                if DEBUG_FLAGS.print_skip_reasons {
                    log::debug!("Skipping {}: {}", symbol, e);
                }
                SymbolOutcome::Skipped {
                    reason: e.to_string(),
                }
            }
            Err(e) => {
                log::warn!("⚠️ Error processing {}: {}", symbol, e);
                SymbolOutcome::Failed {
                    error: e.to_string(),
                }
            }
        };
        SymbolReport {
            symbol: symbol.to_string(),
            outcome,
        }
    }

    fn evaluate(&self, symbol: &str) -> Result<SymbolOutcome, CprError> {
        let daily = self
            .source
            .daily_bars(symbol)
            .map_err(|e| CprError::Data(format!("{:#}", e)))?;
        daily.require(ANALYSIS.cpr.min_daily_bars_for_trend)?;

        let session = self
            .source
            .intraday_session(symbol, self.config.interval)
            .map_err(|e| CprError::Data(format!("{:#}", e)))?;
        session.first()?;

        let prior = prior_context(&daily, &self.config)?;
        let trend = prior
            .trend
            .ok_or_else(|| CprError::insufficient("daily bars", 3, daily.len()))?;
        let width = CprWidth::classify(&prior.levels);

        if self.config.require_ascending_trend && !trend.is_ascending() {
            return Ok(SymbolOutcome::Screened {
                trend,
                width,
                breakout: BreakoutResult::rejected(
                    self.config.strategy,
                    BreakoutReason::NotApplicable,
                    None,
                ),
                row: None,
            });
        }

        let gate = volume_gate(&daily, &self.config)?;
        let breakout = detect_breakout(
            &self.config,
            session.bars(),
            PriorSession {
                levels: &prior.levels,
                high: prior.high,
                trend: prior.trend,
            },
            gate,
        );

        let row = match (&breakout.trigger, breakout.qualifies) {
            (Some(trigger), true) => Some(ScreenRow {
                symbol: symbol.to_string(),
                trigger_open: trigger.open,
                trigger_close: trigger.close,
                yesterday_high: prior.high,
                trend,
                width,
            }),
            _ => None,
        };

        Ok(SymbolOutcome::Screened {
            trend,
            width,
            breakout,
            row,
        })
    }
}
