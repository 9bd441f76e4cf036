use std::collections::HashMap;

use anyhow::{Result, anyhow};

use crate::domain::{DailySeries, IntradayInterval, IntradaySession};

/// Where the screener gets its bars. Fetch failures come back as `Err` and are
/// contained per symbol by the caller.
pub trait BarSource: Send + Sync {
    /// Daily bars, most-recent-last, ending with the session being screened.
    fn daily_bars(&self, symbol: &str) -> Result<DailySeries>;

    /// The latest intraday session at the requested granularity.
    fn intraday_session(&self, symbol: &str, interval: IntradayInterval)
    -> Result<IntradaySession>;

    /// A unique identifier for this implementation (so that afterwards we know which one we used).
    fn signature(&self) -> &'static str;
}

/// Pre-fetched bars held in memory, keyed by symbol.
#[derive(Debug, Default, Clone)]
pub struct InMemoryBarSource {
    entries: HashMap<String, (DailySeries, IntradaySession)>,
}

impl InMemoryBarSource {
    pub fn insert(&mut self, daily: DailySeries, session: IntradaySession) {
        self.entries
            .insert(daily.symbol().to_string(), (daily, session));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl BarSource for InMemoryBarSource {
    fn daily_bars(&self, symbol: &str) -> Result<DailySeries> {
        self.entries
            .get(symbol)
            .map(|(daily, _)| daily.clone())
            .ok_or_else(|| anyhow!("No daily bars loaded for {}", symbol))
    }

    fn intraday_session(
        &self,
        symbol: &str,
        interval: IntradayInterval,
    ) -> Result<IntradaySession> {
        let (_, session) = self
            .entries
            .get(symbol)
            .ok_or_else(|| anyhow!("No intraday bars loaded for {}", symbol))?;
        if session.interval() != interval {
            return Err(anyhow!(
                "{} intraday bars are {}, requested {}",
                symbol,
                session.interval(),
                interval
            ));
        }
        Ok(session.clone())
    }

    fn signature(&self) -> &'static str {
        "in-memory"
    }
}
