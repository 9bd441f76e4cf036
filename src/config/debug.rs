//! Debugging feature flags.
//!
//! Toggle individual diagnostics here; keep them `false` by default so release
//! builds remain quiet.

pub struct DebugFlags {
    /// Emit one log line per symbol as the screener advances.
    pub print_screener_progress: bool,
    /// Emit the reason each skipped symbol was left out of the results.
    pub print_skip_reasons: bool,
    /// Emit intraday CSV rows dropped for non-finite prices.
    pub print_dropped_rows: bool,
}

pub const DEBUG_FLAGS: DebugFlags = DebugFlags {
    print_screener_progress: false,
    print_skip_reasons: true,
    print_dropped_rows: false,
};
