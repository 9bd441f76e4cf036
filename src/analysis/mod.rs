// CPR breakout detection and batch screening
pub mod breakout;
pub mod screener;
pub mod symbol_analysis;

// Re-export commonly used types
pub use breakout::{PriorSession, VolumeGate, detect_breakout};
pub use screener::{ScreenProgress, ScreenReport, ScreenRow, Screener, SymbolOutcome, SymbolReport};
pub use symbol_analysis::{ChartOverlay, SymbolAnalysis, ZoneTone, analyse_symbol};
