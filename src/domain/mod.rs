// Domain types and value objects
pub mod bar_series;
pub mod candle;
pub mod interval;

// Re-export commonly used types
pub use bar_series::{DailySeries, IntradaySession};
pub use candle::{Bar, CandleType};
pub use interval::IntradayInterval;
