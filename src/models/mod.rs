// Domain models for the CPR breakout core
// These modules contain pure business logic independent of data loading/presentation

pub mod breakout;
pub mod cpr;
pub mod trend;

// Re-export key types for convenience
pub use breakout::{BreakoutReason, BreakoutResult, TriggerCandle};
pub use cpr::CprLevels;
pub use trend::{CprTrend, CprWidth};
