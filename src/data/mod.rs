// Data loading and export at the edges of the core
pub mod csv_source;
pub mod export;
pub mod market_tz;
pub mod source;
pub mod symbols;

// Re-export commonly used types
pub use csv_source::CsvBarSource;
pub use export::export_rows;
pub use market_tz::market_timezone;
pub use source::{BarSource, InMemoryBarSource};
pub use symbols::load_symbols;
