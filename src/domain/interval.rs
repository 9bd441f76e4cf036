use serde::{Deserialize, Serialize};

/// Intraday bar widths the breakout checks accept.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    clap::ValueEnum,
    strum_macros::Display,
    strum_macros::EnumString,
    strum_macros::EnumIter,
)]
pub enum IntradayInterval {
    #[default]
    #[serde(rename = "5m")]
    #[strum(serialize = "5m")]
    #[value(name = "5m")]
    FiveMin,
    #[serde(rename = "15m")]
    #[strum(serialize = "15m")]
    #[value(name = "15m")]
    FifteenMin,
    #[serde(rename = "30m")]
    #[strum(serialize = "30m")]
    #[value(name = "30m")]
    ThirtyMin,
    #[serde(rename = "60m")]
    #[strum(serialize = "60m")]
    #[value(name = "60m")]
    SixtyMin,
}
