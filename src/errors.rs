use thiserror::Error;

/// Errors raised by the CPR core.
///
/// Volume disqualification is not an error: a breakout that fails the
/// volume gate is a [`BreakoutReason`](crate::models::BreakoutReason), not an error.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CprError {
    /// A bar with `high < low` or a non-finite price field.
    #[error("invalid bar: {0}")]
    InvalidBar(String),

    /// Not enough bars for the requested feature.
    #[error("insufficient data: need {required} {what}, have {available}")]
    InsufficientData {
        what: &'static str,
        required: usize,
        available: usize,
    },

    /// Upstream data could not be obtained or parsed for a symbol.
    #[error("data error: {0}")]
    Data(String),
}

impl CprError {
    pub fn insufficient(what: &'static str, required: usize, available: usize) -> Self {
        CprError::InsufficientData {
            what,
            required,
            available,
        }
    }

    pub fn is_insufficient_data(&self) -> bool {
        matches!(self, CprError::InsufficientData { .. })
    }
}

pub type CprResult<T> = std::result::Result<T, CprError>;
