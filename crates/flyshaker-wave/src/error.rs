//! Errors raised by the parameter mapper and the synthesizers.

use thiserror::Error;

pub type WaveResult<T> = Result<T, WaveError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum WaveError {
    /// A signal parameter is outside the range synthesis can work with.
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    /// The source range of a linear map has zero width.
    #[error("cannot map from the empty range {low}..={high}")]
    DegenerateRange { low: i64, high: i64 },

    /// A mapped value does not fit in the target integer type.
    #[error("mapped value {0} does not fit in a 64-bit integer")]
    MappedOutOfRange(f64),
}

impl WaveError {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        WaveError::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}

pub(crate) fn require_positive(name: &'static str, value: f64) -> WaveResult<f64> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(WaveError::invalid(name, format!("must be positive, got {}", value)))
    }
}
