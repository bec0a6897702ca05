use thiserror::Error;

use crate::params::AdjustmentField;

/// A parameter value outside its declared domain.
///
/// The UI is expected to clamp at the control level, so this is a caller bug.
/// Values are rejected, never silently clamped.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("{field} must be within {min}..={max}, got {value}")]
    OutOfRange {
        field: AdjustmentField,
        value: f64,
        min: f64,
        max: f64,
    },
    #[error("{0} must be finite")]
    NonFinite(AdjustmentField),
}

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("not a decodable image: {0}")]
    Decode(String),
    #[error("encoding failed: {0}")]
    Encode(String),
    #[error("image processing engine is not ready")]
    NotReady,
}
