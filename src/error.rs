//! Error types
//!
//! `AdvisorError` is the only error the advisory core surfaces. Unknown
//! categories (soil type, growth stage, crop name) resolve to documented
//! defaults and capability failures fall back to closed-form estimates, so
//! neither appears here.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum AdvisorError {
    /// A required field was not supplied
    #[error("missing required field '{0}'")]
    MissingField(String),

    /// A field was supplied but cannot be used (non-numeric, non-finite, negative size)
    #[error("invalid value for '{field}': {reason}")]
    InvalidInput { field: String, reason: String },

    /// A model artifact exists but cannot be used (only raised while loading)
    #[error("unusable artifact {path}: {reason}")]
    Artifact { path: String, reason: String },
}

impl AdvisorError {
    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        AdvisorError::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, AdvisorError>;

/// Reject NaN and infinities
pub fn ensure_finite(field: &str, value: f64) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(AdvisorError::invalid(field, format!("expected a finite number, got {}", value)))
    }
}

/// Reject non-finite and negative values (areas, sizes)
pub fn ensure_non_negative(field: &str, value: f64) -> Result<f64> {
    let value = ensure_finite(field, value)?;
    if value < 0.0 {
        return Err(AdvisorError::invalid(field, format!("must not be negative, got {}", value)));
    }
    Ok(value)
}
