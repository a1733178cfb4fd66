//! Custom error types for PayStreet
//!
//! This module defines the error hierarchy for the application using thiserror
//! for ergonomic error definitions.

use thiserror::Error;

/// The main error type for PayStreet operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PaystreetError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// YAML serialization errors
    #[error("YAML error: {0}")]
    Yaml(String),

    /// A required field on the current step is missing or invalid
    #[error("Validation error on '{field}': {message}")]
    Validation { field: String, message: String },

    /// The rate quote ran out before the action could complete
    #[error("Quote expired: request a new quote to continue")]
    QuoteExpired,

    /// Entity not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// Duplicate entity errors
    #[error("{entity_type} already exists: {identifier}")]
    Duplicate {
        entity_type: &'static str,
        identifier: String,
    },

    /// Catalog lock errors
    #[error("Catalog error: {0}")]
    Catalog(String),

    /// TUI errors
    #[error("TUI error: {0}")]
    Tui(String),
}

impl PaystreetError {
    /// Create a validation error for a field
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a "not found" error for wizard steps
    pub fn step_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Step",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for wizard fields
    pub fn field_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Field",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for beneficiaries
    pub fn beneficiary_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Beneficiary",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for currencies
    pub fn currency_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Currency",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for payment methods
    pub fn payment_method_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Payment method",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for exchange rates
    pub fn rate_not_found(from: &str, to: &str) -> Self {
        Self::NotFound {
            entity_type: "Exchange rate",
            identifier: format!("{}/{}", from, to),
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }

    /// Check if this is a quote expiry
    pub fn is_quote_expired(&self) -> bool {
        matches!(self, Self::QuoteExpired)
    }

    /// The field a validation error points at, if any
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::Validation { field, .. } => Some(field),
            _ => None,
        }
    }
}

// Implement From traits for common error types

impl From<std::io::Error> for PaystreetError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for PaystreetError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

impl From<serde_yaml::Error> for PaystreetError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::Yaml(err.to_string())
    }
}

/// Result type alias for PayStreet operations
pub type PaystreetResult<T> = Result<T, PaystreetError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = PaystreetError::Config("test error".into());
        assert_eq!(err.to_string(), "Configuration error: test error");
    }

    #[test]
    fn test_not_found_error() {
        let err = PaystreetError::step_not_found("payout");
        assert_eq!(err.to_string(), "Step not found: payout");
        assert!(err.is_not_found());
        assert!(!err.is_validation());
    }

    #[test]
    fn test_validation_error() {
        let err = PaystreetError::validation("amount", "Enter an amount greater than zero");
        assert_eq!(
            err.to_string(),
            "Validation error on 'amount': Enter an amount greater than zero"
        );
        assert!(err.is_validation());
        assert_eq!(err.field(), Some("amount"));
    }

    #[test]
    fn test_rate_not_found() {
        let err = PaystreetError::rate_not_found("USD", "XAU");
        assert_eq!(err.to_string(), "Exchange rate not found: USD/XAU");
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: PaystreetError = io_err.into();
        assert!(matches!(err, PaystreetError::Io(_)));
    }
}
