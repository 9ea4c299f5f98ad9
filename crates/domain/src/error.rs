//! Unified error types for the domain layer

use thiserror::Error;

/// Unified error type for domain operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Validation failed (e.g., invalid field values)
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Invalid ID format
    #[error("Invalid ID format: {0}")]
    InvalidId(String),

    /// Parse error (for value objects)
    #[error("Parse error: {0}")]
    Parse(String),
}

impl DomainError {
    /// Creates a validation error for snapshot or session invariants.
    ///
    /// # Example
    /// ```ignore
    /// if players.is_empty() {
    ///     return Err(DomainError::validation("snapshot has no players"));
    /// }
    /// ```
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create an invalid ID error
    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    /// Creates a parse error for string-to-type conversion failures.
    ///
    /// Used by the `FromStr` impls of the wire vocabulary (`Phase`, `Role`).
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error() {
        let err = DomainError::validation("day cannot be negative");
        assert!(matches!(err, DomainError::Validation(_)));
        assert_eq!(err.to_string(), "Validation failed: day cannot be negative");
    }

    #[test]
    fn test_parse_error() {
        let err = DomainError::parse("Unknown phase: dusk");
        assert_eq!(err.to_string(), "Parse error: Unknown phase: dusk");
    }

    #[test]
    fn test_invalid_id_error() {
        let err = DomainError::invalid_id("player id must be 1-based, got 0");
        assert!(matches!(err, DomainError::InvalidId(_)));
        assert!(err.to_string().contains("1-based"));
    }
}
