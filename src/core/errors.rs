//! Error type returned by evaluation collaborators.

use thiserror::Error;

/// Failure reported by a fact, configuration or entity collaborator.
///
/// Collaborators return a typed zero-value record when upstream data is simply
/// absent; an `EvalError` means the call itself could not be completed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvalError {
    /// The requested record does not exist upstream
    #[error("{what} not found")]
    NotFound { what: String },

    /// Network or collaborator transport failure
    #[error("transport error: {0}")]
    Transport(String),

    /// The collaborator refused access to the record
    #[error("access denied: {0}")]
    Access(String),

    /// The collaborator answered with data that could not be interpreted
    #[error("malformed data: {0}")]
    Malformed(String),
}

impl EvalError {
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound { what: what.into() }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }

    pub fn access(message: impl Into<String>) -> Self {
        Self::Access(message.into())
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::Malformed(message.into())
    }

    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        assert_eq!(
            EvalError::not_found("system:default/payments").to_string(),
            "system:default/payments not found"
        );
        assert_eq!(
            EvalError::transport("connection reset").to_string(),
            "transport error: connection reset"
        );
    }

    #[test]
    fn test_not_found_classification() {
        assert!(EvalError::not_found("x").is_not_found());
        assert!(!EvalError::access("token expired").is_not_found());
    }
}
