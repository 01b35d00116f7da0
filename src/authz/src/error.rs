//! Error types for the authorization engine

use thiserror::Error;

/// Policy document validation errors
///
/// Raised when a document is built at setup time, or on every decision when
/// the document comes from a dynamic supplier.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// No policy document was supplied, or it contained no access groups
    #[error("no access policies supplied; at least one access group is required")]
    MissingPolicy,

    /// Two access groups share the same identifier
    #[error("[{index}].access_group: duplicate access group '{group}'")]
    DuplicateGroup {
        /// Index of the second occurrence
        index: usize,
        /// The repeated identifier
        group: String,
    },

    /// A group or permission does not have the expected shape
    #[error("{location}: {reason}")]
    Malformed {
        /// Array index and field path, e.g. `[0].permissions[2].action`
        location: String,
        /// What is wrong with the value
        reason: String,
    },
}

impl ValidationError {
    pub(crate) fn malformed(location: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Malformed {
            location: location.into(),
            reason: reason.into(),
        }
    }
}

/// Authorization engine errors
#[derive(Debug, Error)]
pub enum AuthzError {
    /// Invalid policy document
    #[error("Invalid policy document: {0}")]
    Validation(#[from] ValidationError),

    /// Invalid engine configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for authorization operations
pub type Result<T> = std::result::Result<T, AuthzError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_messages_carry_location() {
        let err = ValidationError::malformed("[0].permissions[1].action", "must be one of [allow, deny]");
        assert_eq!(
            err.to_string(),
            "[0].permissions[1].action: must be one of [allow, deny]"
        );

        let dup = ValidationError::DuplicateGroup {
            index: 1,
            group: "admin".to_string(),
        };
        assert_eq!(dup.to_string(), "[1].access_group: duplicate access group 'admin'");
    }

    #[test]
    fn test_authz_error_wraps_validation() {
        let err: AuthzError = ValidationError::MissingPolicy.into();
        assert!(matches!(err, AuthzError::Validation(ValidationError::MissingPolicy)));
        assert!(err.to_string().starts_with("Invalid policy document"));
    }
}
