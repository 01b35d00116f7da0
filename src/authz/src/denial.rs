//! Denied-request payload

use serde::{Deserialize, Serialize};

/// HTTP status carried by every denial
pub const FORBIDDEN_STATUS: u16 = 403;

/// Machine-readable denial code
pub const FORBIDDEN_CODE: &str = "FORBIDDEN";

/// Message used when no custom message is configured
pub const DEFAULT_DENIAL_MESSAGE: &str = "Unauthorized Access";

/// Body returned to a caller whose request was denied
///
/// Serializes as
/// `{"error":{"status_code":403,"code":"FORBIDDEN","message":"..."}}`.
/// It never carries policy or validation detail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DenialPayload {
    pub error: DenialError,
}

/// Inner error object of a [`DenialPayload`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DenialError {
    pub status_code: u16,
    pub code: String,
    pub message: String,
}

impl DenialPayload {
    /// Build a denial with `custom_message`, or the default message
    pub fn new(custom_message: Option<&str>) -> Self {
        let message = custom_message
            .filter(|m| !m.is_empty())
            .unwrap_or(DEFAULT_DENIAL_MESSAGE);

        Self {
            error: DenialError {
                status_code: FORBIDDEN_STATUS,
                code: FORBIDDEN_CODE.to_string(),
                message: message.to_string(),
            },
        }
    }

    pub fn status_code(&self) -> u16 {
        self.error.status_code
    }

    pub fn message(&self) -> &str {
        &self.error.message
    }
}

impl Default for DenialPayload {
    fn default() -> Self {
        Self::new(None)
    }
}
