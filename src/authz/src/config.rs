//! Authorization configuration
//!
//! An immutable value built once at setup and handed to the engine and
//! guard constructors.

use crate::error::{AuthzError, Result};
use crate::request::DEFAULT_ACCESS_GROUP;
use crate::unless::RouteExceptions;
use serde::{Deserialize, Serialize};

/// Authorization settings surrounding the policy document
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct IamConfig {
    /// Mount prefix prepended to every policy pattern (e.g. `/api/v1`)
    #[serde(default)]
    pub prefix: Option<String>,

    /// Group assigned when a request carries none
    #[serde(default = "default_access_group")]
    pub default_access_group: String,

    /// Message returned in denial payloads instead of the default
    #[serde(default)]
    pub custom_message: Option<String>,

    /// Where the access group lives in the request object
    /// (e.g. `session.user.group`)
    #[serde(default)]
    pub access_group_search_path: Option<String>,

    /// Requests that skip authorization
    #[serde(default)]
    pub exceptions: RouteExceptions,
}

fn default_access_group() -> String {
    DEFAULT_ACCESS_GROUP.to_string()
}

impl Default for IamConfig {
    fn default() -> Self {
        Self {
            prefix: None,
            default_access_group: default_access_group(),
            custom_message: None,
            access_group_search_path: None,
            exceptions: RouteExceptions::default(),
        }
    }
}

impl IamConfig {
    /// Parse and validate a JSON configuration
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: IamConfig = serde_json::from_str(json)
            .map_err(|e| AuthzError::InvalidConfig(format!("failed to parse configuration: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Check settings that serde cannot
    pub fn validate(&self) -> Result<()> {
        if self.default_access_group.is_empty() {
            return Err(AuthzError::InvalidConfig(
                "default_access_group must not be empty".to_string(),
            ));
        }

        if let Some(path) = &self.access_group_search_path {
            if path.split(|c: char| c == '.' || c == '/').any(str::is_empty) {
                return Err(AuthzError::InvalidConfig(format!(
                    "access_group_search_path '{}' contains an empty segment",
                    path
                )));
            }
        }

        Ok(())
    }

    /// Mount prefix, `""` when unset
    pub fn prefix(&self) -> &str {
        self.prefix.as_deref().unwrap_or_default()
    }
}
