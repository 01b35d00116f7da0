//! Request-level authorization gate
//!
//! [`AccessGuard`] ties the pieces together for one incoming request: the
//! exception check, group extraction, the engine decision and the denial
//! payload. Framework adapters translate a [`Verdict`] into "continue" or a
//! 403 response.

use crate::config::IamConfig;
use crate::denial::DenialPayload;
use crate::engine::PolicyEngine;
use crate::error::Result;
use crate::policy::{PolicyDocument, PolicySupplier};
use crate::request::GroupExtractor;
use crate::unless::{request_path, RouteExceptions};

use serde_json::Value;
use tracing::{debug, info};

/// Outcome of guarding one request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// The request matched a route exception; no decision was made
    Skipped,
    /// The request may proceed
    Allowed {
        /// Group the decision was made for
        group: String,
    },
    /// The request is rejected with this payload
    Denied(DenialPayload),
}

impl Verdict {
    /// Whether the request should continue down the pipeline
    pub fn is_permitted(&self) -> bool {
        !matches!(self, Self::Denied(_))
    }
}

/// Authorization gate configured once and shared across requests
#[derive(Debug, Clone)]
pub struct AccessGuard {
    engine: PolicyEngine,
    extractor: GroupExtractor,
    exceptions: RouteExceptions,
    denial: DenialPayload,
}

impl AccessGuard {
    /// Build a guard over any policy source
    pub fn new(config: &IamConfig, source: impl PolicySupplier + 'static) -> Result<Self> {
        config.validate()?;

        let guard = Self {
            engine: PolicyEngine::from_config(config, source),
            extractor: GroupExtractor::new(
                config.access_group_search_path.as_deref(),
                config.default_access_group.clone(),
            ),
            exceptions: config.exceptions.clone(),
            denial: DenialPayload::new(config.custom_message.as_deref()),
        };

        info!(
            prefix = %guard.engine.prefix(),
            default_group = %guard.extractor.default_group(),
            exceptions = !guard.exceptions.is_empty(),
            "AccessGuard initialized"
        );
        Ok(guard)
    }

    /// Build a guard over a static raw document, validating it up front.
    ///
    /// An invalid document is a setup error, never a per-request denial.
    pub fn from_value(config: &IamConfig, raw: &Value) -> Result<Self> {
        let document = PolicyDocument::from_value(raw)?;
        Self::new(config, document)
    }

    pub fn engine(&self) -> &PolicyEngine {
        &self.engine
    }

    pub fn extractor(&self) -> &GroupExtractor {
        &self.extractor
    }

    pub fn exceptions(&self) -> &RouteExceptions {
        &self.exceptions
    }

    /// Guard one request.
    ///
    /// `request` carries the group (see [`GroupExtractor`]). `url` is resolved
    /// with [`request_path`] before both the exception check and matching, so
    /// `/public/../admin` is decided as `/admin`.
    pub fn check(&self, request: &Value, url: &str, method: &str) -> Verdict {
        let method_hint = Some(method).filter(|m| !m.is_empty());
        if self.exceptions.should_skip(url, method_hint) {
            debug!(url, method, "route exempt from authorization");
            return Verdict::Skipped;
        }

        let group = self.extractor.extract(request);
        // Unresolvable URLs leave the path empty, which the engine denies.
        let path = request_path(url).unwrap_or_default();

        if self.engine.decide(&path, method, group) {
            Verdict::Allowed {
                group: group.to_string(),
            }
        } else {
            info!(group, path = %path, method, "access denied");
            Verdict::Denied(self.denial.clone())
        }
    }
}
