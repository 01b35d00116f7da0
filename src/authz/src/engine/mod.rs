//! Policy decision engine
//!
//! Orchestrates group resolution, path matching and method resolution into a
//! single allow/deny decision.
//!
//! # Architecture
//!
//! ```text
//! PolicySupplier → resolve_group → match_path → resolve_method → bool
//!       ↓               ↓              ↓              ↓
//!   [invalid]       [unknown]      [no match]    [deny/none]  → false
//! ```
//!
//! The engine keeps no state between calls: every decision depends only on
//! the document the supplier returns and on the request tuple.

mod decision;
pub mod resolver;

pub use resolver::{resolve_group, resolve_method};

use crate::config::IamConfig;
use crate::policy::PolicySupplier;
use crate::route::match_path;
use decision::Evaluation;

use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Decide whether `group` may perform `method` on `path`.
///
/// Missing request context never raises: an absent source or an empty path,
/// method or group is simply denied. A document that fails validation (only
/// possible for dynamic suppliers) is logged and denied.
///
/// `prefix` is prepended to every policy pattern before matching; pass `""`
/// when the service is not mounted under a prefix.
pub fn decide(
    source: Option<&dyn PolicySupplier>,
    path: &str,
    method: &str,
    group: &str,
    prefix: &str,
) -> bool {
    let outcome = evaluate(source, path, method, group, prefix);
    debug!(group, path, method, prefix, outcome = %outcome, "authorization decision");
    outcome.is_allowed()
}

fn evaluate(
    source: Option<&dyn PolicySupplier>,
    path: &str,
    method: &str,
    group: &str,
    prefix: &str,
) -> Evaluation {
    let Some(source) = source else {
        return Evaluation::MissingInput;
    };
    if path.is_empty() || method.is_empty() || group.is_empty() {
        return Evaluation::MissingInput;
    }

    let document = match source.policies() {
        Ok(document) => document,
        Err(e) => {
            warn!(error = %e, "supplied policy document failed validation, denying request");
            return Evaluation::InvalidPolicies;
        }
    };

    let Some(permissions) = resolve_group(&document, group) else {
        return Evaluation::UnknownGroup;
    };

    let Some(matched) = match_path(permissions, path, prefix) else {
        return Evaluation::NoPathMatch;
    };
    debug!(group, path, matched = matched.len(), "permissions matched path");

    // Any selected set leads with an allow.
    match resolve_method(&matched, method) {
        Some(_) => Evaluation::Allowed,
        None => Evaluation::NoMethodMatch,
    }
}

/// Policy engine bound to one policy source and mount prefix
///
/// Cheap to clone and safe to share across threads; the source is held behind
/// an `Arc`.
#[derive(Clone)]
pub struct PolicyEngine {
    source: Arc<dyn PolicySupplier>,
    prefix: String,
}

impl PolicyEngine {
    /// Create an engine with no mount prefix
    pub fn new(source: impl PolicySupplier + 'static) -> Self {
        Self::from_shared(Arc::new(source), String::new())
    }

    /// Create an engine using the prefix from `config`
    pub fn from_config(config: &IamConfig, source: impl PolicySupplier + 'static) -> Self {
        Self::from_shared(Arc::new(source), config.prefix())
    }

    /// Create an engine over an already shared source
    pub fn from_shared(source: Arc<dyn PolicySupplier>, prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        info!(prefix = %prefix, "PolicyEngine initialized");
        Self { source, prefix }
    }

    /// Replace the mount prefix
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Mount prefix prepended to every policy pattern
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Decide whether `group` may perform `method` on `path`
    pub fn decide(&self, path: &str, method: &str, group: &str) -> bool {
        decide(Some(self.source.as_ref()), path, method, group, &self.prefix)
    }
}

impl fmt::Debug for PolicyEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PolicyEngine")
            .field("prefix", &self.prefix)
            .finish_non_exhaustive()
    }
}
