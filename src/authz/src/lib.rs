//! # IAM Authorization
//!
//! Group-based route authorization for HTTP services.
//!
//! ## Features
//!
//! - **Validated policy documents** with located error messages
//! - **Path patterns** with single-segment and trailing `*` wildcards
//! - **Explicit-before-wildcard** method resolution with first-rule-wins ties
//! - **Dynamic policy suppliers** re-validated on every decision
//! - **Request guard** with group extraction, route exceptions and 403 payloads
//!
//! ## Example
//!
//! ```rust
//! use iam_authz::{AccessGuard, IamConfig, Verdict};
//! use serde_json::json;
//!
//! let policies = json!([
//!     {
//!         "access_group": "guest",
//!         "permissions": [
//!             { "resource": "/test", "methods": ["GET"], "action": "allow" }
//!         ]
//!     }
//! ]);
//!
//! let guard = AccessGuard::from_value(&IamConfig::default(), &policies)?;
//!
//! assert!(matches!(guard.check(&json!({}), "/test", "GET"), Verdict::Allowed { .. }));
//! assert!(matches!(guard.check(&json!({}), "/test", "POST"), Verdict::Denied(_)));
//! # Ok::<(), iam_authz::AuthzError>(())
//! ```

pub mod config;
pub mod denial;
pub mod engine;
pub mod error;
pub mod guard;
pub mod policy;
pub mod request;
pub mod route;
pub mod unless;

// Re-export commonly used types
pub use config::IamConfig;
pub use denial::DenialPayload;
pub use engine::{decide, resolve_group, resolve_method, PolicyEngine};
pub use error::{AuthzError, Result, ValidationError};
pub use guard::{AccessGuard, Verdict};
pub use policy::{
    validate, AccessGroup, DynamicPolicies, Methods, Policy, PolicyDocument, PolicyEffect,
    PolicySupplier,
};
pub use request::{GroupExtractor, GroupSource};
pub use route::{match_path, RoutePattern};
pub use unless::RouteExceptions;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
