//! Policy sources
//!
//! Static documents and dynamic suppliers implement the same
//! [`PolicySupplier`] capability, so the engine has a single code path for
//! both. Dynamic output is re-validated on every call and never cached.

use super::{schema, PolicyDocument};
use crate::error::ValidationError;
use serde_json::Value;
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;
use tracing::warn;

/// Supplies the policy document used for one decision
pub trait PolicySupplier: Send + Sync {
    /// Return a validated document, or the validation error of this call's
    /// document.
    fn policies(&self) -> Result<Cow<'_, PolicyDocument>, ValidationError>;
}

impl PolicySupplier for PolicyDocument {
    fn policies(&self) -> Result<Cow<'_, PolicyDocument>, ValidationError> {
        Ok(Cow::Borrowed(self))
    }
}

impl<T: PolicySupplier + ?Sized> PolicySupplier for Arc<T> {
    fn policies(&self) -> Result<Cow<'_, PolicyDocument>, ValidationError> {
        (**self).policies()
    }
}

/// Policies produced by a zero-argument function at decision time
///
/// The function's output cannot be checked ahead of time; it is validated
/// on every call and a failure surfaces as a validation error for that call
/// only.
pub struct DynamicPolicies<F> {
    supplier: F,
}

impl<F> DynamicPolicies<F>
where
    F: Fn() -> Value + Send + Sync,
{
    /// Wrap a policy-producing function
    pub fn new(supplier: F) -> Self {
        warn!("using access policies from a custom function; its output is validated on every decision");
        Self { supplier }
    }
}

impl<F> PolicySupplier for DynamicPolicies<F>
where
    F: Fn() -> Value + Send + Sync,
{
    fn policies(&self) -> Result<Cow<'_, PolicyDocument>, ValidationError> {
        let raw = (self.supplier)();
        schema::validate(&raw).map(Cow::Owned)
    }
}

impl<F> fmt::Debug for DynamicPolicies<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DynamicPolicies").finish_non_exhaustive()
    }
}
