//! Policy definition and supply
//!
//! A [`PolicyDocument`] is an ordered list of [`AccessGroup`]s, each holding
//! the ordered [`Policy`] entries granted or denied to that group. Documents
//! can only be obtained through validation, either from a raw JSON value
//! ([`schema::validate`]) or from typed values ([`PolicyDocument::new`]).

pub mod schema;
pub mod source;

pub use schema::validate;
pub use source::{DynamicPolicies, PolicySupplier};

use crate::error::ValidationError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::collections::HashSet;
use std::fmt;

/// Policy effect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PolicyEffect {
    /// Allow the action
    Allow,
    /// Deny the action
    Deny,
}

impl PolicyEffect {
    /// Wire token of this effect
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Allow => "allow",
            Self::Deny => "deny",
        }
    }

    /// Exact, case-sensitive parse of a wire token
    pub fn parse(token: &str) -> Option<Self> {
        match token {
            "allow" => Some(Self::Allow),
            "deny" => Some(Self::Deny),
            _ => None,
        }
    }
}

impl fmt::Display for PolicyEffect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Methods a policy applies to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Methods {
    /// Every method (`"*"`)
    Any,
    /// An explicit, non-empty list of method tokens
    Only(Vec<String>),
}

impl Methods {
    /// Token standing for every method
    pub const WILDCARD: &'static str = "*";

    /// Build an explicit method list
    pub fn only<I, S>(methods: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Only(methods.into_iter().map(Into::into).collect())
    }

    /// Whether this is the wildcard form
    pub fn is_any(&self) -> bool {
        matches!(self, Self::Any)
    }

    /// Whether the explicit list names `method`.
    ///
    /// Always false for [`Methods::Any`]; comparison is case-sensitive.
    pub fn names(&self, method: &str) -> bool {
        match self {
            Self::Any => false,
            Self::Only(list) => list.iter().any(|m| m == method),
        }
    }
}

impl Serialize for Methods {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Any => serializer.serialize_str(Self::WILDCARD),
            Self::Only(list) => list.serialize(serializer),
        }
    }
}

/// Policy definition: one path pattern, method set and effect
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Policy {
    /// Path pattern (e.g., "/api/*", "/users/*/profile")
    pub resource: String,

    /// Methods the rule applies to
    pub methods: Methods,

    /// Effect when the rule applies
    pub action: PolicyEffect,
}

impl Policy {
    /// Create a new policy
    pub fn new(resource: impl Into<String>, methods: Methods, action: PolicyEffect) -> Self {
        Self {
            resource: resource.into(),
            methods,
            action,
        }
    }

    /// Allow policy
    pub fn allow(resource: impl Into<String>, methods: Methods) -> Self {
        Self::new(resource, methods, PolicyEffect::Allow)
    }

    /// Deny policy
    pub fn deny(resource: impl Into<String>, methods: Methods) -> Self {
        Self::new(resource, methods, PolicyEffect::Deny)
    }

    pub fn is_allow(&self) -> bool {
        self.action == PolicyEffect::Allow
    }
}

/// Named role bucket and its ordered permissions
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccessGroup {
    /// Access group identifier (e.g., "guest", "admin")
    #[serde(rename = "access_group")]
    pub id: String,

    /// Ordered permissions; order decides method-resolution ties
    pub permissions: Vec<Policy>,
}

impl AccessGroup {
    /// Create a new access group
    pub fn new(id: impl Into<String>, permissions: Vec<Policy>) -> Self {
        Self {
            id: id.into(),
            permissions,
        }
    }
}

/// Validated, immutable policy set
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PolicyDocument {
    groups: Vec<AccessGroup>,
}

impl PolicyDocument {
    /// Build a document from typed groups, enforcing the document invariants:
    /// at least one group, non-empty unique ids, non-empty path patterns and
    /// non-empty explicit method lists.
    pub fn new(groups: Vec<AccessGroup>) -> Result<Self, ValidationError> {
        check_invariants(&groups)?;
        Ok(Self { groups })
    }

    /// Validate a raw JSON value into a document
    pub fn from_value(raw: &Value) -> Result<Self, ValidationError> {
        schema::validate(raw)
    }

    /// Groups in insertion order
    pub fn groups(&self) -> &[AccessGroup] {
        &self.groups
    }

    /// First group whose id equals `id` exactly
    pub fn group(&self, id: &str) -> Option<&AccessGroup> {
        self.groups.iter().find(|g| g.id == id)
    }

    /// Number of access groups
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Always false for a validated document
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

fn check_invariants(groups: &[AccessGroup]) -> Result<(), ValidationError> {
    if groups.is_empty() {
        return Err(ValidationError::MissingPolicy);
    }

    let mut seen: HashSet<&str> = HashSet::with_capacity(groups.len());
    for (index, group) in groups.iter().enumerate() {
        if group.id.is_empty() {
            return Err(ValidationError::malformed(
                format!("[{}].access_group", index),
                "must not be empty",
            ));
        }
        if !seen.insert(group.id.as_str()) {
            return Err(ValidationError::DuplicateGroup {
                index,
                group: group.id.clone(),
            });
        }

        for (p_index, policy) in group.permissions.iter().enumerate() {
            let location = format!("[{}].permissions[{}]", index, p_index);
            if policy.resource.is_empty() {
                return Err(ValidationError::malformed(
                    format!("{}.resource", location),
                    "must not be empty",
                ));
            }
            if let Methods::Only(list) = &policy.methods {
                if list.is_empty() {
                    return Err(ValidationError::malformed(
                        format!("{}.methods", location),
                        "must contain at least one method",
                    ));
                }
                if let Some(pos) = list.iter().position(|m| m.is_empty()) {
                    return Err(ValidationError::malformed(
                        format!("{}.methods[{}]", location, pos),
                        "must not be empty",
                    ));
                }
            }
        }
    }

    Ok(())
}

impl TryFrom<Value> for PolicyDocument {
    type Error = ValidationError;

    fn try_from(raw: Value) -> Result<Self, Self::Error> {
        schema::validate(&raw)
    }
}

impl<'de> Deserialize<'de> for PolicyDocument {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Value::deserialize(deserializer)?;
        schema::validate(&raw).map_err(serde::de::Error::custom)
    }
}
