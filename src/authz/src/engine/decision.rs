//! Pipeline outcomes
//!
//! The public decision surface is a plain boolean. The stage at which a
//! request was turned away is kept inside the crate for diagnostics only.

use std::fmt;

/// Where one evaluation pass ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Evaluation {
    /// A leading allow rule was selected
    Allowed,
    /// Path, method, group or policy source was absent or empty
    MissingInput,
    /// The supplied document failed validation
    InvalidPolicies,
    /// No access group with the requested id
    UnknownGroup,
    /// No permission pattern matched the request path
    NoPathMatch,
    /// No applicable method rule, or an explicit deny for the method
    NoMethodMatch,
}

impl Evaluation {
    pub(crate) fn is_allowed(self) -> bool {
        self == Self::Allowed
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::Allowed => "allowed",
            Self::MissingInput => "missing request context or policies",
            Self::InvalidPolicies => "policy document failed validation",
            Self::UnknownGroup => "access group not found",
            Self::NoPathMatch => "no permission matches the path",
            Self::NoMethodMatch => "no permission allows the method",
        }
    }
}

impl fmt::Display for Evaluation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
