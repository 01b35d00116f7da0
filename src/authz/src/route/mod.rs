//! Request path matching against policy path patterns
//!
//! Patterns are `/`-delimited. A segment is either a literal, which must
//! equal the request segment at the same position, or `*`, which accepts any
//! single segment. A trailing `*` additionally absorbs every remaining
//! request segment, so `/api/*` matches `/api/v1/users/5` while `/api/v1`
//! does not match `/api/v1/users`.
//!
//! # Examples
//!
//! ```
//! use iam_authz::route::RoutePattern;
//!
//! let pattern = RoutePattern::new("/api/*");
//! assert!(pattern.matches("/api/v1/users/5"));
//! assert!(!RoutePattern::new("/api/v1").matches("/api/v1/users"));
//!
//! // A mount prefix is prepended to the pattern, never stripped from the path.
//! assert!(RoutePattern::with_prefix("/api/v1", "/test").matches("/api/v1/test"));
//! ```

mod matcher;
mod types;


pub use matcher::match_path;
pub use types::{tokenize, RoutePattern, Segment, SEPARATOR, WILDCARD};
