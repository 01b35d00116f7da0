//! Route pattern representation

use std::fmt;
use std::str::FromStr;

/// Path segment separator
pub const SEPARATOR: char = '/';

/// Segment wildcard token
pub const WILDCARD: &str = "*";

/// Split a path into its raw segments.
///
/// Leading, trailing and repeated separators yield empty segments, so
/// `/test` is `["", "test"]` and `/test/` is `["", "test", ""]`.
pub fn tokenize(path: &str) -> Vec<&str> {
    path.split(SEPARATOR).collect()
}

/// One segment of a route pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Segment<'a> {
    /// Must equal the request segment
    Literal(&'a str),
    /// Accepts any request segment
    Wildcard,
}

impl<'a> Segment<'a> {
    fn parse(token: &'a str) -> Self {
        if token == WILDCARD {
            Self::Wildcard
        } else {
            Self::Literal(token)
        }
    }

    /// Whether this segment accepts the request segment `token`
    pub fn accepts(&self, token: &str) -> bool {
        match self {
            Self::Wildcard => true,
            Self::Literal(literal) => *literal == token,
        }
    }
}

/// A policy path pattern, optionally composed with a mount prefix
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RoutePattern {
    raw: String,
}

impl RoutePattern {
    /// Pattern without a prefix
    pub fn new(resource: impl Into<String>) -> Self {
        Self {
            raw: resource.into(),
        }
    }

    /// Pattern with `prefix` prepended verbatim (no separator is inserted)
    pub fn with_prefix(prefix: &str, resource: &str) -> Self {
        let mut raw = String::with_capacity(prefix.len() + resource.len());
        raw.push_str(prefix);
        raw.push_str(resource);
        Self { raw }
    }

    /// Returns the composed pattern string
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Returns the parsed segments
    pub fn segments(&self) -> Vec<Segment<'_>> {
        self.raw.split(SEPARATOR).map(Segment::parse).collect()
    }

    /// Number of segments
    pub fn depth(&self) -> usize {
        self.raw.split(SEPARATOR).count()
    }

    /// Whether the final segment is `*`
    pub fn has_trailing_wildcard(&self) -> bool {
        self.raw.rsplit(SEPARATOR).next() == Some(WILDCARD)
    }

    /// Checks whether a concrete request path satisfies this pattern
    ///
    /// The match fails when:
    /// - the request has fewer segments than the pattern;
    /// - a pattern literal differs from the request segment at its position;
    /// - the request runs past the end of the pattern and the pattern does
    ///   not end in `*`.
    pub fn matches(&self, request_path: &str) -> bool {
        let request = tokenize(request_path);
        let pattern = self.segments();

        if request.len() < pattern.len() {
            return false;
        }

        let absorbs_remainder = matches!(pattern.last(), Some(Segment::Wildcard));

        request
            .iter()
            .enumerate()
            .all(|(i, token)| match pattern.get(i) {
                Some(segment) => segment.accepts(token),
                None => absorbs_remainder,
            })
    }
}

impl FromStr for RoutePattern {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

impl fmt::Display for RoutePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}
