//! Route exceptions that bypass authorization entirely
//!
//! Unlike policy patterns, exception paths are compared literally (no
//! wildcards) against the resolved request path: origin, query string and
//! fragment removed, dot segments collapsed.

use serde::{Deserialize, Deserializer, Serialize};
use tracing::debug;
use url::Url;

/// A literal path exempt from authorization, optionally only for some methods
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PathException {
    /// Path exempt for every method
    Path(String),
    /// Path exempt for the listed methods, or every method when none are listed
    Rule {
        path: String,
        #[serde(
            default,
            skip_serializing_if = "Option::is_none",
            deserialize_with = "optional_one_or_many"
        )]
        methods: Option<Vec<String>>,
    },
}

impl PathException {
    pub fn path(&self) -> &str {
        match self {
            Self::Path(path) | Self::Rule { path, .. } => path,
        }
    }

    /// Methods this exception is restricted to; `None` means every method
    pub fn methods(&self) -> Option<&[String]> {
        match self {
            Self::Path(_) => None,
            Self::Rule { methods, .. } => methods.as_deref(),
        }
    }

    /// Whether a request for `path` with `method` is exempt
    pub fn matches(&self, path: &str, method: Option<&str>) -> bool {
        if self.path() != path {
            return false;
        }
        match (self.methods(), method) {
            (None, _) => true,
            (Some(methods), Some(method)) => methods.iter().any(|m| m == method),
            (Some(_), None) => false,
        }
    }
}

/// Paths and methods for which authorization is skipped
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteExceptions {
    /// Literal path exceptions
    #[serde(default, deserialize_with = "one_or_many")]
    pub paths: Vec<PathException>,

    /// Methods exempt on every path
    #[serde(default, deserialize_with = "one_or_many")]
    pub methods: Vec<String>,
}

impl RouteExceptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Exempt `path` for every method
    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.paths.push(PathException::Path(path.into()));
        self
    }

    /// Exempt `path` for the given methods only
    pub fn path_with_methods<I, S>(mut self, path: impl Into<String>, methods: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.paths.push(PathException::Rule {
            path: path.into(),
            methods: Some(methods.into_iter().map(Into::into).collect()),
        });
        self
    }

    /// Exempt `method` on every path
    pub fn method(mut self, method: impl Into<String>) -> Self {
        self.methods.push(method.into());
        self
    }

    /// Combine two exception sets; a request skipped by either is skipped
    pub fn or(mut self, other: RouteExceptions) -> Self {
        self.paths.extend(other.paths);
        self.methods.extend(other.methods);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty() && self.methods.is_empty()
    }

    /// Whether authorization should be skipped for this request
    ///
    /// `url` may be a bare path, a path with query string, or an absolute URL;
    /// see [`request_path`] for how it is resolved.
    pub fn should_skip(&self, url: &str, method: Option<&str>) -> bool {
        let path_exempt = request_path(url).is_some_and(|path| {
            self.paths
                .iter()
                .any(|exception| exception.matches(&path, method))
        });
        let method_exempt = method.is_some_and(|m| self.methods.iter().any(|exempt| exempt == m));

        path_exempt || method_exempt
    }
}

/// Base the request URL is resolved against
const BASE_URL: &str = "http://localhost";

/// Path component of a request URL, resolved the way a browser would.
///
/// The URL is joined onto a fixed origin, so dot segments are removed, the
/// path is percent-encoded and query string and fragment are dropped. A
/// protocol-relative URL (`//host/path`) names a host, not a path. `None` when
/// the URL cannot be resolved.
pub fn request_path(url: &str) -> Option<String> {
    let resolved = Url::parse(BASE_URL).and_then(|base| base.join(url));

    match resolved {
        Ok(resolved) if resolved.path().is_empty() => Some("/".to_string()),
        Ok(resolved) => Some(resolved.path().to_string()),
        Err(e) => {
            debug!(url, error = %e, "request url could not be resolved");
            None
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

impl<T> From<OneOrMany<T>> for Vec<T> {
    fn from(value: OneOrMany<T>) -> Self {
        match value {
            OneOrMany::Many(items) => items,
            OneOrMany::One(item) => vec![item],
        }
    }
}

fn one_or_many<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    OneOrMany::deserialize(deserializer).map(Into::into)
}

fn optional_one_or_many<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<OneOrMany<String>>::deserialize(deserializer).map(|value| value.map(Into::into))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn exceptions() -> RouteExceptions {
        RouteExceptions::new()
            .path_with_methods("/test", ["POST", "GET"])
            .path_with_methods("/bar", ["PUT"])
            .path("/foo")
    }

    #[test]
    fn test_path_and_method_match_skips() {
        let rules = exceptions();
        assert!(rules.should_skip("/test", Some("POST")));
        assert!(rules.should_skip("/test", Some("GET")));
        assert!(rules.should_skip("/bar", Some("PUT")));
        assert!(rules.should_skip("/foo", Some("PUT")));
        assert!(rules.should_skip("/foo", None));
    }

    #[test]
    fn test_path_or_method_mismatch_does_not_skip() {
        let rules = exceptions();
        assert!(!rules.should_skip("/test?test=123", Some("PUT")));
        assert!(!rules.should_skip("/bar?test=123", Some("GET")));
        assert!(!rules.should_skip("/unless?test=123", Some("PUT")));
        assert!(!rules.should_skip("/test", None));
    }

    #[test]
    fn test_paths_are_literal() {
        let rules = RouteExceptions::new().path("/api/*");
        assert!(!rules.should_skip("/api/users", Some("GET")));
        assert!(rules.should_skip("/api/*", Some("GET")));
        assert!(!RouteExceptions::new().path("/foo").should_skip("/foobar/test=123", None));
    }

    #[test]
    fn test_query_and_fragment_are_ignored() {
        let rules = RouteExceptions::new().path("/health");
        assert!(rules.should_skip("/health?verbose=1", Some("GET")));
        assert!(rules.should_skip("/health#top", Some("GET")));
        assert!(rules.should_skip("https://example.com/health?x=1", Some("GET")));
    }

    #[test]
    fn test_method_exceptions() {
        let rules = RouteExceptions::new().method("OPTIONS").method("DELETE");
        assert!(rules.should_skip("/foo", Some("OPTIONS")));
        assert!(!rules.should_skip("/foobar/test", Some("PUT")));
        assert!(!rules.should_skip("/foo", None));
    }

    #[test]
    fn test_chaining() {
        let rules = RouteExceptions::new()
            .path("/test")
            .or(RouteExceptions::new().method("GET"));

        assert!(rules.should_skip("/test", None));
        assert!(rules.should_skip("/foo", Some("GET")));
        assert!(!rules.should_skip("/foobar/test", None));
    }

    #[test]
    fn test_empty_exceptions_never_skip() {
        let rules = RouteExceptions::default();
        assert!(rules.is_empty());
        assert!(!rules.should_skip("/", Some("GET")));
    }

    #[test]
    fn test_request_path() {
        assert_eq!(request_path("/a/b?c=d").as_deref(), Some("/a/b"));
        assert_eq!(request_path("/a/b#frag").as_deref(), Some("/a/b"));
        assert_eq!(request_path("http://host:8080/a/b?c").as_deref(), Some("/a/b"));
        assert_eq!(request_path("http://host").as_deref(), Some("/"));
        assert_eq!(request_path("").as_deref(), Some("/"));
    }

    #[test]
    fn test_request_path_removes_dot_segments() {
        assert_eq!(request_path("/foo/../health").as_deref(), Some("/health"));
        assert_eq!(request_path("/./health").as_deref(), Some("/health"));
        assert_eq!(request_path("/a/b/../../health?x=1").as_deref(), Some("/health"));
        assert_eq!(request_path("/../../health").as_deref(), Some("/health"));
    }

    #[test]
    fn test_request_path_protocol_relative_names_host() {
        assert_eq!(request_path("//evil/health").as_deref(), Some("/health"));
        assert_eq!(request_path("//evil").as_deref(), Some("/"));
    }

    #[test]
    fn test_request_path_percent_encodes() {
        assert_eq!(request_path("/a b").as_deref(), Some("/a%20b"));
    }

    #[test]
    fn test_request_path_unresolvable() {
        assert_eq!(request_path("http://[::1/health"), None);
        assert!(!RouteExceptions::new().path("/health").should_skip("http://[::1/health", Some("GET")));
        assert!(RouteExceptions::new().method("GET").should_skip("http://[::1/health", Some("GET")));
    }

    #[test]
    fn test_dot_segments_match_exceptions() {
        let rules = RouteExceptions::new().path("/health");
        assert!(rules.should_skip("/foo/../health", Some("GET")));
        assert!(rules.should_skip("/./health", Some("GET")));
        assert!(rules.should_skip("//evil/health", Some("GET")));
        assert!(!rules.should_skip("/health/../admin", Some("GET")));
    }

    #[test]
    fn test_deserialize_mixed_forms() {
        let rules: RouteExceptions = serde_json::from_value(json!({
            "paths": [
                { "path": "/test", "methods": ["POST", "GET"] },
                { "path": "/bar", "methods": "PUT" },
                { "path": "/baz" },
                "/foo"
            ],
            "methods": "OPTIONS"
        }))
        .unwrap();

        assert_eq!(rules.paths.len(), 4);
        assert_eq!(rules.paths[1].methods(), Some(&["PUT".to_string()][..]));
        assert_eq!(rules.paths[2].methods(), None);
        assert_eq!(rules.paths[3], PathException::Path("/foo".to_string()));
        assert_eq!(rules.methods, vec!["OPTIONS".to_string()]);

        assert!(rules.should_skip("/baz", Some("PATCH")));
        assert!(!rules.should_skip("/bar", Some("GET")));
    }

    #[test]
    fn test_deserialize_single_path() {
        let rules: RouteExceptions = serde_json::from_value(json!({ "paths": "/test" })).unwrap();
        assert_eq!(rules.paths, vec![PathException::Path("/test".to_string())]);
        assert!(rules.methods.is_empty());
    }
}
