//! Access group extraction from request objects
//!
//! A request is seen as an untyped JSON value (the shape a framework adapter
//! would build from session, locals and request fields). The caller's group is
//! found by trying an ordered list of [`GroupSource`] strategies and falling
//! back to a default group.

use serde_json::Value;

/// Group assigned when no strategy finds one
pub const DEFAULT_ACCESS_GROUP: &str = "guest";

/// One place a request may carry its access group
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupSource {
    /// Dotted or slash-delimited path, e.g. `session.user.group` or
    /// `auth/roles/0`; numeric segments index arrays
    SearchPath(String),
    /// `session.group`
    Session,
    /// `locals.group`
    Locals,
    /// Top-level `group`
    TopLevel,
}

impl GroupSource {
    /// Look the group up in `request`. Only non-empty strings count.
    pub fn lookup<'a>(&self, request: &'a Value) -> Option<&'a str> {
        let value = match self {
            Self::SearchPath(path) => lookup_path(request, path),
            Self::Session => request.get("session").and_then(|s| s.get("group")),
            Self::Locals => request.get("locals").and_then(|l| l.get("group")),
            Self::TopLevel => request.get("group"),
        }?;

        value.as_str().filter(|group| !group.is_empty())
    }
}

fn lookup_path<'a>(request: &'a Value, path: &str) -> Option<&'a Value> {
    let pointer: String = path
        .split(|c: char| c == '.' || c == '/')
        .filter(|segment| !segment.is_empty())
        .map(|segment| format!("/{}", segment.replace('~', "~0")))
        .collect();

    if pointer.is_empty() {
        return None;
    }
    request.pointer(&pointer)
}

/// Ordered group lookup with a default
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupExtractor {
    sources: Vec<GroupSource>,
    default_group: String,
}

impl GroupExtractor {
    /// Standard lookup order: the search path (if any), then `session.group`,
    /// `locals.group` and `group`.
    pub fn new(search_path: Option<&str>, default_group: impl Into<String>) -> Self {
        let mut sources = Vec::with_capacity(4);
        if let Some(path) = search_path.filter(|p| !p.is_empty()) {
            sources.push(GroupSource::SearchPath(path.to_string()));
        }
        sources.extend([GroupSource::Session, GroupSource::Locals, GroupSource::TopLevel]);

        Self::with_sources(sources, default_group)
    }

    /// Custom lookup order
    pub fn with_sources(sources: Vec<GroupSource>, default_group: impl Into<String>) -> Self {
        Self {
            sources,
            default_group: default_group.into(),
        }
    }

    pub fn sources(&self) -> &[GroupSource] {
        &self.sources
    }

    pub fn default_group(&self) -> &str {
        &self.default_group
    }

    /// First group found by the sources, in order, or the default group
    pub fn extract<'a>(&'a self, request: &'a Value) -> &'a str {
        self.sources
            .iter()
            .find_map(|source| source.lookup(request))
            .unwrap_or(self.default_group.as_str())
    }
}

impl Default for GroupExtractor {
    fn default() -> Self {
        Self::new(None, DEFAULT_ACCESS_GROUP)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_default_group_when_absent() {
        let extractor = GroupExtractor::default();
        assert_eq!(extractor.extract(&json!({})), "guest");
        assert_eq!(extractor.extract(&Value::Null), "guest");
    }

    #[test]
    fn test_session_group() {
        let extractor = GroupExtractor::default();
        assert_eq!(extractor.extract(&json!({ "session": { "group": "admin" } })), "admin");
    }

    #[test]
    fn test_locals_group() {
        let extractor = GroupExtractor::default();
        assert_eq!(extractor.extract(&json!({ "locals": { "group": "admin" } })), "admin");
    }

    #[test]
    fn test_top_level_group() {
        let extractor = GroupExtractor::default();
        assert_eq!(extractor.extract(&json!({ "group": "admin" })), "admin");
    }

    #[test]
    fn test_lookup_order() {
        let extractor = GroupExtractor::new(Some("session.user.group"), "guest");
        let request = json!({
            "session": { "group": "session-group", "user": { "group": "search-group" } },
            "locals": { "group": "locals-group" },
            "group": "top-group"
        });
        assert_eq!(extractor.extract(&request), "search-group");

        let request = json!({
            "session": { "group": "session-group" },
            "locals": { "group": "locals-group" },
            "group": "top-group"
        });
        assert_eq!(extractor.extract(&request), "session-group");

        let request = json!({ "locals": { "group": "locals-group" }, "group": "top-group" });
        assert_eq!(extractor.extract(&request), "locals-group");
    }

    #[test]
    fn test_search_path_forms() {
        let request = json!({ "auth": { "roles": ["editor", "viewer"] } });

        let dotted = GroupExtractor::new(Some("auth.roles.1"), "guest");
        assert_eq!(dotted.extract(&request), "viewer");

        let slashed = GroupExtractor::new(Some("auth/roles/0"), "guest");
        assert_eq!(slashed.extract(&request), "editor");

        let missing = GroupExtractor::new(Some("auth.team"), "guest");
        assert_eq!(missing.extract(&request), "guest");
    }

    #[test]
    fn test_non_string_and_empty_values_are_skipped() {
        let extractor = GroupExtractor::default();
        let request = json!({ "session": { "group": 5 }, "locals": { "group": "" }, "group": "member" });
        assert_eq!(extractor.extract(&request), "member");
    }

    #[test]
    fn test_custom_default_and_sources() {
        let extractor = GroupExtractor::with_sources(vec![GroupSource::TopLevel], "anonymous");
        assert_eq!(extractor.extract(&json!({ "session": { "group": "admin" } })), "anonymous");
        assert_eq!(extractor.default_group(), "anonymous");
        assert_eq!(extractor.sources(), &[GroupSource::TopLevel]);
    }

    #[test]
    fn test_empty_search_path_is_ignored() {
        let extractor = GroupExtractor::new(Some(""), "guest");
        assert_eq!(extractor.sources().len(), 3);
        assert!(GroupSource::SearchPath("..".to_string()).lookup(&json!("admin")).is_none());
    }
}
