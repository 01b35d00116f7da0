//! Group and method resolution

use crate::policy::{Policy, PolicyDocument, PolicyEffect};

/// Permissions of the access group whose id equals `group` exactly, in
/// original order. `None` when the document has no such group.
pub fn resolve_group<'a>(document: &'a PolicyDocument, group: &str) -> Option<&'a [Policy]> {
    document.group(group).map(|g| g.permissions.as_slice())
}

/// Select the permissions that govern `method` among path-matched ones.
///
/// Precedence:
/// 1. Rules naming `method` explicitly win over wildcard rules. If the first
///    of them is a deny, the method is denied outright.
/// 2. Otherwise the explicit rules are returned.
/// 3. With no explicit rule, wildcard rules are returned when the first of
///    them is an allow.
/// 4. Anything else resolves to `None` (default deny).
pub fn resolve_method<'a>(matched: &[&'a Policy], method: &str) -> Option<Vec<&'a Policy>> {
    let specific: Vec<&Policy> = matched
        .iter()
        .copied()
        .filter(|p| p.methods.names(method))
        .collect();

    if let Some(first) = specific.first() {
        return match first.action {
            PolicyEffect::Deny => None,
            PolicyEffect::Allow => Some(specific),
        };
    }

    let wildcard: Vec<&Policy> = matched
        .iter()
        .copied()
        .filter(|p| p.methods.is_any())
        .collect();

    match wildcard.first() {
        Some(first) if first.is_allow() => Some(wildcard),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::{AccessGroup, Methods};

    #[test]
    fn test_resolve_group_exact_match() {
        let doc = PolicyDocument::new(vec![
            AccessGroup::new("guest", vec![Policy::allow("/test", Methods::Any)]),
            AccessGroup::new("admin", vec![]),
        ])
        .unwrap();

        assert_eq!(resolve_group(&doc, "guest").unwrap().len(), 1);
        assert_eq!(resolve_group(&doc, "admin").unwrap().len(), 0);
        assert!(resolve_group(&doc, "Guest").is_none());
        assert!(resolve_group(&doc, "*").is_none());
        assert!(resolve_group(&doc, "").is_none());
    }

    #[test]
    fn test_specific_allow() {
        let get = Policy::allow("/test", Methods::only(["GET"]));
        let post = Policy::deny("/test", Methods::only(["POST"]));
        let matched = vec![&get, &post];

        assert_eq!(resolve_method(&matched, "GET"), Some(vec![&get]));
        assert_eq!(resolve_method(&matched, "POST"), None);
        assert_eq!(resolve_method(&matched, "PUT"), None);
    }

    #[test]
    fn test_specific_deny_beats_wildcard_allow() {
        let all = Policy::allow("/items", Methods::Any);
        let delete = Policy::deny("/items", Methods::only(["DELETE"]));
        let matched = vec![&all, &delete];

        assert_eq!(resolve_method(&matched, "DELETE"), None);
        assert_eq!(resolve_method(&matched, "GET"), Some(vec![&all]));
        assert_eq!(resolve_method(&matched, "PATCH"), Some(vec![&all]));
    }

    #[test]
    fn test_specific_allow_beats_wildcard_deny() {
        let none = Policy::deny("/items", Methods::Any);
        let get = Policy::allow("/items", Methods::only(["GET"]));
        let matched = vec![&none, &get];

        assert_eq!(resolve_method(&matched, "GET"), Some(vec![&get]));
        assert_eq!(resolve_method(&matched, "POST"), None);
    }

    #[test]
    fn test_first_specific_rule_decides() {
        let allow = Policy::allow("/a", Methods::only(["GET", "POST"]));
        let deny = Policy::deny("/a", Methods::only(["GET"]));

        assert_eq!(resolve_method(&[&allow, &deny], "GET"), Some(vec![&allow, &deny]));
        assert_eq!(resolve_method(&[&deny, &allow], "GET"), None);
    }

    #[test]
    fn test_first_wildcard_rule_decides() {
        let allow = Policy::allow("/a", Methods::Any);
        let deny = Policy::deny("/a/*", Methods::Any);

        assert_eq!(resolve_method(&[&allow, &deny], "PUT"), Some(vec![&allow, &deny]));
        assert_eq!(resolve_method(&[&deny, &allow], "PUT"), None);
    }

    #[test]
    fn test_no_rules() {
        assert_eq!(resolve_method(&[], "GET"), None);
    }
}
