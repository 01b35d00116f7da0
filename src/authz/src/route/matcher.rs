//! Filtering a group's permissions by request path

use super::types::RoutePattern;
use crate::policy::Policy;
use tracing::trace;

/// Return every permission whose pattern, with `prefix` prepended, matches
/// `request_path`, in original order.
///
/// Returns `None` when no permission matches.
pub fn match_path<'a>(
    permissions: &'a [Policy],
    request_path: &str,
    prefix: &str,
) -> Option<Vec<&'a Policy>> {
    let matched: Vec<&Policy> = permissions
        .iter()
        .filter(|policy| {
            let pattern = RoutePattern::with_prefix(prefix, &policy.resource);
            let hit = pattern.matches(request_path);
            trace!(pattern = %pattern, path = request_path, hit, "path pattern checked");
            hit
        })
        .collect();

    if matched.is_empty() {
        None
    } else {
        Some(matched)
    }
}
