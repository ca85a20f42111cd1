//! Route canonicalization.
//!
//! ## Summary
//! Catalog route paths are authoritative but not guaranteed to be stored in
//! canonical form, so every comparison between a requested route and a stored
//! one goes through [`normalize`] first. Normalization never fails: input that
//! has no path left after stripping yields the empty string, which matches no
//! catalog entry.

/// Canonicalize a route for comparison.
///
/// - Drops the query string and fragment
/// - Trims surrounding whitespace
/// - Collapses leading slashes into exactly one
/// - Removes trailing slashes unless the path is the root
///
/// Examples:
/// - `"/a/b/"` -> `"/a/b"`
/// - `"/a/b?x=1#top"` -> `"/a/b"`
/// - `"a/b"` -> `"/a/b"`
/// - `"/"` -> `"/"`
/// - `"  "` -> `""`
#[must_use]
pub fn normalize(route: &str) -> String {
    let without_suffix = route
        .trim()
        .split(['?', '#'])
        .next()
        .unwrap_or_default()
        .trim();

    if without_suffix.is_empty() {
        return String::new();
    }

    let path = without_suffix.trim_start_matches('/').trim_end_matches('/');
    format!("/{path}")
}

/// Returns `true` if `route` is `prefix` or lies below it.
///
/// A grant on `/x` covers `/x/add` but not `/xy`. Both sides are normalized
/// first; an empty side never matches.
#[must_use]
pub fn starts_with_route(route: &str, prefix: &str) -> bool {
    is_route_or_child(&normalize(route), &normalize(prefix))
}

/// Case-insensitive variant of [`starts_with_route`], used for catalog matching.
#[must_use]
pub fn starts_with_route_ignore_case(route: &str, prefix: &str) -> bool {
    is_route_or_child(
        &normalize(route).to_lowercase(),
        &normalize(prefix).to_lowercase(),
    )
}

fn is_route_or_child(route: &str, prefix: &str) -> bool {
    if route.is_empty() || prefix.is_empty() {
        return false;
    }

    route == prefix
        || route
            .strip_prefix(prefix)
            .is_some_and(|rest| rest.starts_with('/'))
}
