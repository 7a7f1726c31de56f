//! Dotted field-path helpers.

/// Segment depth of a dotted path; 0 means top level.
pub(crate) fn depth(path: &str) -> usize {
    path.matches('.').count()
}

/// The top-level segment of a dotted path.
pub(crate) fn root_segment(path: &str) -> &str {
    path.split('.').next().unwrap_or(path)
}

/// Strips `parent` from `path` when `path` is a strict descendant, returning
/// the local remainder.
pub(crate) fn strip_parent<'a>(path: &'a str, parent: &str) -> Option<&'a str> {
    path.strip_prefix(parent)?.strip_prefix('.')
}
