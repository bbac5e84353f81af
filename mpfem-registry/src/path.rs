//! Dotted path names.
//!
//! A path such as `"solvers.linear.tolerance"` addresses an item relative to the root of a
//! registry. The empty string addresses the root itself. Every other string is split on each
//! separator, and empty segments are kept as literal empty names: `".a"` is `["", "a"]`,
//! `"a."` is `["a", ""]` and `"a..b"` is `["a", "", "b"]`. A child of the root named `""` can
//! therefore only be reached through paths that continue past it.

pub const PATH_SEPARATOR: char = '.';

/// Splits a dotted path into its segments.
pub fn split_path(path: &str) -> Vec<&str> {
    if path.is_empty() {
        Vec::new()
    } else {
        path.split(PATH_SEPARATOR).collect()
    }
}

/// Splits a path into the segments leading to its parent and the terminal segment.
///
/// Returns `None` for the root path.
pub fn split_leaf(path: &str) -> Option<(Vec<&str>, &str)> {
    let mut segments = split_path(path);
    let leaf = segments.pop()?;
    Some((segments, leaf))
}

/// Joins segments into a dotted path.
///
/// This is the inverse of [`split_path`], except that a single empty segment cannot be told
/// apart from the root path.
pub fn join_path<'a>(segments: impl IntoIterator<Item = &'a str>) -> String {
    let mut path = String::new();
    for (i, segment) in segments.into_iter().enumerate() {
        if i > 0 {
            path.push(PATH_SEPARATOR);
        }
        path.push_str(segment);
    }
    path
}
