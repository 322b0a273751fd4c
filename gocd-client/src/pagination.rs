//! Offset pagination for list and lookup paths
//!
//! GoCD pages history and instance lookups with a literal offset segment
//! appended to the resource path: `pipelines/foo/history` is the first page,
//! `pipelines/foo/history/10` starts ten runs further back.

/// Placeholder replaced by the pipeline name in path templates
pub const NAME_PLACEHOLDER: &str = "{name}";

/// Build a resource path for the page starting at `offset`
///
/// `template` must contain [`NAME_PLACEHOLDER`]. Offsets of zero or below yield
/// the first page.
pub fn build_paginated_stub(template: &str, name: &str, offset: i64) -> String {
    let stub = template.replacen(NAME_PLACEHOLDER, name, 1);
    if offset > 0 {
        format!("{}/{}", stub, offset)
    } else {
        stub
    }
}
