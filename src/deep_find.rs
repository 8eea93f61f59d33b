//! Path-preserving depth-first search over any tree of same-shaped nodes.
//!
//! The search is parameterized by two accessors: one yielding a node's
//! children and one yielding the string compared against the target. Taxons,
//! navigation entries, and untyped JSON trees all go through the same walk, and
//! every hit carries the ancestry needed to render a breadcrumb trail.

use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Serialize)]
/// A matched node and the nodes leading to it, outermost first.
///
/// `path` always ends with `result`.
pub struct Found<'a, T> {
    pub result: &'a T,
    pub path: Vec<&'a T>,
}

impl<'a, T> Clone for Found<'a, T> {
    fn clone(&self) -> Self {
        Self {
            result: self.result,
            path: self.path.clone(),
        }
    }
}

impl<'a, T> Found<'a, T> {
    /// Ancestors of the match, excluding the match itself.
    pub fn ancestors(&self) -> &[&'a T] {
        &self.path[..self.path.len().saturating_sub(1)]
    }

    pub fn depth(&self) -> usize {
        self.path.len()
    }
}

/// Pre-order search for the first node whose match field equals `value`.
///
/// Absent and empty node lists are both "no match", and so is a node whose
/// match field is absent. Comparison is exact and case-sensitive. A node is
/// tested before its children, and the first hit ends the search.
pub fn deep_find<'a, T, C, M>(
    nodes: Option<&'a [T]>,
    children: &C,
    match_field: &M,
    value: &str,
) -> Option<Found<'a, T>>
where
    C: Fn(&'a T) -> Option<&'a [T]>,
    M: Fn(&'a T) -> Option<&'a str>,
{
    for node in nodes? {
        if match_field(node) == Some(value) {
            return Some(Found {
                result: node,
                path: vec![node],
            });
        }

        if let Some(found) = deep_find(children(node), children, match_field, value) {
            let mut path = Vec::with_capacity(found.path.len() + 1);
            path.push(node);
            path.extend(found.path);
            return Some(Found {
                result: found.result,
                path,
            });
        }
    }
    None
}

/// Field-name flavored search over untyped JSON.
///
/// `nodes` must be an array; `children_field` names each node's child array and
/// `match_field` the string property compared to `value`. Nodes whose match
/// field is missing or not a string never match, but their children are still
/// searched.
pub fn deep_find_value<'a>(
    nodes: &'a Value,
    children_field: &str,
    match_field: &str,
    value: &str,
) -> Option<Found<'a, Value>> {
    deep_find(
        nodes.as_array().map(Vec::as_slice),
        &|node: &'a Value| {
            node.get(children_field)
                .and_then(Value::as_array)
                .map(Vec::as_slice)
        },
        &|node: &'a Value| node.get(match_field).and_then(Value::as_str),
        value,
    )
}
