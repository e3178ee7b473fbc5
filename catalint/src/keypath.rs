//! Dotted key paths over nested catalog trees.
//!
//! A catalog tree is a JSON object whose internal nodes are objects and whose
//! leaves are anything else (strings in practice; arrays and other scalars are
//! opaque leaves and are never traversed). Paths such as `nav.menu.home` name
//! one node by walking object keys.

use serde_json::{Map, Value};

use crate::error::Error;

/// A catalog tree: the top-level object of one catalog document.
pub type Tree = Map<String, Value>;

/// What `set` does when the path runs into a node of the wrong shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConflictPolicy {
    /// Refuse with [`Error::PathConflict`].
    #[default]
    Fail,
    /// Replace the node, logging a warning.
    Overwrite,
}

/// Splits a dotted path into its segments, rejecting empty paths and empty segments.
pub fn split_path(path: &str) -> Result<Vec<&str>, Error> {
    let segments: Vec<&str> = path.split('.').collect();
    if path.is_empty() || segments.iter().any(|s| s.is_empty()) {
        return Err(Error::InvalidPath(path.to_string()));
    }
    Ok(segments)
}

/// Joins a parent path and a child segment.
pub fn join(prefix: &str, segment: &str) -> String {
    if prefix.is_empty() {
        segment.to_string()
    } else {
        format!("{}.{}", prefix, segment)
    }
}

/// Resolves `path` in `tree`.
///
/// Returns `None` when any segment is missing, when an intermediate node is
/// not an object, or when the path is malformed.
pub fn get<'a>(tree: &'a Tree, path: &str) -> Option<&'a Value> {
    let segments = split_path(path).ok()?;
    let (last, parents) = segments.split_last()?;
    let mut node = tree;
    for segment in parents {
        match node.get(*segment) {
            Some(Value::Object(child)) => node = child,
            _ => return None,
        }
    }
    node.get(*last)
}

/// Sets `value` at `path`, creating empty objects for missing intermediate segments.
///
/// An intermediate segment that holds a non-object value, or a final segment
/// that holds an object, is handled according to `policy`.
pub fn set(tree: &mut Tree, path: &str, value: Value, policy: ConflictPolicy) -> Result<(), Error> {
    let segments = split_path(path)?;
    let Some((last, parents)) = segments.split_last() else {
        return Err(Error::InvalidPath(path.to_string()));
    };

    let mut node = tree;
    for (depth, segment) in parents.iter().enumerate() {
        let entry = node
            .entry(segment.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if !entry.is_object() {
            if policy == ConflictPolicy::Fail {
                return Err(Error::path_conflict(path, segments[..=depth].join(".")));
            }
            tracing::warn!(path, at = %segments[..=depth].join("."), "overwriting scalar with object");
            *entry = Value::Object(Map::new());
        }
        node = match entry {
            Value::Object(child) => child,
            _ => return Err(Error::path_conflict(path, segments[..=depth].join("."))),
        };
    }
    if node.get(*last).is_some_and(|existing| existing.is_object() && !value.is_object()) {
        if policy == ConflictPolicy::Fail {
            return Err(Error::path_conflict(path, path));
        }
        tracing::warn!(path, "overwriting object with scalar");
    }
    node.insert(last.to_string(), value);
    Ok(())
}

/// Iterates all leaves of `tree` depth-first, in document order.
///
/// Each call starts a fresh traversal. Empty objects contribute no leaves.
pub fn leaves(tree: &Tree) -> Leaves<'_> {
    Leaves {
        stack: vec![(String::new(), tree.iter())],
    }
}

/// Collects the leaf paths of `tree` in traversal order.
pub fn leaf_paths(tree: &Tree) -> Vec<String> {
    leaves(tree).map(|(path, _)| path).collect()
}

/// Pre-order leaf iterator returned by [`leaves`].
pub struct Leaves<'a> {
    stack: Vec<(String, serde_json::map::Iter<'a>)>,
}

impl<'a> Iterator for Leaves<'a> {
    type Item = (String, &'a Value);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let next = {
                let (prefix, iter) = self.stack.last_mut()?;
                iter.next().map(|(key, value)| (join(prefix, key), value))
            };
            match next {
                None => {
                    self.stack.pop();
                }
                Some((path, Value::Object(child))) => {
                    self.stack.push((path, child.iter()));
                }
                Some(leaf) => return Some(leaf),
            }
        }
    }
}

/// Flattens `tree` into an ordered map of dotted leaf paths.
pub fn flatten(tree: &Tree) -> Map<String, Value> {
    leaves(tree)
        .map(|(path, value)| (path, value.clone()))
        .collect()
}

/// Rebuilds a nested tree from dotted paths.
///
/// Fails with [`Error::PathConflict`] when one path is a prefix of another
/// (for example `a` and `a.b`), since no tree can hold both.
pub fn unflatten(flat: &Map<String, Value>) -> Result<Tree, Error> {
    let mut tree = Tree::new();
    for (path, value) in flat {
        set(&mut tree, path, value.clone(), ConflictPolicy::Fail)?;
    }
    Ok(tree)
}
