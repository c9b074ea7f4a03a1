// src/path.rs
// Dot-path resolver: get / set / unset / rename over nested JSON documents

use std::fmt;

use serde_json::{Map, Value};

use crate::document::{type_name, HOLE};
use crate::error::{DocQueryError, Result};

/// Most holes a single write may insert when it targets an index past the
/// end of an array.
pub const MAX_ARRAY_PAD: usize = 1024;

/// A parsed dot-separated path such as `a.b.0.c`.
///
/// Segments are kept as raw strings. Whether a segment names an object key or
/// an array index is only known once the walk reaches a container, so the
/// same path can index an array in one document and name a key in another.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldPath {
    raw: String,
    segments: Vec<String>,
}

impl FieldPath {
    pub fn parse(path: &str) -> Self {
        FieldPath {
            raw: path.to_string(),
            segments: path.split('.').map(str::to_string).collect(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Read the value at this path. Missing keys, out-of-range indexes and
    /// scalars in the middle of the path all resolve to `None`.
    pub fn resolve<'v>(&self, doc: &'v Value) -> Option<&'v Value> {
        walk(doc, &self.segments)
    }

    pub fn resolve_mut<'v>(&self, doc: &'v mut Value) -> Option<&'v mut Value> {
        walk_mut(doc, &self.segments)
    }

    /// Write `value` at this path, creating missing intermediate objects.
    ///
    /// Fails when the walk has to add a named field to an array or has to
    /// descend into a scalar. On error the document may already contain
    /// auto-created intermediates; callers needing atomicity work on a copy.
    pub fn assign(&self, doc: &mut Value, value: Value) -> Result<()> {
        let Some((leaf, parents)) = self.segments.split_last() else {
            return Ok(());
        };

        let mut current = doc;
        for segment in parents {
            current = descend_or_create(current, segment)?;
        }

        write_slot(current, leaf, value)
    }

    /// Remove the value at this path. Returns `true` if something was removed.
    ///
    /// Array slots are replaced by a hole instead of being shifted out.
    pub fn remove(&self, doc: &mut Value) -> bool {
        let Some((leaf, parents)) = self.segments.split_last() else {
            return false;
        };

        let removed = match walk_mut(doc, parents) {
            Some(Value::Object(map)) => map.remove(leaf.as_str()).is_some(),
            Some(Value::Array(items)) => match parse_index(leaf) {
                Some(index) if index < items.len() => {
                    !std::mem::replace(&mut items[index], HOLE).is_null()
                }
                _ => false,
            },
            _ => false,
        };

        if !removed {
            log::debug!("unset '{}': nothing to remove", self.raw);
        }
        removed
    }

    /// Move the value at this path to `new_name` inside the same parent object.
    /// Returns `true` if the key existed.
    pub fn rename(&self, doc: &mut Value, new_name: &str) -> bool {
        let Some((leaf, parents)) = self.segments.split_last() else {
            return false;
        };

        let Some(Value::Object(map)) = walk_mut(doc, parents) else {
            log::debug!("rename '{}': parent is not an object", self.raw);
            return false;
        };

        if leaf == new_name {
            return map.contains_key(leaf.as_str());
        }

        match map.remove(leaf.as_str()) {
            Some(value) => {
                map.insert(new_name.to_string(), value);
                true
            }
            None => {
                log::debug!("rename '{}': key not found", self.raw);
                false
            }
        }
    }
}

impl From<&str> for FieldPath {
    fn from(path: &str) -> Self {
        FieldPath::parse(path)
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Read a field by dot-path.
pub fn get<'v>(doc: &'v Value, path: &str) -> Option<&'v Value> {
    FieldPath::parse(path).resolve(doc)
}

/// Write a field by dot-path.
pub fn set(doc: &mut Value, path: &str, value: Value) -> Result<()> {
    FieldPath::parse(path).assign(doc, value)
}

/// Remove a field by dot-path; a missing path is a no-op.
pub fn unset(doc: &mut Value, path: &str) -> bool {
    FieldPath::parse(path).remove(doc)
}

/// Rename a field within its parent object.
pub fn rename(doc: &mut Value, path: &str, new_name: &str) -> bool {
    FieldPath::parse(path).rename(doc, new_name)
}

/// Array indexes are plain decimal numbers without sign or leading zeros.
fn is_index(segment: &str) -> bool {
    !segment.is_empty()
        && segment.bytes().all(|b| b.is_ascii_digit())
        && (segment.len() == 1 || !segment.starts_with('0'))
}

fn parse_index(segment: &str) -> Option<usize> {
    if is_index(segment) {
        segment.parse().ok()
    } else {
        None
    }
}

fn walk<'v>(doc: &'v Value, segments: &[String]) -> Option<&'v Value> {
    segments.iter().try_fold(doc, |current, segment| match current {
        Value::Object(map) => map.get(segment.as_str()),
        Value::Array(items) => items.get(parse_index(segment)?),
        _ => None,
    })
}

fn walk_mut<'v>(doc: &'v mut Value, segments: &[String]) -> Option<&'v mut Value> {
    let mut current = doc;
    for segment in segments {
        current = match current {
            Value::Object(map) => map.get_mut(segment.as_str())?,
            Value::Array(items) => items.get_mut(parse_index(segment)?)?,
            _ => return None,
        };
    }
    Some(current)
}

fn descend_or_create<'v>(container: &'v mut Value, segment: &str) -> Result<&'v mut Value> {
    match container {
        Value::Object(map) => Ok(map
            .entry(segment.to_string())
            .or_insert_with(|| Value::Object(Map::new()))),
        Value::Array(items) => {
            let index = array_index(segment, items.len())?;
            if index >= items.len() {
                items.resize(index, HOLE);
                items.push(Value::Object(Map::new()));
            }
            Ok(&mut items[index])
        }
        scalar => Err(DocQueryError::ScalarParent {
            type_name: type_name(scalar),
            segment: segment.to_string(),
        }),
    }
}

fn write_slot(container: &mut Value, segment: &str, value: Value) -> Result<()> {
    match container {
        Value::Object(map) => {
            map.insert(segment.to_string(), value);
            Ok(())
        }
        Value::Array(items) => {
            let index = array_index(segment, items.len())?;
            if index < items.len() {
                items[index] = value;
            } else {
                items.resize(index, HOLE);
                items.push(value);
            }
            Ok(())
        }
        scalar => Err(DocQueryError::ScalarParent {
            type_name: type_name(scalar),
            segment: segment.to_string(),
        }),
    }
}

/// Index for a write into an array of `len` items. Writes may pad at most
/// [`MAX_ARRAY_PAD`] holes past the current end.
fn array_index(segment: &str, len: usize) -> Result<usize> {
    if !is_index(segment) {
        return Err(DocQueryError::ArrayAppend {
            segment: segment.to_string(),
        });
    }

    match segment.parse::<usize>() {
        Ok(index) if index <= len.saturating_add(MAX_ARRAY_PAD) => Ok(index),
        _ => Err(DocQueryError::ArrayIndexOutOfRange {
            segment: segment.to_string(),
            len,
        }),
    }
}
