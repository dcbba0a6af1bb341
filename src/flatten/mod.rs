//! Recursive JSON flattening
//!
//! Transforms an arbitrarily nested JSON value into a single-level mapping
//! with compound, separator-joined keys:
//!
//! - arrays recurse with the zero-based index as a path segment
//! - objects recurse with the key as a path segment
//! - everything else is a leaf, recorded under the accumulated path
//!
//! The transform is pure and reentrant. Recursion depth is bounded by the
//! nesting depth of the input, and JSON inputs are acyclic by construction,
//! so no cycle detection is needed. Key order follows the input's own
//! iteration order (`serde_json` is built with `preserve_order`), which keeps
//! schema output reproducible.

use crate::types::{FlatRecord, RawRecord};
use serde_json::Value;

/// Default path separator
pub const DEFAULT_SEPARATOR: &str = ".";

/// Flatten a nested JSON value using the default `.` separator.
///
/// # Example
///
/// ```
/// use articlesearch_source::flatten;
/// use serde_json::json;
///
/// let flat = flatten(&json!({"a": [1, {"b": 2}]}));
/// assert_eq!(flat.get("a.0"), Some(&json!(1)));
/// assert_eq!(flat.get("a.1.b"), Some(&json!(2)));
/// ```
pub fn flatten(record: &RawRecord) -> FlatRecord {
    flatten_with_separator(record, DEFAULT_SEPARATOR)
}

/// Flatten a nested JSON value with a custom path separator
pub fn flatten_with_separator(record: &RawRecord, separator: &str) -> FlatRecord {
    let mut flat = FlatRecord::new();
    flatten_into(record, "", separator, &mut flat);
    flat
}

fn flatten_into(value: &Value, path: &str, separator: &str, out: &mut FlatRecord) {
    match value {
        Value::Array(items) => {
            for (index, item) in items.iter().enumerate() {
                let segment = index.to_string();
                flatten_into(item, &join(path, &segment, separator), separator, out);
            }
        }
        Value::Object(map) => {
            for (key, item) in map {
                flatten_into(item, &join(path, key, separator), separator, out);
            }
        }
        // Scalar leaf: record it under the accumulated path. A bare top-level
        // scalar lands under the empty key.
        leaf => {
            out.insert(path.to_string(), leaf.clone());
        }
    }
}

/// Join a parent path and a new segment. Top-level segments carry no
/// leading separator.
fn join(parent: &str, segment: &str, separator: &str) -> String {
    if parent.is_empty() {
        segment.to_string()
    } else {
        format!("{parent}{separator}{segment}")
    }
}
