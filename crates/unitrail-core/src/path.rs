//! Dotted-path resolution over loosely-typed JSON documents.
//!
//! # Overview
//!
//! Provider payloads nest the fields we need at arbitrary depth
//! (`"resources.0.ARN"`, `"protoPayload.methodName"`). A [`FieldPath`]
//! walks such a dotted path segment by segment; resolution either lands
//! on a value or reports absence -- never an error, and never a partial
//! result. Callers decide whether an absent field matters.
//!
//! # Segment interpretation
//!
//! The container's kind is checked before the segment is interpreted:
//!
//! - current value is a **sequence** and the segment is all ASCII
//!   digits: descend by index, absent when out of bounds.
//! - current value is a **mapping** and the segment is a present key:
//!   descend by key. A digit-only segment like `"0"` is a plain key
//!   here, not an index.
//! - anything else (scalar mid-walk, missing key, non-numeric segment
//!   against a sequence): the whole resolution is absent.
//!
//! Resolution borrows from the document and performs no mutation, so
//! re-resolving the same path against an unmodified document returns
//! the same result every call.

use serde_json::Value;

/// An ordered sequence of path segments split from a dotted string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldPath<'a> {
    segments: Vec<&'a str>,
}

impl<'a> FieldPath<'a> {
    /// Split a dotted string into segments. Empty segments (from leading,
    /// trailing, or doubled dots) are kept and simply fail to match any
    /// key, mirroring a plain split.
    pub fn parse(dotted: &'a str) -> Self {
        FieldPath {
            segments: dotted.split('.').collect(),
        }
    }

    /// The raw segments, in walk order.
    pub fn segments(&self) -> &[&'a str] {
        &self.segments
    }

    /// Walk the document along this path.
    ///
    /// Returns a borrow of the located value, or `None` when any step
    /// cannot descend.
    pub fn resolve<'v>(&self, document: &'v Value) -> Option<&'v Value> {
        let mut current = document;
        for segment in &self.segments {
            let next = match current {
                Value::Array(items) => parse_index(segment).and_then(|index| items.get(index)),
                Value::Object(map) => map.get(*segment),
                _ => None,
            };
            current = next?;
        }
        Some(current)
    }
}

/// Resolve a dotted path against a document in one call.
pub fn resolve_path<'v>(document: &'v Value, dotted: &str) -> Option<&'v Value> {
    FieldPath::parse(dotted).resolve(document)
}

/// Interpret a segment as a sequence index: all-ASCII-digit strings
/// only, so signs, whitespace, and overlong values stay non-indices.
fn parse_index(segment: &str) -> Option<usize> {
    if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    segment.parse().ok()
}
