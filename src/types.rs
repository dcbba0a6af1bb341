//! Common types used throughout the article search source
//!
//! This module contains shared type definitions and type aliases
//! used across multiple modules.

// ============================================================================
// Type Aliases
// ============================================================================

/// A raw, possibly nested record as returned by the API
pub type RawRecord = serde_json::Value;

/// A flattened record: dotted-path keys mapped to scalar leaf values.
///
/// Built on `serde_json::Map` with the `preserve_order` feature, so keys
/// stay in flattening-traversal order.
pub type FlatRecord = serde_json::Map<String, serde_json::Value>;

/// A fixed-size group of flattened records handed to the caller in one unit
pub type Batch = Vec<FlatRecord>;

// ============================================================================
// Utilities
// ============================================================================

/// Extension trait for Option<String> to handle empty strings
pub trait OptionStringExt {
    /// Returns None if the string is empty
    fn none_if_empty(self) -> Option<String>;
}

impl OptionStringExt for Option<String> {
    fn none_if_empty(self) -> Option<String> {
        self.filter(|s| !s.is_empty())
    }
}

impl OptionStringExt for String {
    fn none_if_empty(self) -> Option<String> {
        if self.is_empty() {
            None
        } else {
            Some(self)
        }
    }
}
