use std::{
    collections::hash_map::DefaultHasher,
    hash::{Hash, Hasher},
};

use serde::Serialize;

/// A stable document identifier derived from a locator.
///
/// This is the opaque handle the viewer holds for an open document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct DocumentId {
    /// The numeric hash of the locator.
    pub numeric: u64,
    /// The short hex string for human display (e.g. "a1b2c3").
    pub short: String,
}

impl DocumentId {
    /// Generate a stable document ID from a locator.
    pub fn new(locator: &str) -> Self {
        let numeric = Self::hash_locator(locator);
        let short = Self::short_hex(numeric, 6);
        Self { numeric, short }
    }

    fn hash_locator(locator: &str) -> u64 {
        let mut hasher = DefaultHasher::new();
        locator.hash(&mut hasher);
        hasher.finish()
    }

    fn short_hex(value: u64, len: usize) -> String {
        let full = format!("{value:016x}");
        full[..len].to_string()
    }
}

impl std::fmt::Display for DocumentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.short)
    }
}
