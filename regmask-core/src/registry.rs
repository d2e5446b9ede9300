// regmask-core/src/registry.rs
//! The immutable table of named pattern sources.
//!
//! A `PatternRegistry` is materialised once, before any masking happens, and
//! is never mutated afterwards. Concurrent readers therefore need no locking.
//! Sources are stored verbatim; they are only validated when the cache
//! compiles them.
//!
//! License: MIT OR APACHE 2.0

use std::collections::HashMap;

use log::debug;

/// The table compiled into the library, used when no pattern file is supplied.
static BUILTIN_PATTERNS: &[(&str, &str)] = &[
    ("APN", r"\d{4}"),
    ("EMAIL", r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}"),
    ("SSN", r"\d{6}-\d{7}"),
];

/// Maps case-sensitive pattern keys to their source text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatternRegistry {
    patterns: HashMap<String, String>,
}

impl PatternRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a registry from `(key, source)` pairs. A repeated key keeps the
    /// last source seen.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let patterns = pairs
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self { patterns }
    }

    /// The built-in table: `APN`, `EMAIL` and `SSN`.
    pub fn builtin() -> Self {
        Self::from_pairs(BUILTIN_PATTERNS.iter().copied())
    }

    /// Layers `overrides` over `defaults`; on a shared key the override wins.
    pub fn merged(defaults: PatternRegistry, overrides: PatternRegistry) -> Self {
        let mut patterns = defaults.patterns;
        debug!(
            "Merging {} override pattern(s) over {} default pattern(s).",
            overrides.len(),
            patterns.len()
        );
        patterns.extend(overrides.patterns);
        Self { patterns }
    }

    /// Returns the source registered under `key`, if any.
    pub fn lookup(&self, key: &str) -> Option<&str> {
        self.patterns.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// All registered keys in ascending order.
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.patterns.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }
}
