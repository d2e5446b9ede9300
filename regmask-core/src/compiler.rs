//! compiler.rs - Turns pattern sources into compiled, shareable matchers.
//!
//! `PatternCompiler` is the seam between the cache and the regex engine. The
//! cache only ever calls it on a miss, so a compiler that counts its calls
//! observes exactly how often compilation happens.
//!
//! License: MIT OR APACHE 2.0

use std::fmt;

use log::debug;
use regex::bytes::{Regex, RegexBuilder};

use crate::errors::MaskError;

/// Maximum allowed length for a pattern source string.
pub const MAX_PATTERN_LENGTH: usize = 500;

/// Upper bound on the compiled program size of a single pattern.
const COMPILED_SIZE_LIMIT: usize = 10 * (1 << 20);

/// A compiled matcher bound to the key it was registered under.
///
/// Immutable after construction and safe to share between threads.
pub struct CompiledPattern {
    key: String,
    regex: Regex,
}

impl CompiledPattern {
    pub fn new(key: impl Into<String>, regex: Regex) -> Self {
        Self { key: key.into(), regex }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// The source text the matcher was built from.
    pub fn source(&self) -> &str {
        self.regex.as_str()
    }

    pub fn regex(&self) -> &Regex {
        &self.regex
    }
}

impl fmt::Debug for CompiledPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledPattern")
            .field("key", &self.key)
            .field("source", &self.source())
            .finish()
    }
}

/// Compiles a pattern source into a `CompiledPattern`.
pub trait PatternCompiler: Send + Sync {
    fn compile(&self, key: &str, source: &str) -> Result<CompiledPattern, MaskError>;
}

/// The default compiler, backed by `regex::bytes` so that input which is not
/// valid UTF-8 can still be scanned.
#[derive(Debug, Clone, Copy, Default)]
pub struct RegexCompiler;

impl PatternCompiler for RegexCompiler {
    fn compile(&self, key: &str, source: &str) -> Result<CompiledPattern, MaskError> {
        if source.len() > MAX_PATTERN_LENGTH {
            return Err(MaskError::PatternTooLong {
                key: key.to_string(),
                len: source.len(),
                max: MAX_PATTERN_LENGTH,
            });
        }

        let regex = RegexBuilder::new(source)
            .size_limit(COMPILED_SIZE_LIMIT)
            .build()
            .map_err(|e| MaskError::InvalidPattern {
                key: key.to_string(),
                reason: e.to_string(),
            })?;

        debug!(target: "regmask_core::compiler", "Pattern '{}' compiled successfully.", key);
        Ok(CompiledPattern::new(key, regex))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compiles_valid_source() {
        let pattern = RegexCompiler.compile("APN", r"\d{4}").unwrap();
        assert_eq!(pattern.key(), "APN");
        assert_eq!(pattern.source(), r"\d{4}");
        assert!(pattern.regex().is_match(b"call 1234"));
    }

    #[test]
    fn rejects_malformed_source() {
        let err = RegexCompiler.compile("BROKEN", "([a-z").unwrap_err();
        assert!(matches!(err, MaskError::InvalidPattern { ref key, .. } if key == "BROKEN"));
    }

    #[test]
    fn rejects_overlong_source() {
        let source = "a".repeat(MAX_PATTERN_LENGTH + 1);
        let err = RegexCompiler.compile("LONG", &source).unwrap_err();
        assert_eq!(
            err,
            MaskError::PatternTooLong {
                key: "LONG".into(),
                len: MAX_PATTERN_LENGTH + 1,
                max: MAX_PATTERN_LENGTH,
            }
        );
    }

    #[test]
    fn debug_output_omits_program_internals() {
        let pattern = RegexCompiler.compile("SSN", r"\d{6}-\d{7}").unwrap();
        let rendered = format!("{:?}", pattern);
        assert!(rendered.contains("SSN"));
        assert!(rendered.contains(r"\d{6}-\d{7}"));
    }
}
