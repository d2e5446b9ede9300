//! errors.rs - Error types for the regmask-core library.
//!
//! Every failure inside the core is a value of one of these enums. The host
//! adapter in `udf` folds them into the absent result, so none of them ever
//! crosses the masking boundary as a panic.
//!
//! License: MIT OR APACHE 2.0

use thiserror::Error;

/// Reasons a masking request produced no output.
///
/// Marked `#[non_exhaustive]` so new outcomes can be added without breaking
/// downstream matches.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum MaskError {
    #[error("No pattern is registered under key '{0}'")]
    UnknownPattern(String),

    #[error("Failed to compile pattern '{key}': {reason}")]
    InvalidPattern { key: String, reason: String },

    #[error("Pattern '{key}': source length ({len}) exceeds maximum allowed ({max})")]
    PatternTooLong { key: String, len: usize, max: usize },

    #[error("Replacement must be exactly one character, got {0}")]
    InvalidReplacement(usize),

    #[error("Failed to allocate an output buffer of {0} bytes")]
    Allocation(usize),

    #[error("Pattern '{key}' split a multi-byte character; the masked text is not valid UTF-8")]
    SplitCharacter { key: String },
}

impl MaskError {
    /// Returns `true` for outcomes the host sees routinely and does not need
    /// a diagnostic for.
    pub fn is_expected(&self) -> bool {
        matches!(self, MaskError::UnknownPattern(_))
    }
}

/// Errors raised while parsing a pattern table.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("line {line}: expected KEY=PATTERN")]
    MissingSeparator { line: usize },

    #[error("line {line}: empty pattern key")]
    EmptyKey { line: usize },

    #[error("line {line}: duplicate pattern key '{key}'")]
    DuplicateKey { line: usize, key: String },
}
