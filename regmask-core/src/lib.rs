// regmask-core/src/lib.rs
//! # regmask Core Library
//!
//! `regmask-core` masks sensitive substrings selected by a named pattern. A
//! caller names a pattern (for example `"SSN"`), supplies text, and receives
//! the same text with every match overwritten character by character.
//!
//! The library is built for hosts that call it once per row, from many
//! threads, millions of times: pattern compilation happens at most once per
//! key and the result is shared.
//!
//! ## Modules
//!
//! * `registry`: the immutable `PatternRegistry` of key → pattern source.
//! * `compiler`: the `PatternCompiler` seam and the regex-backed default.
//! * `cache`: the thread-safe, compile-once `CompiledPatternCache`.
//! * `policy`: `MaskPolicy`, the choice of mask character.
//! * `engine`: `MaskingEngine` and the positional masking algorithm.
//! * `udf`: nullable, never-failing entry points for a host runtime.
//! * `config`: loading a pattern table from a file.
//! * `errors`: typed error values.
//!
//! ## Usage Example
//!
//! ```rust
//! use regmask_core::{MaskingEngine, MaskPolicy, PatternRegistry};
//!
//! let engine = MaskingEngine::from_registry(PatternRegistry::builtin());
//! let masked = engine
//!     .mask_str("APN", "내 번호는 010-1234-5678 입니다", MaskPolicy::Glyph)
//!     .unwrap();
//! assert_eq!(masked, "내 번호는 010-****-**** 입니다");
//! ```
//!
//! ## Error Handling
//!
//! Inside the library every failure is a [`MaskError`]. The `udf` entry
//! points fold those into `None` and leave a diagnostic on the host context,
//! so one bad row or one malformed pattern never aborts a batch.
//!
//! ---
//! License: MIT OR Apache-2.0

pub mod cache;
pub mod compiler;
pub mod config;
pub mod engine;
pub mod errors;
pub mod policy;
pub mod registry;
pub mod udf;

/// Re-exports the pattern table and its loaders.
pub use registry::PatternRegistry;
pub use config::{default_table_path, load_from_file, parse_table, PatternTable};

/// Re-exports the compile-once cache and its compiler seam.
pub use cache::{CacheStats, CompiledPatternCache};
pub use compiler::{CompiledPattern, PatternCompiler, RegexCompiler, MAX_PATTERN_LENGTH};

/// Re-exports the masking engine and policy.
pub use engine::{Masked, MaskingEngine};
pub use policy::{MaskPolicy, MASK_GLYPH};

/// Re-exports the host adapter.
pub use udf::{FunctionContext, HeapContext};

/// Re-exports the error types.
pub use errors::{ConfigError, MaskError};
