//! Pattern table loading for `regmask-core`.
//!
//! Turns a pattern table on disk into a ready `PatternRegistry`. Two formats
//! are understood:
//!
//! * the line format, one `KEY=PATTERN` rule per line, with `#` comments
//!   and blank lines ignored;
//! * YAML (`.yaml` / `.yml`), a `patterns` mapping from key to pattern.
//!
//! Patterns are not compiled here. A malformed pattern loads fine and is
//! only rejected, once, when the cache first compiles it.
//!
//! License: MIT OR Apache-2.0

use std::collections::BTreeMap;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;
use crate::registry::PatternRegistry;

/// File name looked up under the user's configuration directory.
pub const DEFAULT_TABLE_FILE: &str = "patterns.conf";

/// YAML form of a pattern table.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct PatternTable {
    pub patterns: BTreeMap<String, String>,
}

impl From<PatternTable> for PatternRegistry {
    fn from(table: PatternTable) -> Self {
        PatternRegistry::from_pairs(table.patterns)
    }
}

/// Parses the line format into a registry.
///
/// The key is trimmed. The pattern is everything after the first `=`, with
/// only a trailing `\r` removed, so patterns may contain `=` and significant
/// whitespace. A pattern that starts with whitespace is kept as written but
/// logged as a warning, since `KEY = PATTERN` makes the space part of the
/// regex.
pub fn parse_table(text: &str) -> Result<PatternRegistry, ConfigError> {
    let mut seen = HashSet::new();
    let mut pairs = Vec::new();

    for (index, raw) in text.lines().enumerate() {
        let line_no = index + 1;
        let line = raw.strip_suffix('\r').unwrap_or(raw);
        let trimmed = line.trim_start();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let Some((key, pattern)) = line.split_once('=') else {
            return Err(ConfigError::MissingSeparator { line: line_no });
        };
        let key = key.trim();
        if key.is_empty() {
            return Err(ConfigError::EmptyKey { line: line_no });
        }
        if !seen.insert(key) {
            return Err(ConfigError::DuplicateKey { line: line_no, key: key.to_string() });
        }
        if has_leading_whitespace(pattern) {
            warn!(
                "line {}: pattern for '{}' starts with whitespace, which is matched literally",
                line_no, key
            );
        }
        pairs.push((key, pattern));
    }

    debug!("Parsed {} pattern(s) from table.", pairs.len());
    Ok(PatternRegistry::from_pairs(pairs))
}

fn has_leading_whitespace(pattern: &str) -> bool {
    pattern.starts_with(char::is_whitespace)
}

/// Parses the YAML form into a registry.
pub fn parse_yaml(text: &str) -> Result<PatternRegistry> {
    let table: PatternTable = serde_yml::from_str(text).context("Failed to parse YAML pattern table")?;
    if let Some(key) = table.patterns.keys().find(|k| k.trim().is_empty()) {
        anyhow::bail!("YAML pattern table contains an empty key {:?}", key);
    }
    Ok(table.into())
}

/// Loads a pattern table from `path`, choosing the format by extension.
pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<PatternRegistry> {
    let path = path.as_ref();
    info!("Loading pattern table from: {}", path.display());
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read pattern table {}", path.display()))?;

    let is_yaml = matches!(
        path.extension().and_then(|ext| ext.to_str()),
        Some("yaml") | Some("yml")
    );
    let registry = if is_yaml {
        parse_yaml(&text)
    } else {
        parse_table(&text).map_err(anyhow::Error::from)
    }
    .with_context(|| format!("Failed to parse pattern table {}", path.display()))?;

    info!("Loaded {} pattern(s) from {}.", registry.len(), path.display());
    Ok(registry)
}

/// `<config dir>/regmask/patterns.conf`, when the platform has a config dir.
pub fn default_table_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("regmask").join(DEFAULT_TABLE_FILE))
}
