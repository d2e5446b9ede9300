//! `--list`: print every registered key with its compile status.

use std::io::Write;

use anyhow::{Context, Result};
use regmask_core::MaskingEngine;

/// Writes `KEY<TAB>STATUS<TAB>PATTERN` lines in key order.
///
/// Listing compiles every pattern, so the status shows exactly what a
/// masking call would see.
pub fn run_list<W: Write>(engine: &MaskingEngine, mut output: W) -> Result<()> {
    let cache = engine.cache();
    let registry = cache.registry();
    for key in registry.keys() {
        let source = registry.lookup(key).unwrap_or_default();
        let status = if cache.resolve(key).is_ok() { "ok" } else { "invalid" };
        writeln!(output, "{}\t{}\t{}", key, status, source).context("Failed to write output")?;
    }
    output.flush().context("Failed to flush output")?;
    Ok(())
}
