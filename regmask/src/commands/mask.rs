//! The row-masking loop.
//!
//! Each input line is one row. Rows go through the same nullable entry
//! points a query engine would use, so a row that cannot be masked prints the
//! null marker and the run carries on.

use std::fmt;
use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use log::debug;
use regmask_core::udf::{self, FunctionContext};
use regmask_core::{HeapContext, MaskError, MaskPolicy, MaskingEngine};

/// Per-run settings taken from the command line.
#[derive(Debug, Clone)]
pub struct MaskOptions {
    pub key: String,
    pub mask_char: Option<String>,
    pub null_marker: String,
    pub collect_stats: bool,
}

/// Counters reported by `--stats`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub rows: usize,
    pub masked_rows: usize,
    pub spans: usize,
    pub null_rows: usize,
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "rows: {}, masked rows: {}, masked spans: {}, null rows: {}",
            self.rows, self.masked_rows, self.spans, self.null_rows
        )
    }
}

/// Checks once, before any row is read, that the key resolves and the mask
/// character is usable. Either failure would otherwise null every row.
pub fn preflight(engine: &MaskingEngine, options: &MaskOptions) -> Result<(), MaskError> {
    engine.cache().resolve(&options.key)?;
    if let Some(mask_char) = &options.mask_char {
        MaskPolicy::from_replacement(mask_char.as_bytes())?;
    }
    Ok(())
}

/// Masks every line of `input` into `output`, preserving line terminators.
pub fn run_mask<R: BufRead, W: Write>(
    engine: &MaskingEngine,
    options: &MaskOptions,
    mut input: R,
    mut output: W,
) -> Result<RunSummary> {
    let mut ctx = HeapContext::new();
    let mut summary = RunSummary::default();
    let mut line = Vec::new();

    loop {
        line.clear();
        let read = input.read_until(b'\n', &mut line).context("Failed to read input")?;
        if read == 0 {
            break;
        }
        let (row, terminator) = split_terminator(&line);
        summary.rows += 1;

        let masked = mask_row(&mut ctx, engine, options, row);
        match masked {
            Some(out) => {
                output.write_all(&out).context("Failed to write output")?;
                if options.collect_stats {
                    let spans = ctx.last_spans();
                    if spans > 0 {
                        summary.masked_rows += 1;
                        summary.spans += spans;
                    }
                }
            }
            None => {
                summary.null_rows += 1;
                if let Some(err) = ctx.take_error() {
                    debug!("Row {} produced no value: {}", summary.rows, err);
                }
                output
                    .write_all(options.null_marker.as_bytes())
                    .context("Failed to write output")?;
            }
        }
        output.write_all(terminator).context("Failed to write output")?;
    }

    output.flush().context("Failed to flush output")?;
    Ok(summary)
}

fn mask_row<Ctx: FunctionContext>(
    ctx: &mut Ctx,
    engine: &MaskingEngine,
    options: &MaskOptions,
    row: &[u8],
) -> Option<Ctx::Buffer> {
    let key = Some(options.key.as_bytes());
    match &options.mask_char {
        Some(mask_char) => udf::mask_with(ctx, engine, key, Some(row), Some(mask_char.as_bytes())),
        None => udf::mask(ctx, engine, key, Some(row)),
    }
}

fn split_terminator(line: &[u8]) -> (&[u8], &[u8]) {
    let cut = if line.ends_with(b"\r\n") {
        2
    } else if line.ends_with(b"\n") {
        1
    } else {
        0
    };
    line.split_at(line.len() - cut)
}
