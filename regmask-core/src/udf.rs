//! udf.rs - Host-facing entry points.
//!
//! A host calls [`mask`] or [`mask_with`] once per row with nullable byte
//! arguments and a [`FunctionContext`] it controls. Every failure is folded
//! into `None`, the host's absent marker. Failures other than a missing
//! argument or an unknown key also leave a diagnostic on the context, which
//! the host may log without aborting the batch.
//!
//! License: MIT OR APACHE 2.0

use log::warn;

use crate::compiler::PatternCompiler;
use crate::engine::{mask_bytes_counted, Masked, MaskingEngine};
use crate::errors::MaskError;
use crate::policy::MaskPolicy;

/// Services a host offers to a masking call.
pub trait FunctionContext {
    /// The host-owned buffer type handed back as the result.
    type Buffer;

    /// Copies `bytes` into a host-owned buffer. `None` signals allocation
    /// failure.
    fn allocate(&mut self, bytes: &[u8]) -> Option<Self::Buffer>;

    /// Records a human-readable diagnostic for the current row.
    fn set_error(&mut self, message: &str);

    /// Receives the number of spans overwritten in a row that was returned
    /// successfully. Ignored by default.
    fn record_spans(&mut self, _spans: usize) {}
}

/// A context backed by the global allocator that keeps the most recent
/// diagnostic.
#[derive(Debug, Default)]
pub struct HeapContext {
    last_error: Option<String>,
    last_spans: usize,
}

impl HeapContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn take_error(&mut self) -> Option<String> {
        self.last_error.take()
    }

    /// Spans overwritten in the most recent row that produced a value.
    pub fn last_spans(&self) -> usize {
        self.last_spans
    }
}

impl FunctionContext for HeapContext {
    type Buffer = Vec<u8>;

    fn allocate(&mut self, bytes: &[u8]) -> Option<Vec<u8>> {
        let mut buffer = Vec::new();
        buffer.try_reserve_exact(bytes.len()).ok()?;
        buffer.extend_from_slice(bytes);
        Some(buffer)
    }

    fn set_error(&mut self, message: &str) {
        warn!(target: "regmask_core::udf", "{}", message);
        self.last_error = Some(message.to_string());
    }

    fn record_spans(&mut self, spans: usize) {
        self.last_spans = spans;
    }
}

/// Masks matches of `key` in `input` with the `*` glyph.
pub fn mask<Ctx, C>(
    ctx: &mut Ctx,
    engine: &MaskingEngine<C>,
    key: Option<&[u8]>,
    input: Option<&[u8]>,
) -> Option<Ctx::Buffer>
where
    Ctx: FunctionContext,
    C: PatternCompiler,
{
    let (Some(key), Some(input)) = (key, input) else {
        return None;
    };
    emit(ctx, try_mask(engine, key, input, None))
}

/// Masks matches of `key` in `input` with the single character in `mask_val`.
pub fn mask_with<Ctx, C>(
    ctx: &mut Ctx,
    engine: &MaskingEngine<C>,
    key: Option<&[u8]>,
    input: Option<&[u8]>,
    mask_val: Option<&[u8]>,
) -> Option<Ctx::Buffer>
where
    Ctx: FunctionContext,
    C: PatternCompiler,
{
    let (Some(key), Some(input), Some(mask_val)) = (key, input, mask_val) else {
        return None;
    };
    emit(ctx, try_mask(engine, key, input, Some(mask_val)))
}

fn try_mask<C: PatternCompiler>(
    engine: &MaskingEngine<C>,
    key: &[u8],
    input: &[u8],
    replacement: Option<&[u8]>,
) -> Result<Masked, MaskError> {
    // Registered keys are always UTF-8.
    let key = std::str::from_utf8(key)
        .map_err(|_| MaskError::UnknownPattern(String::from_utf8_lossy(key).into_owned()))?;

    let pattern = engine.cache().resolve(key)?;

    let policy = match replacement {
        Some(replacement) => MaskPolicy::from_replacement(replacement)?,
        None => MaskPolicy::Glyph,
    };

    mask_bytes_counted(&pattern, input, policy)
}

fn emit<Ctx: FunctionContext>(
    ctx: &mut Ctx,
    outcome: Result<Masked, MaskError>,
) -> Option<Ctx::Buffer> {
    let err = match outcome {
        Ok(masked) => match ctx.allocate(&masked.bytes) {
            Some(buffer) => {
                ctx.record_spans(masked.spans);
                return Some(buffer);
            }
            None => MaskError::Allocation(masked.bytes.len()),
        },
        Err(err) => err,
    };
    if !err.is_expected() {
        ctx.set_error(&err.to_string());
    }
    None
}
