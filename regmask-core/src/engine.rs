// regmask-core/src/engine.rs
//! The masking engine.
//!
//! `MaskingEngine` resolves a named pattern through its
//! `CompiledPatternCache` and overwrites every match, character by character,
//! with the policy's mask character. Bytes outside a match are copied
//! verbatim.
//!
//! Matching works on raw bytes. Inside a matched span every valid UTF-8
//! scalar value is replaced by one mask character, and every byte that is not
//! part of valid UTF-8 counts as a character of its own. The number of
//! characters is therefore preserved, and a pattern in Unicode mode (the
//! default) never cuts multi-byte text in the middle of a code point.
//!
//! Classes are Unicode-aware: `\d` matches any decimal digit, not just
//! `0-9`. Write `(?-u:\d)` or `[0-9]` for ASCII digits only.
//!
//! License: MIT OR APACHE 2.0

use std::ops::Range;
use std::sync::Arc;

use crate::cache::CompiledPatternCache;
use crate::compiler::{CompiledPattern, PatternCompiler, RegexCompiler};
use crate::errors::MaskError;
use crate::policy::MaskPolicy;
use crate::registry::PatternRegistry;

/// Applies named patterns to input text.
///
/// Cheap to clone; clones share one cache.
#[derive(Debug)]
pub struct MaskingEngine<C: PatternCompiler = RegexCompiler> {
    cache: Arc<CompiledPatternCache<C>>,
}

impl<C: PatternCompiler> Clone for MaskingEngine<C> {
    fn clone(&self) -> Self {
        Self { cache: Arc::clone(&self.cache) }
    }
}

impl MaskingEngine<RegexCompiler> {
    /// Builds an engine with a fresh cache over `registry`.
    pub fn from_registry(registry: PatternRegistry) -> Self {
        Self::new(Arc::new(CompiledPatternCache::new(Arc::new(registry))))
    }
}

impl<C: PatternCompiler> MaskingEngine<C> {
    pub fn new(cache: Arc<CompiledPatternCache<C>>) -> Self {
        Self { cache }
    }

    pub fn cache(&self) -> &CompiledPatternCache<C> {
        &self.cache
    }

    /// Masks every match of the pattern named `key` in `input`.
    pub fn mask(&self, key: &str, input: &[u8], policy: MaskPolicy) -> Result<Vec<u8>, MaskError> {
        let pattern = self.cache.resolve(key)?;
        mask_bytes(&pattern, input, policy)
    }

    /// String form of [`mask`](Self::mask).
    ///
    /// Fails with [`MaskError::SplitCharacter`] when a byte-level pattern
    /// (`(?-u:...)`) matches part of a multi-byte character, since the
    /// result would not be valid UTF-8. Use [`mask`](Self::mask) to get the
    /// raw bytes in that case.
    pub fn mask_str(&self, key: &str, input: &str, policy: MaskPolicy) -> Result<String, MaskError> {
        let masked = self.mask(key, input.as_bytes(), policy)?;
        String::from_utf8(masked).map_err(|_| MaskError::SplitCharacter { key: key.to_string() })
    }

    /// Byte ranges of `input` that [`mask`](Self::mask) would overwrite.
    pub fn find(&self, key: &str, input: &[u8]) -> Result<Vec<Range<usize>>, MaskError> {
        let pattern = self.cache.resolve(key)?;
        Ok(masked_spans(&pattern, input))
    }
}

/// Non-empty, non-overlapping match spans in ascending order.
///
/// `find_iter` always advances past an empty match, so this terminates for
/// patterns that can match the empty string.
pub fn masked_spans(pattern: &CompiledPattern, input: &[u8]) -> Vec<Range<usize>> {
    pattern
        .regex()
        .find_iter(input)
        .filter(|m| m.start() < m.end())
        .map(|m| m.range())
        .collect()
}

/// Masked output and the number of spans that were overwritten.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Masked {
    pub bytes: Vec<u8>,
    pub spans: usize,
}

/// Overwrites every match of `pattern` in `input` according to `policy`.
pub fn mask_bytes(
    pattern: &CompiledPattern,
    input: &[u8],
    policy: MaskPolicy,
) -> Result<Vec<u8>, MaskError> {
    mask_bytes_counted(pattern, input, policy).map(|masked| masked.bytes)
}

/// [`mask_bytes`] that also reports how many spans it overwrote, from the
/// same scan.
pub fn mask_bytes_counted(
    pattern: &CompiledPattern,
    input: &[u8],
    policy: MaskPolicy,
) -> Result<Masked, MaskError> {
    let mut encoded = [0u8; 4];
    let glyph = policy.mask_char().encode_utf8(&mut encoded).as_bytes();

    let spans: Vec<(Range<usize>, usize)> = masked_spans(pattern, input)
        .into_iter()
        .map(|span| {
            let chars = char_count(&input[span.clone()]);
            (span, chars)
        })
        .collect();
    let span_count = spans.len();

    let output_len = spans.iter().fold(input.len(), |len, (span, chars)| {
        len - span.len() + chars * glyph.len()
    });

    let mut output = Vec::new();
    output
        .try_reserve_exact(output_len)
        .map_err(|_| MaskError::Allocation(output_len))?;

    let mut last = 0;
    for (span, chars) in spans {
        output.extend_from_slice(&input[last..span.start]);
        for _ in 0..chars {
            output.extend_from_slice(glyph);
        }
        last = span.end;
    }
    output.extend_from_slice(&input[last..]);

    Ok(Masked { bytes: output, spans: span_count })
}

/// Counts characters the way masking does: one per scalar value, one per
/// stray byte.
pub fn char_count(bytes: &[u8]) -> usize {
    bytes
        .utf8_chunks()
        .map(|chunk| chunk.valid().chars().count() + chunk.invalid().len())
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compiled(source: &str) -> CompiledPattern {
        RegexCompiler.compile("TEST", source).unwrap()
    }

    fn mask(source: &str, input: &str, policy: MaskPolicy) -> String {
        let out = mask_bytes(&compiled(source), input.as_bytes(), policy).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn masks_every_match_and_keeps_the_rest() {
        assert_eq!(mask(r"\d{4}", "a 1234 b 5678", MaskPolicy::Glyph), "a **** b ****");
    }

    #[test]
    fn empty_input_yields_empty_output() {
        assert_eq!(mask(r"\d{4}", "", MaskPolicy::Glyph), "");
    }

    #[test]
    fn no_match_returns_input_unchanged() {
        assert_eq!(mask(r"\d{4}", "nothing here", MaskPolicy::Glyph), "nothing here");
    }

    #[test]
    fn full_match_masks_whole_input() {
        assert_eq!(mask(r".+", "secret", MaskPolicy::Char('#')), "######");
    }

    #[test]
    fn zero_length_matches_are_skipped() {
        assert_eq!(mask(r"\d*", "ab12cd", MaskPolicy::Glyph), "ab**cd");
        assert_eq!(mask(r"x?", "abc", MaskPolicy::Glyph), "abc");
    }

    #[test]
    fn multibyte_characters_are_masked_one_glyph_each() {
        assert_eq!(mask(r"비밀", "이건 비밀 이야", MaskPolicy::Glyph), "이건 ** 이야");
    }

    #[test]
    fn multibyte_mask_char_is_written_whole() {
        assert_eq!(mask(r"\d+", "pin 42", MaskPolicy::Char('●')), "pin ●●");
    }

    #[test]
    fn invalid_utf8_bytes_count_as_single_characters() {
        let pattern = compiled(r"(?-u:\xff)+");
        let out = mask_bytes(&pattern, b"a\xff\xffb", MaskPolicy::Glyph).unwrap();
        assert_eq!(out, b"a**b");
    }

    #[test]
    fn char_count_handles_mixed_input() {
        assert_eq!(char_count("한a".as_bytes()), 2);
        assert_eq!(char_count(b"\xff\xfeok"), 4);
        assert_eq!(char_count(b""), 0);
    }

    #[test]
    fn counted_masking_reports_non_empty_spans() {
        let masked = mask_bytes_counted(&compiled(r"\d*"), b"1 22 x 333", MaskPolicy::Glyph).unwrap();
        assert_eq!(masked.bytes, b"* ** x ***");
        assert_eq!(masked.spans, 3);
    }

    #[test]
    fn spans_are_ascending_and_disjoint() {
        let spans = masked_spans(&compiled(r"\d{2}"), b"12345");
        assert_eq!(spans, vec![0..2, 2..4]);
    }

    #[test]
    fn engine_masks_by_key() {
        let engine = MaskingEngine::from_registry(PatternRegistry::builtin());
        assert_eq!(
            engine.mask_str("SSN", "id 900101-1234567 ok", MaskPolicy::Glyph).unwrap(),
            "id ************** ok"
        );
        assert_eq!(
            engine.mask_str("NOPE", "id", MaskPolicy::Glyph).unwrap_err(),
            MaskError::UnknownPattern("NOPE".into())
        );
    }

    #[test]
    fn mask_str_rejects_output_that_splits_a_character() {
        let engine = MaskingEngine::from_registry(PatternRegistry::from_pairs([(
            "LEAD",
            r"(?-u:\xed)",
        )]));
        assert_eq!(
            engine.mask_str("LEAD", "한", MaskPolicy::Glyph).unwrap_err(),
            MaskError::SplitCharacter { key: "LEAD".into() }
        );
        assert_eq!(
            engine.mask("LEAD", "한".as_bytes(), MaskPolicy::Glyph).unwrap(),
            b"*\x95\x9c"
        );
    }

    #[test]
    fn digit_class_matches_any_unicode_decimal_digit() {
        assert_eq!(mask(r"\d{4}", "tel ١٢٣٤ / ０１２３", MaskPolicy::Glyph), "tel **** / ****");
    }

    #[test]
    fn ascii_digit_class_leaves_other_scripts_alone() {
        assert_eq!(
            mask(r"(?-u:\d){4}", "tel ١٢٣٤ / ０１２３ / 5678", MaskPolicy::Glyph),
            "tel ١٢٣٤ / ０１２３ / ****"
        );
    }

    #[test]
    fn engine_clones_share_one_cache() {
        let engine = MaskingEngine::from_registry(PatternRegistry::builtin());
        let clone = engine.clone();
        engine.mask("APN", b"1234", MaskPolicy::Glyph).unwrap();
        assert_eq!(clone.cache().stats().compiled, 1);
    }
}
