//! Replacement policies for masked spans.

use crate::errors::MaskError;

/// The glyph written over matches when no replacement is supplied.
pub const MASK_GLYPH: char = '*';

/// How each character inside a match is overwritten.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MaskPolicy {
    /// Overwrite with [`MASK_GLYPH`].
    #[default]
    Glyph,
    /// Overwrite with a caller-chosen character.
    Char(char),
}

impl MaskPolicy {
    /// Validates a caller-supplied replacement. It must decode to exactly one
    /// Unicode scalar value.
    pub fn from_replacement(replacement: &[u8]) -> Result<Self, MaskError> {
        let Ok(text) = std::str::from_utf8(replacement) else {
            return Err(MaskError::InvalidReplacement(replacement.len()));
        };
        let mut chars = text.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(MaskPolicy::Char(c)),
            _ => Err(MaskError::InvalidReplacement(text.chars().count())),
        }
    }

    pub fn mask_char(&self) -> char {
        match self {
            MaskPolicy::Glyph => MASK_GLYPH,
            MaskPolicy::Char(c) => *c,
        }
    }
}
