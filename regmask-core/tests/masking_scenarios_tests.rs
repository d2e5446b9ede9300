// regmask-core/tests/masking_scenarios_tests.rs
//! End-to-end masking behaviour through the host entry points and the
//! typed engine, using the built-in pattern table.

use regmask_core::engine::char_count;
use regmask_core::udf::{mask, mask_with};
use regmask_core::{HeapContext, MaskError, MaskPolicy, MaskingEngine, PatternRegistry};
use test_log::test; // For integrating with `env_logger` in tests

fn engine() -> MaskingEngine {
    MaskingEngine::from_registry(PatternRegistry::builtin())
}

fn arg(text: &str) -> Option<&[u8]> {
    Some(text.as_bytes())
}

fn udf_mask(key: &str, input: &str) -> Option<String> {
    let mut ctx = HeapContext::new();
    mask(&mut ctx, &engine(), arg(key), arg(input)).map(|out| String::from_utf8(out).unwrap())
}

fn udf_mask_with(key: &str, input: &str, mask_val: &str) -> Option<String> {
    let mut ctx = HeapContext::new();
    mask_with(&mut ctx, &engine(), arg(key), arg(input), arg(mask_val))
        .map(|out| String::from_utf8(out).unwrap())
}

#[test]
fn phone_digits_are_glyph_masked_in_korean_text() {
    assert_eq!(
        udf_mask("APN", "내 번호는 010-1234-5678 입니다").as_deref(),
        Some("내 번호는 010-****-**** 입니다")
    );
}

#[test]
fn email_span_is_replaced_with_supplied_char() {
    assert_eq!(
        udf_mask_with("EMAIL", "contact: a.b@test.com today", "#").as_deref(),
        Some("contact: ############ today")
    );
}

#[test]
fn input_without_match_is_returned_unchanged() {
    let input = "주민번호 없음: 123-45-6789";
    assert_eq!(udf_mask("SSN", input).as_deref(), Some(input));
}

#[test]
fn ssn_is_masked_whole() {
    assert_eq!(udf_mask("SSN", "900101-1234567").as_deref(), Some("**************"));
}

#[test]
fn unknown_key_yields_null() {
    assert_eq!(udf_mask("UNKNOWN", "010-1234-5678"), None);
    assert_eq!(udf_mask_with("UNKNOWN", "010-1234-5678", "#"), None);
}

#[test]
fn replacement_of_wrong_length_yields_null() {
    assert_eq!(udf_mask_with("APN", "010-1234-5678", ""), None);
    assert_eq!(udf_mask_with("APN", "010-1234-5678", "XY"), None);
}

#[test]
fn empty_input_yields_empty_output() {
    for key in ["APN", "EMAIL", "SSN"] {
        assert_eq!(udf_mask(key, "").as_deref(), Some(""));
        assert_eq!(udf_mask_with(key, "", "#").as_deref(), Some(""));
    }
}

#[test]
fn invalid_utf8_input_is_masked_positionally() {
    let mut ctx = HeapContext::new();
    let input: &[u8] = b"\xff 1234 \xfe";
    let out = mask(&mut ctx, &engine(), arg("APN"), Some(input)).unwrap();
    assert_eq!(out, b"\xff **** \xfe");
}

const SAMPLES: &[&str] = &[
    "",
    "no digits at all",
    "내 번호는 010-1234-5678 입니다",
    "mail a.b@test.com and c@d.org",
    "900101-1234567 / 12345678901234",
    "1234567890123456789",
    "ＡＢＣ 1234 ｄｅｆ",
];

#[test]
fn glyph_masking_is_idempotent_for_digit_patterns() {
    let engine = engine();
    for key in ["APN", "SSN"] {
        for input in SAMPLES {
            let once = engine.mask_str(key, input, MaskPolicy::Glyph).unwrap();
            let twice = engine.mask_str(key, &once, MaskPolicy::Glyph).unwrap();
            assert_eq!(once, twice, "key {} input {:?}", key, input);
        }
    }
}

#[test]
fn masking_preserves_character_length() {
    let engine = engine();
    for key in ["APN", "EMAIL", "SSN"] {
        for policy in [MaskPolicy::Glyph, MaskPolicy::Char('#'), MaskPolicy::Char('●')] {
            for input in SAMPLES {
                let out = engine.mask_str(key, input, policy).unwrap();
                assert_eq!(
                    char_count(out.as_bytes()),
                    char_count(input.as_bytes()),
                    "key {} input {:?}",
                    key,
                    input
                );
            }
        }
    }
}

#[test]
fn characters_outside_matches_are_untouched() {
    let engine = engine();
    for key in ["APN", "EMAIL", "SSN"] {
        for input in SAMPLES {
            let spans = engine.find(key, input.as_bytes()).unwrap();
            let out = engine.mask_str(key, input, MaskPolicy::Char('#')).unwrap();
            let mut expected = String::new();
            let mut last = 0;
            for span in &spans {
                expected.push_str(&input[last..span.start]);
                expected.extend(std::iter::repeat('#').take(input[span.clone()].chars().count()));
                last = span.end;
            }
            expected.push_str(&input[last..]);
            assert_eq!(out, expected, "key {} input {:?}", key, input);
        }
    }
}

#[test]
fn typed_api_reports_unknown_key() {
    assert_eq!(
        engine().mask("UNKNOWN", b"x", MaskPolicy::Glyph),
        Err(MaskError::UnknownPattern("UNKNOWN".into()))
    );
}
