//! Integration tests for reference decoding and encoding.

use quokka_escape::{decode, encode, starts_with_reference};

// ========== decode: named references ==========

#[test]
fn test_decode_named_references() {
    assert_eq!(decode("&amp;"), "&");
    assert_eq!(decode("&lt;"), "<");
    assert_eq!(decode("&gt;"), ">");
    assert_eq!(decode("&apos;"), "'");
    assert_eq!(decode("&quot;"), "\"");
}

#[test]
fn test_decode_mixed_text() {
    assert_eq!(decode("1 &lt; 2 &amp;&amp; 3 &gt; 2"), "1 < 2 && 3 > 2");
    assert_eq!(decode("say &quot;hi&quot;"), "say \"hi\"");
}

// ========== decode: numeric references ==========

#[test]
fn test_decode_decimal_reference() {
    assert_eq!(decode("&#65;"), "A");
    assert_eq!(decode("&#1114111;"), "\u{10FFFF}");
}

#[test]
fn test_decode_hex_reference() {
    assert_eq!(decode("&#x41;"), "A");
    assert_eq!(decode("&#X41;"), "A");
    assert_eq!(decode("&#x1F600;"), "\u{1F600}");
    assert_eq!(decode("&#x10FFFF;"), "\u{10FFFF}");
}

// ========== decode: totality ==========

#[test]
fn test_lone_ampersand_passes_through() {
    assert_eq!(decode("&"), "&");
    assert_eq!(decode("a & b"), "a & b");
}

#[test]
fn test_unterminated_reference_passes_through() {
    assert_eq!(decode("&amp"), "&amp");
    assert_eq!(decode("&#65"), "&#65");
}

#[test]
fn test_unknown_reference_passes_through() {
    assert_eq!(decode("&nbsp;"), "&nbsp;");
    assert_eq!(decode("&notarealentity;"), "&notarealentity;");
}

#[test]
fn test_overlong_reference_passes_through() {
    // The body may be at most seven characters
    assert_eq!(decode("&#11141110;"), "&#11141110;");
    assert_eq!(decode("&toolongname;"), "&toolongname;");
}

#[test]
fn test_bad_digits_pass_through() {
    assert_eq!(decode("&#xZZ;"), "&#xZZ;");
    assert_eq!(decode("&#12a;"), "&#12a;");
    assert_eq!(decode("&#;"), "&#;");
    assert_eq!(decode("&;"), "&;");
}

#[test]
fn test_out_of_range_code_point_passes_through() {
    assert_eq!(decode("&#x110000;"), "&#x110000;");
}

#[test]
fn test_blocked_code_points_pass_through() {
    assert_eq!(decode("&#0;"), "&#0;");
    assert_eq!(decode("&#1;"), "&#1;");
    assert_eq!(decode("&#8;"), "&#8;");
    assert_eq!(decode("&#11;"), "&#11;");
    assert_eq!(decode("&#12;"), "&#12;");
    assert_eq!(decode("&#14;"), "&#14;");
    assert_eq!(decode("&#xD800;"), "&#xD800;");
    assert_eq!(decode("&#xDFFF;"), "&#xDFFF;");
    assert_eq!(decode("&#xFFFE;"), "&#xFFFE;");
    assert_eq!(decode("&#xFFFF;"), "&#xFFFF;");
}

#[test]
fn test_decode_never_panics_on_garbage() {
    // A few shapes that have tripped hand-written scanners
    for input in ["&", "&&&", "&#", "&#x", "a&", "&\u{1F600};", "&#x10FFFF", "&quot"] {
        let _ = decode(input);
    }
}

// ========== encode ==========

#[test]
fn test_encode_escapable_literals() {
    assert_eq!(encode("<"), "&lt;");
    assert_eq!(encode(">"), "&gt;");
    assert_eq!(encode("'"), "&apos;");
    assert_eq!(encode("\""), "&quot;");
    assert_eq!(encode("a < b > c"), "a &lt; b &gt; c");
}

#[test]
fn test_encode_bare_ampersand() {
    assert_eq!(encode("a & b"), "a &amp; b");
    assert_eq!(encode("&"), "&amp;");
}

#[test]
fn test_encode_leaves_valid_references_untouched() {
    assert_eq!(encode("&amp;"), "&amp;");
    assert_eq!(encode("&lt;x"), "&lt;x");
    assert_eq!(encode("&#65;"), "&#65;");
    assert_eq!(encode("&#x41;"), "&#x41;");
}

#[test]
fn test_encode_escapes_invalid_references() {
    assert_eq!(encode("&nope;"), "&amp;nope;");
    assert_eq!(encode("&amp"), "&amp;amp");
}

// ========== round-trip invariant ==========

#[test]
fn test_encode_decode_idempotence() {
    let samples = [
        "plain text",
        "1 &lt; 2",
        "&amp;&lt;&gt;&apos;&quot;",
        "a & b < c",
        "say \"hi\" & 'bye'",
        "mixed &lt; literal < and & &amp;",
    ];
    for s in samples {
        assert_eq!(encode(&decode(s)), encode(s), "failed for {s:?}");
    }
}

// ========== recognizer ==========

#[test]
fn test_starts_with_reference() {
    assert!(starts_with_reference("&amp; tail"));
    assert!(starts_with_reference("&#x41;"));
    assert!(!starts_with_reference("&amp tail"));
    assert!(!starts_with_reference("plain"));
}
