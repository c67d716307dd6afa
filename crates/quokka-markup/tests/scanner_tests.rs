//! Integration tests for the markup scanner.

use quokka_markup::{Document, ParseError, ScanState, parse};

/// Helper to parse input that is expected to be well-formed.
fn parse_ok(input: &str) -> Document {
    parse(input).unwrap_or_else(|err| panic!("expected {input:?} to parse:\n{err}"))
}

/// Helper to parse input that is expected to fail.
fn parse_err(input: &str) -> ParseError {
    match parse(input) {
        Ok(document) => panic!(
            "expected {input:?} to fail, got {}",
            document.as_text(document.root())
        ),
        Err(err) => err,
    }
}

// ========== basic structure ==========

#[test]
fn test_root_with_attribute_and_children() {
    let document = parse_ok("<a x=\"1\"><b>hi</b><c/></a>");
    let root = document.root();
    assert_eq!(document.name(root), "a");
    assert_eq!(document.attribute(root, "x"), Some("1"));

    let children = document.children(root);
    assert_eq!(children.len(), 2);
    let b = children[0];
    let c = children[1];
    assert_eq!(document.name(b), "b");
    assert_eq!(document.value(b), "hi");
    assert_eq!(document.name(c), "c");
    assert_eq!(document.value(c), "");
    assert_eq!(document.children(c).len(), 0);

    assert_eq!(document.as_text(root), "<a x=\"1\"><b>hi</b><c/></a>");
}

#[test]
fn test_self_closing_root() {
    let document = parse_ok("<a/>");
    assert_eq!(document.name(document.root()), "a");
    assert_eq!(document.children(document.root()).len(), 0);
}

#[test]
fn test_nested_elements() {
    let document = parse_ok("<a><b><c>deep</c></b></a>");
    let root = document.root();
    let c = document.descendant_by_name(root, "c").expect("c exists");
    assert_eq!(document.value(c), "deep");
    assert_eq!(document.ancestors(c).count(), 2);
}

#[test]
fn test_duplicate_child_names() {
    let document = parse_ok("<list><item>1</item><item>2</item></list>");
    let root = document.root();
    let items: Vec<_> = document.children_by_name(root, "item").collect();
    assert_eq!(items.len(), 2);
    assert_eq!(document.value(items[0]), "1");
    assert_eq!(document.value(items[1]), "2");
}

// ========== text handling ==========

#[test]
fn test_text_is_decoded() {
    let document = parse_ok("<a>1 &lt; 2</a>");
    assert_eq!(document.value(document.root()), "1 < 2");
    assert_eq!(document.as_text(document.root()), "<a>1 &lt; 2</a>");
}

#[test]
fn test_text_is_trimmed_at_completion() {
    let document = parse_ok("<a>  hi there  </a>");
    assert_eq!(document.value(document.root()), "hi there");
}

#[test]
fn test_interior_whitespace_is_preserved() {
    let document = parse_ok("<a>line1\nline2</a>");
    assert_eq!(document.value(document.root()), "line1\nline2");
}

#[test]
fn test_text_runs_around_children_are_joined() {
    let document = parse_ok("<a>x<b/>y</a>");
    let root = document.root();
    assert_eq!(document.value(root), "xy");
    assert_eq!(document.children(root).len(), 1);
}

#[test]
fn test_raw_gt_and_quotes_are_text_data() {
    let document = parse_ok("<a>1 > 0, it's \"fine\"</a>");
    assert_eq!(document.value(document.root()), "1 > 0, it's \"fine\"");
}

#[test]
fn test_whitespace_only_content_yields_empty_value() {
    let document = parse_ok("<a>\n  <b/>\n</a>");
    let root = document.root();
    assert_eq!(document.value(root), "");
    assert_eq!(document.children(root).len(), 1);
}

// ========== attributes ==========

#[test]
fn test_single_and_double_quotes() {
    let document = parse_ok("<a one='1' two=\"2\"/>");
    let root = document.root();
    assert_eq!(document.attribute(root, "one"), Some("1"));
    assert_eq!(document.attribute(root, "two"), Some("2"));
}

#[test]
fn test_other_quote_character_is_data() {
    let document = parse_ok("<a x='say \"hi\"' y=\"it's\"/>");
    let root = document.root();
    assert_eq!(document.attribute(root, "x"), Some("say \"hi\""));
    assert_eq!(document.attribute(root, "y"), Some("it's"));
}

#[test]
fn test_attribute_values_are_decoded_and_trimmed() {
    let document = parse_ok("<a x=\"&lt;tag&gt;\" y=\" padded \"/>");
    let root = document.root();
    assert_eq!(document.attribute(root, "x"), Some("<tag>"));
    assert_eq!(document.attribute(root, "y"), Some("padded"));
}

#[test]
fn test_spaces_around_equals() {
    let document = parse_ok("<a x = \"1\"/>");
    assert_eq!(document.attribute(document.root(), "x"), Some("1"));
}

#[test]
fn test_attribute_value_keeps_interior_line_breaks() {
    let document = parse_ok("<a x=\"l1\nl2\"/>");
    assert_eq!(document.attribute(document.root(), "x"), Some("l1\nl2"));
}

// ========== comments ==========

#[test]
fn test_comment_produces_no_node() {
    let document = parse_ok("<a><!-- note --><b/></a>");
    let root = document.root();
    assert_eq!(document.children(root).len(), 1);
    assert_eq!(document.name(document.children(root)[0]), "b");
}

#[test]
fn test_comment_does_not_split_a_text_run() {
    let document = parse_ok("<a>x <!-- note --> y</a>");
    assert_eq!(document.value(document.root()), "x  y");
}

#[test]
fn test_comment_before_root() {
    let document = parse_ok("<!-- header --><a/>");
    assert_eq!(document.name(document.root()), "a");
}

#[test]
fn test_comment_inside_start_tag() {
    let document = parse_ok("<a <!-- note --> x=\"1\"/>");
    let root = document.root();
    assert_eq!(document.attribute(root, "x"), Some("1"));
    assert_eq!(document.children(root).len(), 0);
}

#[test]
fn test_comment_inside_end_tag() {
    let document = parse_ok("<a>hi</a<!-- note -->>");
    assert_eq!(document.value(document.root()), "hi");
}

#[test]
fn test_comment_body_is_never_scanned() {
    let document = parse_ok("<a><!-- <b> &lt; \" = --></a>");
    let root = document.root();
    assert_eq!(document.children(root).len(), 0);
    assert_eq!(document.value(root), "");
}

#[test]
fn test_unterminated_comment_fails() {
    let err = parse_err("<a><!-- never");
    assert!(err.to_string().contains("expected `-->`"));
}

// ========== literal blocks ==========

#[test]
fn test_cdata_is_verbatim() {
    let document = parse_ok("<a><![CDATA[<raw>&x</raw>]]></a>");
    assert_eq!(document.value(document.root()), "<raw>&x</raw>");
}

#[test]
fn test_cdata_splices_into_surrounding_text() {
    let document = parse_ok("<a> pre <![CDATA[ mid ]]> post </a>");
    assert_eq!(document.value(document.root()), "pre mid post");
}

#[test]
fn test_cdata_with_bracket_content() {
    let document = parse_ok("<a><![CDATA[x]]]></a>");
    assert_eq!(document.value(document.root()), "x]");
}

#[test]
fn test_unterminated_cdata_fails() {
    let err = parse_err("<a><![CDATA[never");
    assert!(err.to_string().contains("expected `]]>`"));
}

// ========== prolog ==========

#[test]
fn test_prolog_is_skipped() {
    let document = parse_ok("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<a/>");
    assert_eq!(document.name(document.root()), "a");
}

#[test]
fn test_unterminated_prolog_fails() {
    let err = parse_err("<?xml version=\"1.0\"");
    assert!(err.to_string().contains("expected `?>`"));
}

// ========== line-break folding ==========

#[test]
fn test_line_breaks_fold_inside_tags() {
    let document = parse_ok("<a\r\nx=\"1\"/>");
    assert_eq!(document.attribute(document.root(), "x"), Some("1"));
}

// ========== stray content ==========

#[test]
fn test_stray_text_before_root_is_discarded() {
    let document = parse_ok("junk <a/>");
    assert_eq!(document.name(document.root()), "a");
}

#[test]
fn test_content_after_root_is_ignored() {
    let document = parse_ok("<a/><b/>");
    assert_eq!(document.name(document.root()), "a");
    assert_eq!(document.children(document.root()).len(), 0);
}

// ========== failures ==========

#[test]
fn test_mismatched_closing_tag_fails_with_diagnostic() {
    let err = parse_err("<a><b></a>");
    let details = err.details();
    assert_eq!(details.state, ScanState::EndTagName);
    assert_eq!(details.position, 9);
    assert_eq!(details.buffer, "a");
    assert_eq!(details.open_element, "<b>");
    assert_eq!(details.parsed, "<a><b/></a>");
    assert!(details.hint.contains("does not match"));
    assert!(!err.to_string().is_empty());
}

#[test]
fn test_empty_input_fails() {
    let err = parse_err("");
    assert!(err.to_string().contains("no root element"));
}

#[test]
fn test_whitespace_only_input_fails() {
    let _ = parse_err("   \n ");
}

#[test]
fn test_unclosed_element_fails() {
    let err = parse_err("<a>");
    assert!(err.to_string().contains("still open"));
    let err = parse_err("<a><b></b>");
    assert!(err.to_string().contains("`<a>`"));
}

#[test]
fn test_unquoted_attribute_value_fails() {
    let err = parse_err("<a x=1/>");
    assert_eq!(err.details().state, ScanState::BeforeAttributeValue);
    assert!(err.to_string().contains("must be quoted"));
}

#[test]
fn test_attribute_without_value_fails() {
    let err = parse_err("<a x></a>");
    assert!(err.to_string().contains("has no value"));
}

#[test]
fn test_duplicate_attribute_fails() {
    let err = parse_err("<a x=\"1\" x=\"2\"/>");
    assert!(err.to_string().contains("already present"));
}

#[test]
fn test_end_of_input_inside_attribute_value() {
    let err = parse_err("<a x=\"1");
    let details = err.details();
    assert_eq!(details.state, ScanState::AttributeValue);
    assert_eq!(details.quote, Some('"'));
    assert_eq!(details.buffer, "1");
}

#[test]
fn test_closing_tag_before_any_element_fails() {
    let err = parse_err("</a>");
    assert!(err.to_string().contains("before any element"));
}

#[test]
fn test_doctype_is_rejected() {
    let err = parse_err("<!DOCTYPE html><a/>");
    assert!(err.to_string().contains("not supported"));
}

#[test]
fn test_bad_element_name_fails() {
    let err = parse_err("<1bad/>");
    assert!(err.to_string().contains("invalid element name"));
}

#[test]
fn test_stray_slash_in_tag_fails() {
    let err = parse_err("<a/ >");
    assert!(err.to_string().contains("immediately before `>`"));
}

#[test]
fn test_malformed_input_never_panics() {
    let nasty = [
        "<",
        "<>",
        "<a",
        "<a <",
        "<a></b>",
        "<a x=>",
        "<a x='>",
        "<a ='1'>",
        "<a>&unterminated",
        "<a><![CDATA[]></a>",
        "<<a/>",
        "<a>></a>>",
        "<?",
        "<!",
    ];
    for input in nasty {
        let _ = parse(input);
    }
}
