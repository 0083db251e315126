#[cfg(test)]
use super::*;
#[cfg(test)]
use crate::ast::Value;

// ===== Scalar Coercion Tests =====

#[test]
fn test_coerce_scalars() {
    assert_eq!(coerce("123"), Value::Int(123));
    assert_eq!(coerce("12.5"), Value::Float(12.5));
    assert_eq!(coerce("true"), Value::Bool(true));
    assert_eq!(coerce("TRUE"), Value::Bool(true));
    assert_eq!(coerce("False"), Value::Bool(false));
    assert_eq!(coerce("null"), Value::Null);
    assert_eq!(coerce("\"hi\""), Value::String("hi".into()));
    assert_eq!(coerce("'hi'"), Value::String("hi".into()));
}

#[test]
fn test_coerce_unrecognized_keeps_raw_text() {
    assert_eq!(coerce("abc"), Value::String("abc".into()));
    assert_eq!(coerce("-5"), Value::String("-5".into()));
    assert_eq!(coerce("1.2.3"), Value::String("1.2.3".into()));
    assert_eq!(coerce("0x1F"), Value::String("0x1F".into()));
    assert_eq!(coerce("1e5"), Value::String("1e5".into()));
    assert_eq!(coerce("."), Value::String(".".into()));
}

#[test]
fn test_coerce_integer_overflow_degrades_to_string() {
    let huge = "99999999999999999999999";
    assert_eq!(coerce(huge), Value::String(huge.into()));
}

#[test]
fn test_coerce_partial_decimals() {
    assert_eq!(coerce("5."), Value::Float(5.0));
    assert_eq!(coerce(".5"), Value::Float(0.5));
}

#[test]
fn test_unquote_rejects_embedded_quote() {
    assert_eq!(unquote("\"a\" \"b\""), None);
    assert_eq!(coerce("\"a\" \"b\""), Value::String("\"a\" \"b\"".into()));
}

#[test]
fn test_unquote_unescapes_matching_style_only() {
    assert_eq!(unquote(r#""say \"hi\"""#), Some("say \"hi\"".into()));
    assert_eq!(unquote(r#"'it\'s'"#), Some("it's".into()));
    assert_eq!(unquote(r#"'say \"hi\"'"#), Some(r#"say \"hi\""#.into()));
}

#[test]
fn test_display_recoerces_to_same_variant() {
    for token in ["123", "12.5", "true", "null", "\"hi\"", "abc", "3.0"] {
        let value = coerce(token);
        let again = coerce(&value.to_string());
        assert_eq!(value, again, "round trip failed for {}", token);
    }
}

#[test]
fn test_strip_quotes() {
    assert_eq!(strip_quotes("\"email\""), "email");
    assert_eq!(strip_quotes("'email'"), "email");
    assert_eq!(strip_quotes("email"), "email");
}

// ===== Balance Checker Tests =====

#[test]
fn test_balance_ignores_quoted_brackets() {
    assert!(is_balanced(r#"["[not a bracket]"]"#, Brackets::SQUARE));
    assert!(is_balanced(r#"['a]', "b["]"#, Brackets::SQUARE));
}

#[test]
fn test_balance_open_and_broken() {
    assert_eq!(
        scan_balance("[1, [2", Brackets::SQUARE),
        Balance::Open { depth: 2, offset: 0 }
    );
    assert_eq!(
        scan_balance("a]", Brackets::SQUARE),
        Balance::Broken { offset: 1, found: ']' }
    );
    assert!(!is_balanced("[1, 2", Brackets::SQUARE));
}

#[test]
fn test_balance_escaped_characters() {
    assert!(is_balanced(r#"[\]]"#, Brackets::SQUARE));
    assert!(is_balanced(r#"["a\"]"]"#, Brackets::SQUARE));
}

#[test]
fn test_balance_families() {
    assert!(is_balanced("{ (", Brackets::SQUARE));
    assert!(!is_balanced("{ (", Brackets::ALL));
    assert!(is_balanced("rule a { x: f(1) }", Brackets::ALL));
    assert!(!is_balanced("[ ( ] )", Brackets::ALL));
}

// ===== Splitting Tests =====

#[test]
fn test_split_top_level_respects_nesting() {
    let parts = split_top_level(r#"1, "a,b", [2, 3], {x: 1, y: 2}"#, ',');
    let parts: Vec<&str> = parts.iter().map(|p| p.trim()).collect();
    assert_eq!(parts, vec!["1", "\"a,b\"", "[2, 3]", "{x: 1, y: 2}"]);
}

#[test]
fn test_split_whitespace_top_level() {
    let tokens = split_whitespace_top_level(r#"enum("a", "b") default("a")  required"#);
    assert_eq!(tokens, vec![r#"enum("a", "b")"#, r#"default("a")"#, "required"]);

    let tokens = split_whitespace_top_level("array<map<string, int>>(max_items(5)) unique");
    assert_eq!(tokens, vec!["array<map<string, int>>(max_items(5))", "unique"]);
}

#[test]
fn test_find_and_match() {
    assert_eq!(find_top_level(r#""a:b": c"#, ':'), Some(5));
    assert_eq!(matching_close("f(a(b)) x", 1), Some(6));
    assert_eq!(matching_close("<a<b>>", 0), Some(5));
    assert_eq!(column_of("héllo", 3), 3);
}

// ===== Line Preprocessor Tests =====

#[test]
fn test_strip_comment_styles() {
    assert_eq!(strip_comment(r#"a = "x#y" # c"#, CommentStyle::FirstHash), "a = \"x");
    assert_eq!(strip_comment(r#"a: "x#y" # c"#, CommentStyle::Unquoted), "a: \"x#y\" ");
    assert_eq!(strip_comment("no comment", CommentStyle::Unquoted), "no comment");
}

#[test]
fn test_preprocess_numbers_lines() {
    let input = "# header\n\n  key = 1  # trailing\n\t\nother = 2\n";
    let lines = preprocess(input, CommentStyle::FirstHash);
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0].text, "key = 1");
    assert_eq!(lines[0].line, 3);
    assert_eq!(lines[0].column, 3);
    assert_eq!(lines[1].text, "other = 2");
    assert_eq!(lines[1].line, 5);
}

#[test]
fn test_merge_balanced_joins_runs() {
    let input = "[validations]\nrule adult {\n  validate: age >= 18,\n  message: \"too young\"\n}\nnext: 1\n";
    let lines = preprocess(input, CommentStyle::Unquoted);
    let merged = merge_balanced(lines, Brackets::ALL).expect("merge failed");

    assert_eq!(merged.len(), 3);
    assert_eq!(merged[0].text, "[validations]");
    assert_eq!(
        merged[1].text,
        "rule adult { validate: age >= 18, message: \"too young\" }"
    );
    assert_eq!(merged[1].line, 2);
    assert_eq!(merged[1].end_line, 5);
    assert_eq!(merged[2].line, 6);
}

#[test]
fn test_merge_balanced_unterminated_run() {
    let input = "[object]\ntags: array<string>(\n  max_items(5)\n";
    let lines = preprocess(input, CommentStyle::Unquoted);
    let err = merge_balanced(lines, Brackets::ALL).unwrap_err();

    assert_eq!(err.line(), Some(2));
    assert_eq!(err.column(), Some(20));
    assert_eq!(err.code(), Some(102));
}

#[test]
fn test_merge_balanced_stray_closer() {
    let input = "[object]\nname: string\n  )\n";
    let lines = preprocess(input, CommentStyle::Unquoted);
    let err = merge_balanced(lines, Brackets::ALL).unwrap_err();

    assert_eq!(err.line(), Some(3));
    assert_eq!(err.column(), Some(3));
    assert_eq!(err.code(), Some(101));
}
