use urlpattern_rs::{PatternError, UrlPattern, UrlPatternInit, UrlPatternOptions};

fn pathname_init(pathname: &str) -> UrlPatternInit {
    UrlPatternInit {
        pathname: Some(pathname.to_string()),
        ..Default::default()
    }
}

fn compile_pathname(pathname: &str) -> Result<UrlPattern, PatternError> {
    UrlPattern::compile_init(&pathname_init(pathname), &UrlPatternOptions::default())
}

#[test]
fn parses_literal_and_named_group() {
    let pattern = compile_pathname("/users/:id").expect("pattern should compile");
    assert_eq!(pattern.pathname(), "/users/:id");
    assert!(!pattern.has_regexp_groups());
}

#[test]
fn parses_custom_regexp_group() {
    let pattern = compile_pathname("/users/:id(\\d+)").expect("pattern should compile");
    assert_eq!(pattern.pathname(), "/users/:id(\\d+)");
    assert!(pattern.has_regexp_groups());
}

#[test]
fn named_group_followed_by_literal_keeps_boundary() {
    let pattern = compile_pathname("/:name.jpg").expect("pattern should compile");
    assert_eq!(pattern.pathname(), "/:name.jpg");
}

#[test]
fn grouped_literal_with_modifier_round_trips() {
    let pattern = compile_pathname("{/books}?").expect("pattern should compile");
    assert_eq!(pattern.pathname(), "{/books}?");
}

#[test]
fn group_with_suffix_round_trips() {
    let pattern = compile_pathname("{/:id.html}?").expect("pattern should compile");
    assert_eq!(pattern.pathname(), "{/:id.html}?");
}

#[test]
fn escaped_characters_are_literal() {
    let pattern = compile_pathname("/a\\:b").expect("pattern should compile");
    assert_eq!(pattern.pathname(), "/a\\:b");
}

#[test]
fn rejects_duplicate_group_names() {
    let err = compile_pathname("/:id/:id").expect_err("duplicate names should fail");
    match err {
        PatternError::DuplicateName { name } => assert_eq!(name, "id"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn rejects_lone_trailing_escape() {
    let err = compile_pathname("/foo\\").expect_err("trailing escape should fail");
    match err {
        PatternError::Tokenize { .. } => {}
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn rejects_name_without_identifier() {
    let err = compile_pathname("/:/").expect_err("empty name should fail");
    match err {
        PatternError::Tokenize { .. } => {}
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn rejects_empty_regexp_group() {
    let err = compile_pathname("/()").expect_err("empty regexp should fail");
    match err {
        PatternError::Tokenize { .. } => {}
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn rejects_unterminated_regexp_group() {
    let err = compile_pathname("/(ab").expect_err("unterminated regexp should fail");
    match err {
        PatternError::Tokenize { .. } => {}
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn rejects_unclosed_brace_group() {
    let err = compile_pathname("/{ab").expect_err("unclosed group should fail");
    match err {
        PatternError::RequiredToken { expected, .. } => assert_eq!(expected, "close"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn rejects_dangling_modifier() {
    let err = compile_pathname("?foo").expect_err("dangling modifier should fail");
    match err {
        PatternError::RequiredToken { expected, .. } => assert_eq!(expected, "end"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn rejects_invalid_custom_regexp() {
    let err = compile_pathname("/([)").expect_err("invalid regexp should fail");
    match err {
        PatternError::Regex(_) => {}
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn anonymous_groups_number_from_zero() {
    let pattern = compile_pathname("/(\\d+)/(\\w+)").expect("pattern should compile");
    let result = pattern
        .exec("https://example.com/12/ab", None)
        .expect("input should match");
    assert_eq!(result.pathname.groups.get("0").map(String::as_str), Some("12"));
    assert_eq!(result.pathname.groups.get("1").map(String::as_str), Some("ab"));
}

#[test]
fn modifiers_survive_reserialization() {
    for pathname in ["/:id?", "/:id+", "/:id*", "/*"] {
        let pattern = compile_pathname(pathname).expect("pattern should compile");
        assert_eq!(pattern.pathname(), pathname);
    }
}
