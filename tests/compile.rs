use urlpattern_rs::{UrlPattern, UrlPatternInit, UrlPatternOptions};

fn compile(input: &str) -> UrlPattern {
    UrlPattern::compile(input, None, &UrlPatternOptions::default()).expect("pattern should compile")
}

fn compile_component(component: &str, value: &str) -> UrlPattern {
    let mut init = UrlPatternInit::default();
    match component {
        "protocol" => init.protocol = Some(value.to_string()),
        "hostname" => init.hostname = Some(value.to_string()),
        "pathname" => init.pathname = Some(value.to_string()),
        "search" => init.search = Some(value.to_string()),
        "hash" => init.hash = Some(value.to_string()),
        other => panic!("unexpected component: {other}"),
    }
    UrlPattern::compile_init(&init, &UrlPatternOptions::default()).expect("init should compile")
}

#[test]
fn empty_init_compiles_to_all_wildcards() {
    let pattern = UrlPattern::compile_init(&UrlPatternInit::default(), &UrlPatternOptions::default())
        .expect("empty init should compile");
    assert_eq!(pattern.protocol(), "*");
    assert_eq!(pattern.username(), "*");
    assert_eq!(pattern.password(), "*");
    assert_eq!(pattern.hostname(), "*");
    assert_eq!(pattern.port(), "*");
    assert_eq!(pattern.pathname(), "*");
    assert_eq!(pattern.search(), "*");
    assert_eq!(pattern.hash(), "*");
    assert!(pattern.test("https://example.com/anything?x#y", None));
    assert!(pattern.test("data:with-an-opaque-path", None));
}

#[test]
fn default_port_of_a_special_scheme_compiles_to_empty() {
    let pattern = compile("https://example.com:443/");
    assert_eq!(pattern.port(), "");
    assert!(pattern.test("https://example.com/", None));
}

#[test]
fn bare_authority_pattern_compiles_to_a_root_pathname() {
    let pattern = compile("https://example.com");
    assert_eq!(pattern.pathname(), "/");
    assert!(pattern.test("https://example.com/", None));
    assert!(!pattern.test("https://example.com/sub", None));

    let with_default_port = compile("https://example.com:443");
    assert_eq!(with_default_port.port(), "");
    assert_eq!(with_default_port.pathname(), "/");
    assert!(with_default_port.test("https://example.com/", None));
}

#[test]
fn non_default_port_is_kept() {
    let pattern = compile("https://example.com:8080/");
    assert_eq!(pattern.port(), "8080");
    assert!(pattern.test("https://example.com:8080/", None));
    assert!(!pattern.test("https://example.com/", None));
}

#[test]
fn component_pattern_strings_round_trip() {
    let pattern = compile("https://{:sub.}*example.com/books/:id");
    for (component, value) in [
        ("protocol", pattern.protocol()),
        ("hostname", pattern.hostname()),
        ("pathname", pattern.pathname()),
    ] {
        let recompiled = compile_component(component, value);
        let round_tripped = match component {
            "protocol" => recompiled.protocol(),
            "hostname" => recompiled.hostname(),
            "pathname" => recompiled.pathname(),
            _ => unreachable!(),
        };
        assert_eq!(round_tripped, value, "{component} should round trip");
    }
}

#[test]
fn hostname_group_with_suffix_round_trips() {
    let pattern = compile_component("hostname", "{:sub.}+example.com");
    assert_eq!(pattern.hostname(), "{:sub.}+example.com");
}

#[test]
fn ignore_case_applies_to_the_pathname() {
    let options = UrlPatternOptions { ignore_case: true };
    let pattern = UrlPattern::compile("https://example.com/foo", None, &options)
        .expect("pattern should compile");
    assert!(pattern.test("https://example.com/FOO", None));

    let sensitive = compile("https://example.com/foo");
    assert!(!sensitive.test("https://example.com/FOO", None));
}

#[test]
fn has_regexp_groups_aggregates_over_components() {
    assert!(compile("https://example.com/:id(\\d+)").has_regexp_groups());
    assert!(!compile("https://example.com/:id").has_regexp_groups());
    assert!(!compile("https://*.example.com/*").has_regexp_groups());
}

#[test]
fn non_numeric_port_init_fails() {
    let init = UrlPatternInit {
        port: Some("abc".to_string()),
        ..Default::default()
    };
    let err = UrlPattern::compile_init(&init, &UrlPatternOptions::default())
        .expect_err("non-numeric port should fail");
    match err {
        urlpattern_rs::PatternError::InvalidPort { value } => assert_eq!(value, "abc"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn search_and_hash_reserialize() {
    let pattern = compile("https://example.com/?:query#:frag");
    assert_eq!(pattern.search(), ":query");
    assert_eq!(pattern.hash(), ":frag");
}
