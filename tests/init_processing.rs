use urlpattern_rs::{UrlPattern, UrlPatternInit, UrlPatternOptions};

fn compile_init(init: &UrlPatternInit) -> UrlPattern {
    UrlPattern::compile_init(init, &UrlPatternOptions::default()).expect("init should compile")
}

#[test]
fn base_url_fills_omitted_leading_components() {
    let init = UrlPatternInit {
        pathname: Some("/p".to_string()),
        base_url: Some("https://host.test:8080/x?q=1#top".to_string()),
        ..Default::default()
    };
    let pattern = compile_init(&init);
    assert_eq!(pattern.protocol(), "https");
    assert_eq!(pattern.hostname(), "host.test");
    assert_eq!(pattern.port(), "8080");
    assert_eq!(pattern.pathname(), "/p");
    // Components after an explicitly given one are not inherited.
    assert_eq!(pattern.search(), "*");
    assert_eq!(pattern.hash(), "*");
    // Credentials are never inherited into a pattern.
    assert_eq!(pattern.username(), "*");
    assert_eq!(pattern.password(), "*");
}

#[test]
fn inheritance_stops_at_a_present_component() {
    let init = UrlPatternInit {
        hostname: Some("example.com".to_string()),
        base_url: Some("https://other.test:8080/".to_string()),
        ..Default::default()
    };
    let pattern = compile_init(&init);
    assert_eq!(pattern.protocol(), "https");
    assert_eq!(pattern.hostname(), "example.com");
    assert_eq!(pattern.port(), "*");
    assert_eq!(pattern.pathname(), "*");
}

#[test]
fn relative_pathname_joins_with_the_base_directory() {
    let init = UrlPatternInit {
        pathname: Some("to/file".to_string()),
        base_url: Some("https://example.com/a/b/c".to_string()),
        ..Default::default()
    };
    assert_eq!(compile_init(&init).pathname(), "/a/b/to/file");
}

#[test]
fn absolute_pathname_is_not_joined() {
    let init = UrlPatternInit {
        pathname: Some("/root".to_string()),
        base_url: Some("https://example.com/a/b/".to_string()),
        ..Default::default()
    };
    assert_eq!(compile_init(&init).pathname(), "/root");
}

#[test]
fn escaped_and_grouped_slashes_count_as_absolute() {
    for pathname in ["\\/root", "{/root}"] {
        let init = UrlPatternInit {
            pathname: Some(pathname.to_string()),
            base_url: Some("https://example.com/a/b/".to_string()),
            ..Default::default()
        };
        assert_eq!(compile_init(&init).pathname(), "/root", "{pathname}");
    }
}

#[test]
fn opaque_base_pathname_is_not_joined() {
    let init = UrlPatternInit {
        pathname: Some("segment".to_string()),
        base_url: Some("data:foo/bar".to_string()),
        ..Default::default()
    };
    let pattern = compile_init(&init);
    assert_eq!(pattern.protocol(), "data");
    assert_eq!(pattern.pathname(), "segment");
}

#[test]
fn protocol_strips_a_trailing_colon() {
    let init = UrlPatternInit {
        protocol: Some("https:".to_string()),
        ..Default::default()
    };
    assert_eq!(compile_init(&init).protocol(), "https");
}

#[test]
fn search_and_hash_strip_their_prefixes() {
    let init = UrlPatternInit {
        search: Some("?q=:term".to_string()),
        hash: Some("#:frag".to_string()),
        ..Default::default()
    };
    let pattern = compile_init(&init);
    assert_eq!(pattern.search(), "q=:term");
    assert_eq!(pattern.hash(), ":frag");
}

#[test]
fn default_port_for_inited_special_scheme_is_elided() {
    let init = UrlPatternInit {
        protocol: Some("https".to_string()),
        hostname: Some("example.com".to_string()),
        port: Some("443".to_string()),
        ..Default::default()
    };
    assert_eq!(compile_init(&init).port(), "");
}

#[test]
fn init_deserializes_from_wpt_style_json() {
    let init: UrlPatternInit =
        serde_json::from_str(r#"{ "pathname": "/books/:id", "baseURL": "https://example.com" }"#)
            .expect("init should deserialize");
    let pattern = compile_init(&init);
    assert_eq!(pattern.hostname(), "example.com");
    assert_eq!(pattern.pathname(), "/books/:id");
    assert!(pattern.test("https://example.com/books/42", None));
}

#[test]
fn invalid_base_url_fails_compilation() {
    let init = UrlPatternInit {
        pathname: Some("/x".to_string()),
        base_url: Some("not a url".to_string()),
        ..Default::default()
    };
    let err = UrlPattern::compile_init(&init, &UrlPatternOptions::default())
        .expect_err("invalid base should fail");
    match err {
        urlpattern_rs::PatternError::Url(_) => {}
        other => panic!("unexpected error: {other:?}"),
    }
}
