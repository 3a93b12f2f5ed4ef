//! Per-component canonicalizers.
//!
//! Every canonicalizer maps the empty string to itself; non-empty values are
//! normalized through the WHATWG URL machinery of the `url` crate. These run
//! as the encoding callbacks of the pattern parser, so only the literal text
//! of a pattern is ever canonicalized, never its matching groups.

use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use url::{Host, Url};

use crate::error::{PatternError, PatternResult};

pub(crate) const SPECIAL_SCHEMES: [&str; 5] = ["ftp", "http", "https", "ws", "wss"];

pub(crate) fn is_special_scheme(scheme: &str) -> bool {
    SPECIAL_SCHEMES.contains(&scheme)
}

pub(crate) fn special_scheme_default_port(scheme: &str) -> Option<u16> {
    match scheme {
        "ftp" => Some(21),
        "http" | "ws" => Some(80),
        "https" | "wss" => Some(443),
        _ => None,
    }
}

// The WHATWG userinfo percent-encode set, built up the way the URL standard
// layers it: fragment ⊂ query/path ⊂ userinfo.
const FRAGMENT: &AsciiSet = &CONTROLS.add(b' ').add(b'"').add(b'<').add(b'>').add(b'`');
const PATH: &AsciiSet = &FRAGMENT.add(b'#').add(b'?').add(b'{').add(b'}');
const USERINFO: &AsciiSet = &PATH
    .add(b'/')
    .add(b':')
    .add(b';')
    .add(b'=')
    .add(b'@')
    .add(b'[')
    .add(b'\\')
    .add(b']')
    .add(b'^')
    .add(b'|');

fn dummy_url() -> Url {
    Url::parse("https://dummy.test").expect("dummy URL should parse")
}

pub(crate) fn canonicalize_protocol(value: &str) -> PatternResult<String> {
    if value.is_empty() {
        return Ok(String::new());
    }
    let url = Url::parse(&format!("{value}://dummy.test"))?;
    Ok(url.scheme().to_string())
}

pub(crate) fn canonicalize_username(value: &str) -> PatternResult<String> {
    if value.is_empty() {
        return Ok(String::new());
    }
    Ok(utf8_percent_encode(value, USERINFO).to_string())
}

pub(crate) fn canonicalize_password(value: &str) -> PatternResult<String> {
    if value.is_empty() {
        return Ok(String::new());
    }
    Ok(utf8_percent_encode(value, USERINFO).to_string())
}

/// Hostname canonicalization under special-scheme rules: domain parsing with
/// IDNA, or IPv6/IPv4 forms.
pub(crate) fn canonicalize_hostname(value: &str) -> PatternResult<String> {
    if value.is_empty() {
        return Ok(String::new());
    }
    let host = Host::parse(value)?;
    Ok(host.to_string())
}

/// Hostname canonicalization for non-special schemes, which keep the host
/// opaque but still reject forbidden host code points.
pub(crate) fn canonicalize_opaque_hostname(value: &str) -> PatternResult<String> {
    if value.is_empty() {
        return Ok(String::new());
    }
    let host = Host::parse_opaque(value)?;
    Ok(host.to_string())
}

pub(crate) fn canonicalize_ipv6_hostname(value: &str) -> PatternResult<String> {
    let mut result = String::with_capacity(value.len());
    for code_point in value.chars() {
        if code_point != '['
            && code_point != ']'
            && code_point != ':'
            && !code_point.is_ascii_hexdigit()
        {
            return Err(PatternError::InvalidIpv6Hostname {
                value: value.to_string(),
            });
        }
        result.push(code_point.to_ascii_lowercase());
    }
    Ok(result)
}

pub(crate) fn canonicalize_port(value: &str, protocol: Option<&str>) -> PatternResult<String> {
    if value.is_empty() {
        return Ok(String::new());
    }
    if !value.bytes().all(|byte| byte.is_ascii_digit()) {
        return Err(PatternError::InvalidPort {
            value: value.to_string(),
        });
    }
    let port: u16 = value.parse().map_err(|_| PatternError::InvalidPort {
        value: value.to_string(),
    })?;
    if let Some(protocol) = protocol
        && special_scheme_default_port(protocol) == Some(port)
    {
        return Ok(String::new());
    }
    Ok(port.to_string())
}

pub(crate) fn canonicalize_pathname(value: &str) -> PatternResult<String> {
    if value.is_empty() {
        return Ok(String::new());
    }
    // Path parsing forces a leading slash; values without one get "/-"
    // prepended and those two code points stripped again afterwards, keeping
    // relative fragments of a pathname pattern intact.
    let leading_slash = value.starts_with('/');
    let modified_value = if leading_slash {
        value.to_string()
    } else {
        format!("/-{value}")
    };
    let mut url = dummy_url();
    url.set_path(&modified_value);
    let mut result = url::quirks::pathname(&url).to_string();
    if !leading_slash {
        result = result[2..].to_string();
    }
    Ok(result)
}

pub(crate) fn canonicalize_opaque_pathname(value: &str) -> PatternResult<String> {
    if value.is_empty() {
        return Ok(String::new());
    }
    let mut url = Url::parse("data:dummy,test").expect("dummy opaque URL should parse");
    url.set_path(value);
    Ok(url::quirks::pathname(&url).to_string())
}

pub(crate) fn canonicalize_search(value: &str) -> PatternResult<String> {
    if value.is_empty() {
        return Ok(String::new());
    }
    let mut url = dummy_url();
    url.set_query(Some(value));
    Ok(url.query().unwrap_or_default().to_string())
}

pub(crate) fn canonicalize_hash(value: &str) -> PatternResult<String> {
    if value.is_empty() {
        return Ok(String::new());
    }
    let mut url = dummy_url();
    url.set_fragment(Some(value));
    Ok(url.fragment().unwrap_or_default().to_string())
}
