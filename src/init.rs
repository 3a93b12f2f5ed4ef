//! The structured form of a pattern or match input, and its processing:
//! base-URL inheritance, per-component normalization, and relative-pathname
//! resolution.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::canonicalize::{
    canonicalize_hash, canonicalize_hostname, canonicalize_opaque_pathname, canonicalize_password,
    canonicalize_pathname, canonicalize_port, canonicalize_protocol, canonicalize_search,
    canonicalize_username, is_special_scheme,
};
use crate::error::PatternResult;
use crate::escape::escape_pattern_string;

/// Whether init components hold pattern strings or URL component strings.
/// Pattern processing leaves values untouched apart from affix stripping;
/// URL processing runs the component canonicalizers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ProcessType {
    Pattern,
    Url,
}

/// Structured input for building a pattern or for matching. Each component is
/// either absent or a string; absent components are inherited from `base_url`
/// where applicable and default to `*` (patterns) or the empty string
/// (match inputs).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UrlPatternInit {
    pub protocol: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub hostname: Option<String>,
    pub port: Option<String>,
    pub pathname: Option<String>,
    pub search: Option<String>,
    pub hash: Option<String>,
    #[serde(rename = "baseURL")]
    pub base_url: Option<String>,
}

impl UrlPatternInit {
    /// Normalizes this init into a fully resolved one. `result` carries the
    /// caller's starting values: all-absent when building a pattern, empty
    /// strings when preparing a match input.
    pub(crate) fn process(
        &self,
        kind: ProcessType,
        mut result: UrlPatternInit,
    ) -> PatternResult<UrlPatternInit> {
        let base_url = match &self.base_url {
            Some(base_url) => Some(Url::parse(base_url)?),
            None => None,
        };

        if let Some(base_url) = &base_url {
            // A component is inherited from the base URL only while this
            // init leaves it and every earlier URL component unset.
            if self.protocol.is_none() {
                result.protocol = Some(process_base_url_string(base_url.scheme(), kind));
            }
            if kind != ProcessType::Pattern
                && self.protocol.is_none()
                && self.hostname.is_none()
                && self.port.is_none()
                && self.username.is_none()
            {
                result.username = Some(process_base_url_string(base_url.username(), kind));
            }
            if kind != ProcessType::Pattern
                && self.protocol.is_none()
                && self.hostname.is_none()
                && self.port.is_none()
                && self.username.is_none()
                && self.password.is_none()
            {
                result.password = Some(process_base_url_string(
                    base_url.password().unwrap_or_default(),
                    kind,
                ));
            }
            if self.protocol.is_none() && self.hostname.is_none() {
                result.hostname = Some(process_base_url_string(
                    base_url.host_str().unwrap_or_default(),
                    kind,
                ));
            }
            if self.protocol.is_none() && self.hostname.is_none() && self.port.is_none() {
                result.port = Some(
                    base_url
                        .port()
                        .map(|port| port.to_string())
                        .unwrap_or_default(),
                );
            }
            if self.protocol.is_none()
                && self.hostname.is_none()
                && self.port.is_none()
                && self.pathname.is_none()
            {
                result.pathname = Some(process_base_url_string(url::quirks::pathname(base_url), kind));
            }
            if self.protocol.is_none()
                && self.hostname.is_none()
                && self.port.is_none()
                && self.pathname.is_none()
                && self.search.is_none()
            {
                result.search =
                    Some(process_base_url_string(base_url.query().unwrap_or_default(), kind));
            }
            if self.protocol.is_none()
                && self.hostname.is_none()
                && self.port.is_none()
                && self.pathname.is_none()
                && self.search.is_none()
                && self.hash.is_none()
            {
                result.hash = Some(process_base_url_string(
                    base_url.fragment().unwrap_or_default(),
                    kind,
                ));
            }
        }

        if let Some(protocol) = &self.protocol {
            result.protocol = Some(process_protocol_for_init(protocol, kind)?);
        }
        if let Some(username) = &self.username {
            result.username = Some(process_username_for_init(username, kind)?);
        }
        if let Some(password) = &self.password {
            result.password = Some(process_password_for_init(password, kind)?);
        }
        if let Some(hostname) = &self.hostname {
            result.hostname = Some(process_hostname_for_init(hostname, kind)?);
        }

        let protocol_context = result.protocol.clone().unwrap_or_default();

        if let Some(port) = &self.port {
            result.port = Some(process_port_for_init(port, &protocol_context, kind)?);
        }

        if let Some(pathname) = &self.pathname {
            let mut pathname = pathname.clone();
            if let Some(base_url) = &base_url
                && !base_url.cannot_be_a_base()
                && !is_absolute_pathname(&pathname, kind)
            {
                // Resolve against the base pathname up to and including its
                // final slash.
                let base_pathname = process_base_url_string(url::quirks::pathname(base_url), kind);
                if let Some(slash_index) = base_pathname.rfind('/') {
                    pathname = format!("{}{}", &base_pathname[..=slash_index], pathname);
                }
            }
            result.pathname = Some(process_pathname_for_init(&pathname, &protocol_context, kind)?);
        }

        if let Some(search) = &self.search {
            result.search = Some(process_search_for_init(search, kind)?);
        }
        if let Some(hash) = &self.hash {
            result.hash = Some(process_hash_for_init(hash, kind)?);
        }

        result.base_url = None;
        Ok(result)
    }
}

/// Base-URL component values become literal text inside a pattern, so pattern
/// processing escapes them.
fn process_base_url_string(input: &str, kind: ProcessType) -> String {
    if kind == ProcessType::Pattern {
        escape_pattern_string(input)
    } else {
        input.to_string()
    }
}

fn process_protocol_for_init(value: &str, kind: ProcessType) -> PatternResult<String> {
    let stripped_value = value.strip_suffix(':').unwrap_or(value);
    if kind == ProcessType::Pattern {
        return Ok(stripped_value.to_string());
    }
    canonicalize_protocol(stripped_value)
}

fn process_username_for_init(value: &str, kind: ProcessType) -> PatternResult<String> {
    if kind == ProcessType::Pattern {
        return Ok(value.to_string());
    }
    canonicalize_username(value)
}

fn process_password_for_init(value: &str, kind: ProcessType) -> PatternResult<String> {
    if kind == ProcessType::Pattern {
        return Ok(value.to_string());
    }
    canonicalize_password(value)
}

fn process_hostname_for_init(value: &str, kind: ProcessType) -> PatternResult<String> {
    if kind == ProcessType::Pattern {
        return Ok(value.to_string());
    }
    canonicalize_hostname(value)
}

fn process_port_for_init(port: &str, protocol: &str, kind: ProcessType) -> PatternResult<String> {
    if kind == ProcessType::Pattern {
        return Ok(port.to_string());
    }
    canonicalize_port(port, Some(protocol))
}

fn process_pathname_for_init(
    pathname: &str,
    protocol: &str,
    kind: ProcessType,
) -> PatternResult<String> {
    if kind == ProcessType::Pattern {
        return Ok(pathname.to_string());
    }
    if protocol.is_empty() || is_special_scheme(protocol) {
        canonicalize_pathname(pathname)
    } else {
        canonicalize_opaque_pathname(pathname)
    }
}

fn process_search_for_init(value: &str, kind: ProcessType) -> PatternResult<String> {
    let stripped_value = value.strip_prefix('?').unwrap_or(value);
    if kind == ProcessType::Pattern {
        return Ok(stripped_value.to_string());
    }
    canonicalize_search(stripped_value)
}

fn process_hash_for_init(value: &str, kind: ProcessType) -> PatternResult<String> {
    let stripped_value = value.strip_prefix('#').unwrap_or(value);
    if kind == ProcessType::Pattern {
        return Ok(stripped_value.to_string());
    }
    canonicalize_hash(stripped_value)
}

/// A pathname is absolute when it starts with `/`, or, in pattern strings,
/// with an escaped or grouped slash.
fn is_absolute_pathname(input: &str, kind: ProcessType) -> bool {
    if input.is_empty() {
        return false;
    }
    if input.starts_with('/') {
        return true;
    }
    if kind == ProcessType::Url {
        return false;
    }
    input.starts_with("\\/") || input.starts_with("{/")
}
