//! The compiled pattern object and its match operations.

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::canonicalize::{
    canonicalize_hash, canonicalize_hostname, canonicalize_ipv6_hostname,
    canonicalize_opaque_hostname, canonicalize_opaque_pathname, canonicalize_password,
    canonicalize_pathname, canonicalize_port, canonicalize_protocol, canonicalize_search,
    canonicalize_username, special_scheme_default_port,
};
use crate::component::Component;
use crate::constructor::parse_constructor_string;
use crate::error::{PatternError, PatternResult};
use crate::init::{ProcessType, UrlPatternInit};
use crate::pattern::Options;

/// Options recognized when building a pattern. Case-insensitive matching
/// applies to the pathname, search, and hash components only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlPatternOptions {
    pub ignore_case: bool,
}

/// A compiled URL pattern: eight independently compiled components. Immutable
/// once built; matching borrows the pattern read-only, so a single pattern
/// can serve any number of threads.
#[derive(Debug)]
pub struct UrlPattern {
    protocol: Component,
    username: Component,
    password: Component,
    hostname: Component,
    port: Component,
    pathname: Component,
    search: Component,
    hash: Component,
}

/// A successful match: the raw inputs the caller passed, plus one
/// [`UrlPatternComponentResult`] per URL component.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlPatternResult {
    pub inputs: Vec<String>,
    pub init_inputs: Vec<UrlPatternInit>,
    pub protocol: UrlPatternComponentResult,
    pub username: UrlPatternComponentResult,
    pub password: UrlPatternComponentResult,
    pub hostname: UrlPatternComponentResult,
    pub port: UrlPatternComponentResult,
    pub pathname: UrlPatternComponentResult,
    pub search: UrlPatternComponentResult,
    pub hash: UrlPatternComponentResult,
}

/// The outcome of matching one component: the string it ran against and the
/// captured value per group name. The map is empty when the component's only
/// capture matched the empty input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlPatternComponentResult {
    pub input: String,
    pub groups: HashMap<String, String>,
}

/// The eight component strings of a parsed URL, in the shape the component
/// regexps run against.
struct UrlComponents {
    protocol: String,
    username: String,
    password: String,
    hostname: String,
    port: String,
    pathname: String,
    search: String,
    hash: String,
}

impl UrlComponents {
    fn from_url(url: &Url) -> Self {
        Self {
            protocol: url.scheme().to_string(),
            username: url.username().to_string(),
            password: url.password().unwrap_or_default().to_string(),
            hostname: url.host_str().unwrap_or_default().to_string(),
            port: url.port().map(|port| port.to_string()).unwrap_or_default(),
            pathname: url::quirks::pathname(url).to_string(),
            search: url.query().unwrap_or_default().to_string(),
            hash: url.fragment().unwrap_or_default().to_string(),
        }
    }
}

impl UrlPattern {
    /// Compiles a pattern from its string form. A pattern without a protocol
    /// section is relative and requires `base_url`.
    pub fn compile(
        input: &str,
        base_url: Option<&str>,
        options: &UrlPatternOptions,
    ) -> PatternResult<Self> {
        let base_url = base_url.filter(|base_url| !base_url.is_empty());
        let mut init = parse_constructor_string(input)?;
        if base_url.is_none() && init.protocol.is_none() {
            return Err(PatternError::NoBaseUrl);
        }
        init.base_url = base_url.map(str::to_string);
        Self::compile_init(&init, options)
    }

    /// Compiles a pattern from a structured init. Components left absent
    /// after base-URL inheritance default to the full wildcard `*`.
    pub fn compile_init(init: &UrlPatternInit, options: &UrlPatternOptions) -> PatternResult<Self> {
        let processed = init.process(ProcessType::Pattern, UrlPatternInit::default())?;

        let wildcard = || "*".to_string();
        let protocol_string = processed.protocol.unwrap_or_else(wildcard);
        let username_string = processed.username.unwrap_or_else(wildcard);
        let password_string = processed.password.unwrap_or_else(wildcard);
        let hostname_string = processed.hostname.unwrap_or_else(wildcard);
        let mut port_string = processed.port.unwrap_or_else(wildcard);
        let pathname_string = processed.pathname.unwrap_or_else(wildcard);
        let search_string = processed.search.unwrap_or_else(wildcard);
        let hash_string = processed.hash.unwrap_or_else(wildcard);

        // A literal default port is redundant with its special scheme.
        if let Some(default_port) = special_scheme_default_port(&protocol_string)
            && port_string == default_port.to_string()
        {
            port_string = String::new();
        }

        let default_options = Options::default();
        let protocol = Component::compile(&protocol_string, canonicalize_protocol, &default_options)?;
        let username = Component::compile(&username_string, canonicalize_username, &default_options)?;
        let password = Component::compile(&password_string, canonicalize_password, &default_options)?;

        let hostname_options = Options::hostname();
        let hostname = if hostname_pattern_is_ipv6_address(&hostname_string) {
            Component::compile(&hostname_string, canonicalize_ipv6_hostname, &hostname_options)?
        } else if protocol.protocol_matches_special_scheme() {
            Component::compile(&hostname_string, canonicalize_hostname, &hostname_options)?
        } else {
            Component::compile(
                &hostname_string,
                canonicalize_opaque_hostname,
                &hostname_options,
            )?
        };

        let port = Component::compile(
            &port_string,
            |value| canonicalize_port(value, None),
            &default_options,
        )?;

        let pathname = if protocol.protocol_matches_special_scheme() {
            Component::compile(
                &pathname_string,
                canonicalize_pathname,
                &Options::pathname(options.ignore_case),
            )?
        } else {
            Component::compile(
                &pathname_string,
                canonicalize_opaque_pathname,
                &Options::with_ignore_case(options.ignore_case),
            )?
        };

        let compile_options = Options::with_ignore_case(options.ignore_case);
        let search = Component::compile(&search_string, canonicalize_search, &compile_options)?;
        let hash = Component::compile(&hash_string, canonicalize_hash, &compile_options)?;

        Ok(Self {
            protocol,
            username,
            password,
            hostname,
            port,
            pathname,
            search,
            hash,
        })
    }

    pub fn protocol(&self) -> &str {
        &self.protocol.pattern_string
    }

    pub fn username(&self) -> &str {
        &self.username.pattern_string
    }

    pub fn password(&self) -> &str {
        &self.password.pattern_string
    }

    pub fn hostname(&self) -> &str {
        &self.hostname.pattern_string
    }

    pub fn port(&self) -> &str {
        &self.port.pattern_string
    }

    pub fn pathname(&self) -> &str {
        &self.pathname.pattern_string
    }

    pub fn search(&self) -> &str {
        &self.search.pattern_string
    }

    pub fn hash(&self) -> &str {
        &self.hash.pattern_string
    }

    /// Whether any component carries a custom regular expression group.
    pub fn has_regexp_groups(&self) -> bool {
        self.protocol.has_regexp_groups
            || self.username.has_regexp_groups
            || self.password.has_regexp_groups
            || self.hostname.has_regexp_groups
            || self.port.has_regexp_groups
            || self.pathname.has_regexp_groups
            || self.search.has_regexp_groups
            || self.hash.has_regexp_groups
    }

    /// Matches a URL string, resolved against `base_url` when given. Inputs
    /// that fail to parse as URLs are reported as "no match" rather than as
    /// errors.
    #[tracing::instrument(level = "trace", skip(self), fields(input = %input))]
    pub fn exec(&self, input: &str, base_url: Option<&str>) -> Option<UrlPatternResult> {
        let mut inputs = vec![input.to_string()];

        let parsed_base = match base_url {
            Some(base_url) if !base_url.is_empty() => {
                inputs.push(base_url.to_string());
                match Url::parse(base_url) {
                    Ok(url) => Some(url),
                    Err(_) => return None,
                }
            }
            _ => None,
        };

        let url = Url::options()
            .base_url(parsed_base.as_ref())
            .parse(input)
            .ok()?;

        self.run_match(UrlComponents::from_url(&url), inputs, Vec::new())
    }

    /// Matches a structured input: the init is processed with the component
    /// canonicalizers, components it omits count as empty.
    pub fn exec_init(&self, init: &UrlPatternInit) -> Option<UrlPatternResult> {
        let empty_components = UrlPatternInit {
            protocol: Some(String::new()),
            username: Some(String::new()),
            password: Some(String::new()),
            hostname: Some(String::new()),
            port: Some(String::new()),
            pathname: Some(String::new()),
            search: Some(String::new()),
            hash: Some(String::new()),
            base_url: None,
        };
        let processed = init.process(ProcessType::Url, empty_components).ok()?;

        let components = UrlComponents {
            protocol: processed.protocol.unwrap_or_default(),
            username: processed.username.unwrap_or_default(),
            password: processed.password.unwrap_or_default(),
            hostname: processed.hostname.unwrap_or_default(),
            port: processed.port.unwrap_or_default(),
            pathname: processed.pathname.unwrap_or_default(),
            search: processed.search.unwrap_or_default(),
            hash: processed.hash.unwrap_or_default(),
        };

        self.run_match(components, Vec::new(), vec![init.clone()])
    }

    pub fn test(&self, input: &str, base_url: Option<&str>) -> bool {
        self.exec(input, base_url).is_some()
    }

    pub fn test_init(&self, init: &UrlPatternInit) -> bool {
        self.exec_init(init).is_some()
    }

    fn run_match(
        &self,
        components: UrlComponents,
        inputs: Vec<String>,
        init_inputs: Vec<UrlPatternInit>,
    ) -> Option<UrlPatternResult> {
        let protocol_captures = self.protocol.regexp.captures(&components.protocol)?;
        let username_captures = self.username.regexp.captures(&components.username)?;
        let password_captures = self.password.regexp.captures(&components.password)?;
        let hostname_captures = self.hostname.regexp.captures(&components.hostname)?;
        let port_captures = self.port.regexp.captures(&components.port)?;
        let pathname_captures = self.pathname.regexp.captures(&components.pathname)?;
        let search_captures = self.search.regexp.captures(&components.search)?;
        let hash_captures = self.hash.regexp.captures(&components.hash)?;

        Some(UrlPatternResult {
            inputs,
            init_inputs,
            protocol: self
                .protocol
                .create_match_result(&components.protocol, &protocol_captures),
            username: self
                .username
                .create_match_result(&components.username, &username_captures),
            password: self
                .password
                .create_match_result(&components.password, &password_captures),
            hostname: self
                .hostname
                .create_match_result(&components.hostname, &hostname_captures),
            port: self.port.create_match_result(&components.port, &port_captures),
            pathname: self
                .pathname
                .create_match_result(&components.pathname, &pathname_captures),
            search: self
                .search
                .create_match_result(&components.search, &search_captures),
            hash: self.hash.create_match_result(&components.hash, &hash_captures),
        })
    }
}

/// Whether a hostname pattern should be treated as an IPv6 address: it opens
/// with `[`, possibly grouped or escaped.
fn hostname_pattern_is_ipv6_address(input: &str) -> bool {
    let mut chars = input.chars();
    let (Some(first), Some(second)) = (chars.next(), chars.next()) else {
        return false;
    };
    first == '[' || (first == '{' && second == '[') || (first == '\\' && second == '[')
}
