//! Splits a free-form, URL-shaped pattern string into per-component pattern
//! strings.
//!
//! The input is tokenized leniently and scanned by a state machine that walks
//! protocol → authority → hostname → port → pathname → search → hash,
//! rewinding when a later token reveals which section the scan started in.
//! Component strings are sliced out of the original input between token
//! start offsets, so grouping and escapes survive verbatim for the
//! per-component pattern parser.

use crate::canonicalize::canonicalize_protocol;
use crate::component::Component;
use crate::error::PatternResult;
use crate::init::UrlPatternInit;
use crate::pattern::Options;
use crate::tokenizer::{Token, TokenKind, TokenizePolicy, tokenize};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Init,
    Protocol,
    Authority,
    Username,
    Password,
    Hostname,
    Port,
    Pathname,
    Search,
    Hash,
    Done,
}

struct ConstructorStringParser {
    input: Vec<char>,
    token_list: Vec<Token>,
    result: UrlPatternInit,
    component_start: usize,
    token_index: usize,
    token_increment: usize,
    group_depth: usize,
    hostname_ipv6_bracket_depth: usize,
    protocol_matches_special_scheme: bool,
    state: State,
}

#[tracing::instrument(level = "trace", fields(input = %input))]
pub(crate) fn parse_constructor_string(input: &str) -> PatternResult<UrlPatternInit> {
    let token_list = tokenize(input, TokenizePolicy::Lenient)?;

    let mut parser = ConstructorStringParser {
        input: input.chars().collect(),
        token_list,
        result: UrlPatternInit::default(),
        component_start: 0,
        token_index: 0,
        token_increment: 1,
        group_depth: 0,
        hostname_ipv6_bracket_depth: 0,
        protocol_matches_special_scheme: false,
        state: State::Init,
    };

    while parser.token_index < parser.token_list.len() {
        parser.token_increment = 1;

        if parser.token_list[parser.token_index].kind == TokenKind::End {
            if parser.state == State::Init {
                // Nothing looked URL-shaped so far; the whole input is a
                // single trailing section.
                parser.rewind();
                if parser.is_hash_prefix() {
                    parser.change_state(State::Hash, 1);
                } else if parser.is_search_prefix() {
                    parser.change_state(State::Search, 1);
                } else {
                    parser.change_state(State::Pathname, 0);
                }
                parser.token_index += parser.token_increment;
                continue;
            }
            if parser.state == State::Authority {
                parser.rewind_and_set_state(State::Hostname);
                parser.token_index += parser.token_increment;
                continue;
            }
            parser.change_state(State::Done, 0);
            break;
        }

        if parser.is_group_open() {
            parser.group_depth += 1;
            parser.token_index += parser.token_increment;
            continue;
        }
        if parser.group_depth > 0 {
            if parser.is_group_close() {
                parser.group_depth -= 1;
            } else {
                parser.token_index += parser.token_increment;
                continue;
            }
        }

        match parser.state {
            State::Init => {
                if parser.is_protocol_suffix() {
                    parser.rewind_and_set_state(State::Protocol);
                }
            }
            State::Protocol => {
                if parser.is_protocol_suffix() {
                    parser.compute_protocol_matches_special_scheme()?;
                    let mut next_state = State::Pathname;
                    let mut skip = 1;
                    if parser.next_is_authority_slashes() {
                        next_state = State::Authority;
                        skip = 3;
                    } else if parser.protocol_matches_special_scheme {
                        next_state = State::Authority;
                    }
                    parser.change_state(next_state, skip);
                }
            }
            State::Authority => {
                if parser.is_identity_terminator() {
                    parser.rewind_and_set_state(State::Username);
                } else if parser.is_pathname_start()
                    || parser.is_search_prefix()
                    || parser.is_hash_prefix()
                {
                    parser.rewind_and_set_state(State::Hostname);
                }
            }
            State::Username => {
                if parser.is_password_prefix() {
                    parser.change_state(State::Password, 1);
                } else if parser.is_identity_terminator() {
                    parser.change_state(State::Hostname, 1);
                }
            }
            State::Password => {
                if parser.is_identity_terminator() {
                    parser.change_state(State::Hostname, 1);
                }
            }
            State::Hostname => {
                if parser.is_ipv6_open() {
                    parser.hostname_ipv6_bracket_depth += 1;
                } else if parser.is_ipv6_close() {
                    parser.hostname_ipv6_bracket_depth =
                        parser.hostname_ipv6_bracket_depth.saturating_sub(1);
                } else if parser.is_port_prefix() && parser.hostname_ipv6_bracket_depth == 0 {
                    parser.change_state(State::Port, 1);
                } else if parser.is_pathname_start() {
                    parser.change_state(State::Pathname, 0);
                } else if parser.is_search_prefix() {
                    parser.change_state(State::Search, 1);
                } else if parser.is_hash_prefix() {
                    parser.change_state(State::Hash, 1);
                }
            }
            State::Port => {
                if parser.is_pathname_start() {
                    parser.change_state(State::Pathname, 0);
                } else if parser.is_search_prefix() {
                    parser.change_state(State::Search, 1);
                } else if parser.is_hash_prefix() {
                    parser.change_state(State::Hash, 1);
                }
            }
            State::Pathname => {
                if parser.is_search_prefix() {
                    parser.change_state(State::Search, 1);
                } else if parser.is_hash_prefix() {
                    parser.change_state(State::Hash, 1);
                }
            }
            State::Search => {
                if parser.is_hash_prefix() {
                    parser.change_state(State::Hash, 1);
                }
            }
            State::Hash => {}
            State::Done => unreachable!("the done state terminates the loop"),
        }

        parser.token_index += parser.token_increment;
    }

    if parser.result.hostname.is_some() && parser.result.port.is_none() {
        parser.result.port = Some(String::new());
    }

    Ok(parser.result)
}

impl ConstructorStringParser {
    fn rewind(&mut self) {
        self.token_index = self.component_start;
        self.token_increment = 0;
    }

    fn rewind_and_set_state(&mut self, state: State) {
        self.rewind();
        self.state = state;
    }

    fn change_state(&mut self, new_state: State, skip: usize) {
        match self.state {
            State::Init | State::Authority | State::Done => {}
            State::Protocol => self.result.protocol = Some(self.make_component_string()),
            State::Username => self.result.username = Some(self.make_component_string()),
            State::Password => self.result.password = Some(self.make_component_string()),
            State::Hostname => self.result.hostname = Some(self.make_component_string()),
            State::Port => self.result.port = Some(self.make_component_string()),
            State::Pathname => self.result.pathname = Some(self.make_component_string()),
            State::Search => self.result.search = Some(self.make_component_string()),
            State::Hash => self.result.hash = Some(self.make_component_string()),
        }

        // Skipping over a section implies it was empty; record that so init
        // processing does not backfill it from a base URL. The terminal
        // transition skips every remaining section, so the same inference
        // applies when the scan runs out of input.
        if self.state != State::Init {
            if matches!(
                self.state,
                State::Protocol | State::Authority | State::Username | State::Password
            ) && matches!(
                new_state,
                State::Port | State::Pathname | State::Search | State::Hash | State::Done
            ) && self.result.hostname.is_none()
            {
                self.result.hostname = Some(String::new());
            }

            if matches!(
                self.state,
                State::Protocol
                    | State::Authority
                    | State::Username
                    | State::Password
                    | State::Hostname
                    | State::Port
            ) && matches!(new_state, State::Search | State::Hash | State::Done)
                && self.result.pathname.is_none()
            {
                self.result.pathname = Some(if self.protocol_matches_special_scheme {
                    "/".to_string()
                } else {
                    String::new()
                });
            }

            if matches!(
                self.state,
                State::Protocol
                    | State::Authority
                    | State::Username
                    | State::Password
                    | State::Hostname
                    | State::Port
                    | State::Pathname
            ) && matches!(new_state, State::Hash | State::Done)
                && self.result.search.is_none()
            {
                self.result.search = Some(String::new());
            }
        }

        self.state = new_state;
        self.token_index += skip;
        self.component_start = self.token_index;
        self.token_increment = 0;
    }

    fn make_component_string(&self) -> String {
        let token = &self.token_list[self.token_index];
        let component_start_index = self.get_safe_token(self.component_start).index;
        self.input[component_start_index..token.index]
            .iter()
            .collect()
    }

    fn get_safe_token(&self, index: usize) -> &Token {
        if index < self.token_list.len() {
            &self.token_list[index]
        } else {
            self.token_list
                .last()
                .expect("token list always ends with an end token")
        }
    }

    fn is_non_special_pattern_char(&self, index: usize, value: &str) -> bool {
        let token = self.get_safe_token(index);
        token.value == value
            && matches!(
                token.kind,
                TokenKind::Char | TokenKind::EscapedChar | TokenKind::InvalidChar
            )
    }

    fn is_protocol_suffix(&self) -> bool {
        self.is_non_special_pattern_char(self.token_index, ":")
    }

    fn is_password_prefix(&self) -> bool {
        self.is_non_special_pattern_char(self.token_index, ":")
    }

    fn is_port_prefix(&self) -> bool {
        self.is_non_special_pattern_char(self.token_index, ":")
    }

    fn is_identity_terminator(&self) -> bool {
        self.is_non_special_pattern_char(self.token_index, "@")
    }

    fn is_pathname_start(&self) -> bool {
        self.is_non_special_pattern_char(self.token_index, "/")
    }

    fn is_hash_prefix(&self) -> bool {
        self.is_non_special_pattern_char(self.token_index, "#")
    }

    /// A `?` only opens the search section when it cannot be a modifier,
    /// i.e. when it does not directly follow a matching group.
    fn is_search_prefix(&self) -> bool {
        if self.is_non_special_pattern_char(self.token_index, "?") {
            return true;
        }
        if self.token_list[self.token_index].value != "?" {
            return false;
        }
        if self.token_index == 0 {
            return true;
        }
        let previous_token = self.get_safe_token(self.token_index - 1);
        !matches!(
            previous_token.kind,
            TokenKind::Name | TokenKind::Regexp | TokenKind::Close | TokenKind::Asterisk
        )
    }

    fn is_ipv6_open(&self) -> bool {
        self.is_non_special_pattern_char(self.token_index, "[")
    }

    fn is_ipv6_close(&self) -> bool {
        self.is_non_special_pattern_char(self.token_index, "]")
    }

    fn is_group_open(&self) -> bool {
        self.token_list[self.token_index].kind == TokenKind::Open
    }

    fn is_group_close(&self) -> bool {
        self.token_list[self.token_index].kind == TokenKind::Close
    }

    fn next_is_authority_slashes(&self) -> bool {
        self.is_non_special_pattern_char(self.token_index + 1, "/")
            && self.is_non_special_pattern_char(self.token_index + 2, "/")
    }

    /// Compiles the protocol pattern seen so far and probes it against the
    /// special schemes; the outcome steers authority parsing and the default
    /// pathname.
    fn compute_protocol_matches_special_scheme(&mut self) -> PatternResult<()> {
        let protocol_string = self.make_component_string();
        let protocol_component =
            Component::compile(&protocol_string, canonicalize_protocol, &Options::default())?;
        if protocol_component.protocol_matches_special_scheme() {
            self.protocol_matches_special_scheme = true;
        }
        Ok(())
    }
}
