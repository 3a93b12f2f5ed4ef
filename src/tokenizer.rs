//! Splits a pattern string into tokens.
//!
//! The tokenizer works one code point at a time with lookahead for names and
//! embedded regular expressions. Under the lenient policy invalid constructs
//! are reified as [`TokenKind::InvalidChar`] tokens instead of failing, which
//! lets the constructor-string parser scan arbitrary URL-shaped input.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::{PatternError, PatternResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TokenKind {
    Open,
    Close,
    Regexp,
    Name,
    Char,
    EscapedChar,
    OtherModifier,
    Asterisk,
    End,
    InvalidChar,
}

impl TokenKind {
    pub(crate) fn label(self) -> &'static str {
        match self {
            TokenKind::Open => "open",
            TokenKind::Close => "close",
            TokenKind::Regexp => "regexp",
            TokenKind::Name => "name",
            TokenKind::Char => "char",
            TokenKind::EscapedChar => "escaped char",
            TokenKind::OtherModifier => "modifier",
            TokenKind::Asterisk => "asterisk",
            TokenKind::End => "end",
            TokenKind::InvalidChar => "invalid char",
        }
    }
}

/// A single token. `index` is the code-point offset in the input at which the
/// token began; the constructor-string parser slices component strings out of
/// the input between token indices.
#[derive(Debug, Clone)]
pub(crate) struct Token {
    pub kind: TokenKind,
    pub index: usize,
    pub value: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TokenizePolicy {
    Strict,
    Lenient,
}

struct Tokenizer {
    chars: Vec<char>,
    policy: TokenizePolicy,
    token_list: Vec<Token>,
    index: usize,
}

pub(crate) fn tokenize(input: &str, policy: TokenizePolicy) -> PatternResult<Vec<Token>> {
    let mut tokenizer = Tokenizer {
        chars: input.chars().collect(),
        policy,
        token_list: Vec::with_capacity(input.len() + 1),
        index: 0,
    };
    let len = tokenizer.chars.len();

    while tokenizer.index < len {
        match tokenizer.chars[tokenizer.index] {
            '*' => tokenizer.add_single(TokenKind::Asterisk),
            '+' | '?' => tokenizer.add_single(TokenKind::OtherModifier),
            '\\' => {
                if tokenizer.index == len - 1 {
                    tokenizer.tokenizing_error(tokenizer.index + 1, tokenizer.index)?;
                } else {
                    // Token value is the escaped code point alone.
                    tokenizer.add_token(TokenKind::EscapedChar, tokenizer.index + 2, tokenizer.index + 1, 1);
                }
            }
            '{' => tokenizer.add_single(TokenKind::Open),
            '}' => tokenizer.add_single(TokenKind::Close),
            ':' => tokenizer.scan_name()?,
            '(' => tokenizer.scan_regexp()?,
            _ => tokenizer.add_single(TokenKind::Char),
        }
    }

    tokenizer.token_list.push(Token {
        kind: TokenKind::End,
        index: len,
        value: String::new(),
    });

    Ok(tokenizer.token_list)
}

impl Tokenizer {
    /// Appends a token starting at the current cursor whose value is
    /// `value_length` code points beginning at `value_position`, then moves
    /// the cursor to `next_position`.
    fn add_token(
        &mut self,
        kind: TokenKind,
        next_position: usize,
        value_position: usize,
        value_length: usize,
    ) {
        let value = self.chars[value_position..value_position + value_length]
            .iter()
            .collect();
        self.token_list.push(Token {
            kind,
            index: self.index,
            value,
        });
        self.index = next_position;
    }

    fn add_single(&mut self, kind: TokenKind) {
        self.add_token(kind, self.index + 1, self.index, 1);
    }

    fn tokenizing_error(
        &mut self,
        next_position: usize,
        value_position: usize,
    ) -> PatternResult<()> {
        if self.policy == TokenizePolicy::Strict {
            return Err(PatternError::Tokenize {
                index: value_position,
            });
        }
        self.add_token(
            TokenKind::InvalidChar,
            next_position,
            value_position,
            next_position - value_position,
        );
        Ok(())
    }

    fn scan_name(&mut self) -> PatternResult<()> {
        let name_start = self.index + 1;
        let mut position = name_start;
        while position < self.chars.len() {
            if !is_valid_name_code_point(self.chars[position], position == name_start) {
                break;
            }
            position += 1;
        }
        if position <= name_start {
            return self.tokenizing_error(name_start, self.index);
        }
        self.add_token(TokenKind::Name, position, name_start, position - name_start);
        Ok(())
    }

    fn scan_regexp(&mut self) -> PatternResult<()> {
        let len = self.chars.len();
        let regexp_start = self.index + 1;
        let mut position = regexp_start;
        let mut depth = 1usize;

        while position < len {
            let code_point = self.chars[position];
            if !code_point.is_ascii() || (position == regexp_start && code_point == '?') {
                return self.tokenizing_error(regexp_start, self.index);
            }
            match code_point {
                '\\' => {
                    if position == len - 1 || !self.chars[position + 1].is_ascii() {
                        return self.tokenizing_error(regexp_start, self.index);
                    }
                    position += 2;
                    continue;
                }
                ')' => {
                    depth -= 1;
                    if depth == 0 {
                        position += 1;
                        break;
                    }
                }
                '(' => {
                    depth += 1;
                    // A nested group is only allowed in its non-capturing form.
                    if position == len - 1 || self.chars[position + 1] != '?' {
                        return self.tokenizing_error(regexp_start, self.index);
                    }
                }
                _ => {}
            }
            position += 1;
        }

        if depth != 0 {
            return self.tokenizing_error(regexp_start, self.index);
        }
        let regexp_length = position - regexp_start - 1;
        if regexp_length == 0 {
            return self.tokenizing_error(regexp_start, self.index);
        }
        self.add_token(TokenKind::Regexp, position, regexp_start, regexp_length);
        Ok(())
    }
}

static NAME_START_CODE_POINT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\A\p{ID_Start}\z").expect("name start class should compile"));
static NAME_CONTINUE_CODE_POINT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\A\p{ID_Continue}\z").expect("name continue class should compile"));

/// Whether `code_point` may appear in a group name: `ID_Start` for the first
/// code point, `ID_Continue` afterwards.
pub(crate) fn is_valid_name_code_point(code_point: char, first: bool) -> bool {
    let mut buffer = [0u8; 4];
    let encoded = &*code_point.encode_utf8(&mut buffer);
    if first {
        NAME_START_CODE_POINT.is_match(encoded)
    } else {
        NAME_CONTINUE_CODE_POINT.is_match(encoded)
    }
}
