//! Parses a tokenized pattern string into a part list.

use crate::error::{PatternError, PatternResult};
use crate::pattern::parts::{FULL_WILDCARD_REGEXP_VALUE, Options, Part, PartKind, PartModifier};
use crate::tokenizer::{Token, TokenKind, TokenizePolicy, tokenize};

/// Parses `input` into a part list. Literal text, prefixes and suffixes are
/// passed through `encoding_callback` before being stored, so each component
/// canonicalizes its fixed text while parsing.
#[tracing::instrument(level = "trace", skip(options, encoding_callback), fields(input = %input))]
pub(crate) fn parse_pattern_string<F>(
    input: &str,
    options: &Options,
    encoding_callback: F,
) -> PatternResult<Vec<Part>>
where
    F: Fn(&str) -> PatternResult<String>,
{
    let token_list = tokenize(input, TokenizePolicy::Strict)?;

    let mut parser = PatternParser {
        token_list,
        encoding_callback,
        segment_wildcard_regexp: options.segment_wildcard_regexp(),
        part_list: Vec::new(),
        pending_fixed_value: String::new(),
        index: 0,
        next_numeric_name: 0,
    };

    while parser.index < parser.token_list.len() {
        let char_token = parser.try_consume(TokenKind::Char);
        let name_token = parser.try_consume(TokenKind::Name);
        let regexp_or_wildcard_token = parser.try_consume_regexp_or_wildcard(name_token.is_some());

        if name_token.is_some() || regexp_or_wildcard_token.is_some() {
            let mut prefix = char_token.map(|token| token.value).unwrap_or_default();
            if !prefix.is_empty() && !options.is_prefix_code_point(&prefix) {
                parser.pending_fixed_value.push_str(&prefix);
                prefix.clear();
            }
            parser.maybe_add_part_from_pending_fixed_value()?;
            let modifier_token = parser.try_consume_modifier();
            parser.add_part(&prefix, name_token, regexp_or_wildcard_token, "", modifier_token)?;
            continue;
        }

        let fixed_token = char_token.or_else(|| parser.try_consume(TokenKind::EscapedChar));
        if let Some(token) = fixed_token {
            parser.pending_fixed_value.push_str(&token.value);
            continue;
        }

        if parser.try_consume(TokenKind::Open).is_some() {
            let prefix = parser.consume_text();
            let name_token = parser.try_consume(TokenKind::Name);
            let regexp_or_wildcard_token =
                parser.try_consume_regexp_or_wildcard(name_token.is_some());
            let suffix = parser.consume_text();
            parser.consume_required(TokenKind::Close)?;
            let modifier_token = parser.try_consume_modifier();
            parser.add_part(
                &prefix,
                name_token,
                regexp_or_wildcard_token,
                &suffix,
                modifier_token,
            )?;
            continue;
        }

        parser.maybe_add_part_from_pending_fixed_value()?;
        parser.consume_required(TokenKind::End)?;
    }

    Ok(parser.part_list)
}

struct PatternParser<F> {
    token_list: Vec<Token>,
    encoding_callback: F,
    segment_wildcard_regexp: String,
    part_list: Vec<Part>,
    pending_fixed_value: String,
    index: usize,
    next_numeric_name: u32,
}

impl<F> PatternParser<F>
where
    F: Fn(&str) -> PatternResult<String>,
{
    fn try_consume(&mut self, kind: TokenKind) -> Option<Token> {
        debug_assert!(self.index < self.token_list.len());
        let next_token = &self.token_list[self.index];
        if next_token.kind != kind {
            return None;
        }
        let token = next_token.clone();
        self.index += 1;
        Some(token)
    }

    /// A regexp token, or an asterisk acting as a full wildcard. When a name
    /// was just consumed an asterisk is left alone so it can serve as that
    /// group's modifier instead.
    fn try_consume_regexp_or_wildcard(&mut self, has_name: bool) -> Option<Token> {
        let token = self.try_consume(TokenKind::Regexp);
        if token.is_none() && !has_name {
            return self.try_consume(TokenKind::Asterisk);
        }
        token
    }

    fn try_consume_modifier(&mut self) -> Option<Token> {
        self.try_consume(TokenKind::OtherModifier)
            .or_else(|| self.try_consume(TokenKind::Asterisk))
    }

    fn consume_text(&mut self) -> String {
        let mut result = String::new();
        loop {
            let token = self
                .try_consume(TokenKind::Char)
                .or_else(|| self.try_consume(TokenKind::EscapedChar));
            match token {
                Some(token) => result.push_str(&token.value),
                None => break,
            }
        }
        result
    }

    fn consume_required(&mut self, kind: TokenKind) -> PatternResult<Token> {
        let index = self.token_list[self.index].index;
        self.try_consume(kind).ok_or(PatternError::RequiredToken {
            expected: kind.label(),
            index,
        })
    }

    fn maybe_add_part_from_pending_fixed_value(&mut self) -> PatternResult<()> {
        if self.pending_fixed_value.is_empty() {
            return Ok(());
        }
        let encoded_value = (self.encoding_callback)(&self.pending_fixed_value)?;
        self.pending_fixed_value.clear();
        self.part_list
            .push(Part::fixed(encoded_value, PartModifier::None));
        Ok(())
    }

    fn add_part(
        &mut self,
        prefix: &str,
        name_token: Option<Token>,
        regexp_or_wildcard_token: Option<Token>,
        suffix: &str,
        modifier_token: Option<Token>,
    ) -> PatternResult<()> {
        let modifier = modifier_token
            .map(|token| PartModifier::from_token_value(&token.value))
            .unwrap_or_default();

        if name_token.is_none()
            && regexp_or_wildcard_token.is_none()
            && modifier == PartModifier::None
        {
            self.pending_fixed_value.push_str(prefix);
            return Ok(());
        }

        self.maybe_add_part_from_pending_fixed_value()?;

        if name_token.is_none() && regexp_or_wildcard_token.is_none() {
            // The grammar cannot produce a suffix without a matching group.
            debug_assert!(suffix.is_empty());
            if prefix.is_empty() {
                return Ok(());
            }
            let encoded_value = (self.encoding_callback)(prefix)?;
            self.part_list.push(Part::fixed(encoded_value, modifier));
            return Ok(());
        }

        let mut regexp_value = match &regexp_or_wildcard_token {
            None => self.segment_wildcard_regexp.clone(),
            Some(token) if token.kind == TokenKind::Asterisk => {
                FULL_WILDCARD_REGEXP_VALUE.to_string()
            }
            Some(token) => token.value.clone(),
        };

        let mut kind = PartKind::Regexp;
        if regexp_value == self.segment_wildcard_regexp {
            kind = PartKind::SegmentWildcard;
            regexp_value.clear();
        } else if regexp_value == FULL_WILDCARD_REGEXP_VALUE {
            kind = PartKind::FullWildcard;
            regexp_value.clear();
        }

        let name = match &name_token {
            Some(token) => token.value.clone(),
            None => {
                let name = self.next_numeric_name.to_string();
                self.next_numeric_name += 1;
                name
            }
        };

        if self.is_duplicate_name(&name) {
            return Err(PatternError::DuplicateName { name });
        }

        let encoded_prefix = (self.encoding_callback)(prefix)?;
        let encoded_suffix = (self.encoding_callback)(suffix)?;

        self.part_list.push(Part {
            kind,
            value: regexp_value,
            modifier,
            name,
            prefix: encoded_prefix,
            suffix: encoded_suffix,
        });
        Ok(())
    }

    fn is_duplicate_name(&self, name: &str) -> bool {
        self.part_list.iter().any(|part| part.name == name)
    }
}
