use crate::escape::escape_regexp_string;

/// Regexp source matching any sequence of code points.
pub(crate) const FULL_WILDCARD_REGEXP_VALUE: &str = ".*";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PartKind {
    /// A run of literal text.
    FixedText,
    /// A matching group with a custom regular expression.
    Regexp,
    /// A matching group that matches code points up to the next delimiter.
    /// This is what a named group like `:foo` without a custom regular
    /// expression compiles to.
    SegmentWildcard,
    /// A matching group that greedily matches all code points, i.e. `*`.
    FullWildcard,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) enum PartModifier {
    #[default]
    None,
    /// `?`
    Optional,
    /// `*`
    ZeroOrMore,
    /// `+`
    OneOrMore,
}

impl PartModifier {
    pub(crate) fn from_token_value(value: &str) -> Self {
        match value {
            "?" => PartModifier::Optional,
            "*" => PartModifier::ZeroOrMore,
            "+" => PartModifier::OneOrMore,
            _ => PartModifier::None,
        }
    }

    pub(crate) fn symbol(self) -> Option<char> {
        match self {
            PartModifier::None => None,
            PartModifier::Optional => Some('?'),
            PartModifier::ZeroOrMore => Some('*'),
            PartModifier::OneOrMore => Some('+'),
        }
    }

    pub(crate) fn is_repeating(self) -> bool {
        matches!(self, PartModifier::ZeroOrMore | PartModifier::OneOrMore)
    }
}

/// One element of a parsed pattern. Fixed text carries empty
/// `name`/`prefix`/`suffix`; every other kind carries a unique non-empty
/// name, either user supplied or a decimal counter value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Part {
    pub kind: PartKind,
    pub value: String,
    pub modifier: PartModifier,
    pub name: String,
    pub prefix: String,
    pub suffix: String,
}

impl Part {
    pub(crate) fn fixed(value: String, modifier: PartModifier) -> Self {
        Self {
            kind: PartKind::FixedText,
            value,
            modifier,
            name: String::new(),
            prefix: String::new(),
            suffix: String::new(),
        }
    }
}

/// Per-component compilation options. The delimiter and prefix code points
/// use `'\0'` to mean "none"; only the hostname and pathname components set
/// them.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Options {
    pub delimiter_code_point: char,
    pub prefix_code_point: char,
    pub ignore_case: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            delimiter_code_point: '\0',
            prefix_code_point: '\0',
            ignore_case: false,
        }
    }
}

impl Options {
    pub(crate) fn hostname() -> Self {
        Self {
            delimiter_code_point: '.',
            ..Self::default()
        }
    }

    pub(crate) fn pathname(ignore_case: bool) -> Self {
        Self {
            delimiter_code_point: '/',
            prefix_code_point: '/',
            ignore_case,
        }
    }

    pub(crate) fn with_ignore_case(ignore_case: bool) -> Self {
        Self {
            ignore_case,
            ..Self::default()
        }
    }

    /// The regexp source a plain named group expands to: code points up to
    /// the delimiter, lazily.
    pub(crate) fn segment_wildcard_regexp(&self) -> String {
        format!(
            "[^{}]+?",
            escape_regexp_string(&self.delimiter_code_point.to_string())
        )
    }

    pub(crate) fn is_prefix_code_point(&self, value: &str) -> bool {
        let mut chars = value.chars();
        chars.next() == Some(self.prefix_code_point) && chars.next().is_none()
    }
}
