use thiserror::Error;

pub type PatternResult<T> = Result<T, PatternError>;

#[derive(Debug, Error)]
pub enum PatternError {
    #[error("pattern contains an invalid token at offset {index}")]
    Tokenize { index: usize },
    #[error("group name '{name}' is used more than once")]
    DuplicateName { name: String },
    #[error("expected {expected} token at offset {index}")]
    RequiredToken {
        expected: &'static str,
        index: usize,
    },
    #[error("a relative pattern requires a base URL")]
    NoBaseUrl,
    #[error("matching group has an empty name")]
    UnexpectedEmptyString,
    #[error("'{value}' is not a valid IPv6 hostname pattern")]
    InvalidIpv6Hostname { value: String },
    #[error("'{value}' is not a valid port")]
    InvalidPort { value: String },
    #[error(transparent)]
    Url(#[from] url::ParseError),
    #[error(transparent)]
    Regex(#[from] regex::Error),
}
