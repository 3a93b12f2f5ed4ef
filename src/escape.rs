//! Escaping of literal text for embedding in regular expressions and in
//! canonical pattern strings.

/// Backslash-escapes the regexp metacharacters `\ . + * ? ( ) | [ ] { } ^ $ /`.
pub(crate) fn escape_regexp_string(input: &str) -> String {
    let mut result = String::with_capacity(input.len());
    for code_point in input.chars() {
        if matches!(
            code_point,
            '\\' | '.'
                | '+'
                | '*'
                | '?'
                | '('
                | ')'
                | '|'
                | '['
                | ']'
                | '{'
                | '}'
                | '^'
                | '$'
                | '/'
        ) {
            result.push('\\');
        }
        result.push(code_point);
    }
    result
}

/// Backslash-escapes the pattern metacharacters `\ + * ? ( ) { } :`.
pub(crate) fn escape_pattern_string(input: &str) -> String {
    let mut result = String::with_capacity(input.len());
    for code_point in input.chars() {
        if matches!(
            code_point,
            '\\' | '+' | '*' | '?' | '(' | ')' | '{' | '}' | ':'
        ) {
            result.push('\\');
        }
        result.push(code_point);
    }
    result
}
