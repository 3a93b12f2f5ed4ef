//! Turns a part list into an anchored regexp source with its capture-group
//! name list, and back into a canonical pattern string.

use smallvec::SmallVec;

use crate::error::{PatternError, PatternResult};
use crate::escape::{escape_pattern_string, escape_regexp_string};
use crate::pattern::parts::{FULL_WILDCARD_REGEXP_VALUE, Options, Part, PartKind, PartModifier};
use crate::tokenizer::is_valid_name_code_point;

pub(crate) type GroupNameList = SmallVec<[String; 4]>;

pub(crate) fn generate_regular_expression_and_name_list(
    part_list: &[Part],
    options: &Options,
) -> PatternResult<(String, GroupNameList)> {
    let segment_wildcard_regexp = options.segment_wildcard_regexp();
    let mut result = String::new();
    let mut name_list = GroupNameList::new();

    if options.ignore_case {
        result.push_str("(?i)");
    }
    result.push_str(r"\A(?:");

    for part in part_list {
        if part.kind == PartKind::FixedText {
            if part.modifier == PartModifier::None {
                result.push_str(&escape_regexp_string(&part.value));
            } else {
                result.push_str("(?:");
                result.push_str(&escape_regexp_string(&part.value));
                result.push(')');
                if let Some(symbol) = part.modifier.symbol() {
                    result.push(symbol);
                }
            }
            continue;
        }

        if part.name.is_empty() {
            return Err(PatternError::UnexpectedEmptyString);
        }
        name_list.push(part.name.clone());

        let regexp_value = match part.kind {
            PartKind::SegmentWildcard => segment_wildcard_regexp.as_str(),
            PartKind::FullWildcard => FULL_WILDCARD_REGEXP_VALUE,
            _ => part.value.as_str(),
        };

        if part.prefix.is_empty() && part.suffix.is_empty() {
            match part.modifier {
                PartModifier::None | PartModifier::Optional => {
                    result.push('(');
                    result.push_str(regexp_value);
                    result.push(')');
                    if let Some(symbol) = part.modifier.symbol() {
                        result.push(symbol);
                    }
                }
                _ => {
                    result.push_str("((?:");
                    result.push_str(regexp_value);
                    result.push(')');
                    if let Some(symbol) = part.modifier.symbol() {
                        result.push(symbol);
                    }
                    result.push(')');
                }
            }
            continue;
        }

        if matches!(part.modifier, PartModifier::None | PartModifier::Optional) {
            result.push_str("(?:");
            result.push_str(&escape_regexp_string(&part.prefix));
            result.push('(');
            result.push_str(regexp_value);
            result.push(')');
            result.push_str(&escape_regexp_string(&part.suffix));
            result.push(')');
            if let Some(symbol) = part.modifier.symbol() {
                result.push(symbol);
            }
            continue;
        }

        // Repetition with a prefix or suffix: the separator text sits between
        // repeated occurrences rather than around the whole run.
        debug_assert!(part.modifier.is_repeating());
        debug_assert!(!part.prefix.is_empty() || !part.suffix.is_empty());
        result.push_str("(?:");
        result.push_str(&escape_regexp_string(&part.prefix));
        result.push_str("((?:");
        result.push_str(regexp_value);
        result.push_str(")(?:");
        result.push_str(&escape_regexp_string(&part.suffix));
        result.push_str(&escape_regexp_string(&part.prefix));
        result.push_str("(?:");
        result.push_str(regexp_value);
        result.push_str("))*)");
        result.push_str(&escape_regexp_string(&part.suffix));
        result.push(')');
        if part.modifier == PartModifier::ZeroOrMore {
            result.push('?');
        }
    }

    result.push_str(r")\z");
    Ok((result, name_list))
}

/// Reserializes a part list such that parsing the output again yields an
/// equivalent part list.
pub(crate) fn generate_pattern_string(part_list: &[Part], options: &Options) -> String {
    let mut result = String::new();

    for (index, part) in part_list.iter().enumerate() {
        let previous_part = if index > 0 {
            Some(&part_list[index - 1])
        } else {
            None
        };
        let next_part = part_list.get(index + 1);

        if part.kind == PartKind::FixedText {
            if part.modifier == PartModifier::None {
                result.push_str(&escape_pattern_string(&part.value));
                continue;
            }
            result.push('{');
            result.push_str(&escape_pattern_string(&part.value));
            result.push('}');
            if let Some(symbol) = part.modifier.symbol() {
                result.push(symbol);
            }
            continue;
        }

        debug_assert!(!part.name.is_empty());
        let custom_name = !part
            .name
            .chars()
            .next()
            .is_some_and(|code_point| code_point.is_ascii_digit());

        let mut needs_grouping = !part.suffix.is_empty()
            || (!part.prefix.is_empty() && !options.is_prefix_code_point(&part.prefix));

        // A plain named group is ambiguous when the following part would
        // extend the name or read as a second anonymous group.
        if !needs_grouping
            && custom_name
            && part.kind == PartKind::SegmentWildcard
            && part.modifier == PartModifier::None
            && let Some(next) = next_part
            && next.prefix.is_empty()
            && next.suffix.is_empty()
        {
            if next.kind == PartKind::FixedText {
                needs_grouping = next
                    .value
                    .chars()
                    .next()
                    .is_some_and(|code_point| is_valid_name_code_point(code_point, false));
            } else {
                needs_grouping = next
                    .name
                    .chars()
                    .next()
                    .is_some_and(|code_point| code_point.is_ascii_digit());
            }
        }

        if !needs_grouping
            && part.prefix.is_empty()
            && let Some(previous) = previous_part
            && previous.kind == PartKind::FixedText
            && previous.value.chars().last() == Some(options.prefix_code_point)
        {
            needs_grouping = true;
        }

        if needs_grouping {
            result.push('{');
        }
        result.push_str(&escape_pattern_string(&part.prefix));
        if custom_name {
            result.push(':');
            result.push_str(&part.name);
        }

        match part.kind {
            PartKind::FixedText => unreachable!("fixed text is emitted above"),
            PartKind::Regexp => {
                result.push('(');
                result.push_str(&part.value);
                result.push(')');
            }
            PartKind::SegmentWildcard => {
                if !custom_name {
                    result.push('(');
                    result.push_str(&options.segment_wildcard_regexp());
                    result.push(')');
                }
            }
            PartKind::FullWildcard => {
                if !custom_name
                    && previous_part.is_none_or(|previous| {
                        previous.kind == PartKind::FixedText
                            || previous.modifier != PartModifier::None
                            || needs_grouping
                            || !part.prefix.is_empty()
                    })
                {
                    result.push('*');
                } else {
                    result.push('(');
                    result.push_str(FULL_WILDCARD_REGEXP_VALUE);
                    result.push(')');
                }
            }
        }

        // Keep the name boundary unambiguous when the suffix starts with a
        // name code point.
        if part.kind == PartKind::SegmentWildcard
            && custom_name
            && let Some(first) = part.suffix.chars().next()
            && is_valid_name_code_point(first, false)
        {
            result.push('\\');
        }

        result.push_str(&escape_pattern_string(&part.suffix));
        if needs_grouping {
            result.push('}');
        }
        if let Some(symbol) = part.modifier.symbol() {
            result.push(symbol);
        }
    }

    result
}
