use hashbrown::HashMap;
use regex::Regex;

use crate::canonicalize::SPECIAL_SCHEMES;
use crate::error::PatternResult;
use crate::pattern::{
    GroupNameList, Options, PartKind, generate_pattern_string,
    generate_regular_expression_and_name_list, parse_pattern_string,
};
use crate::urlpattern::UrlPatternComponentResult;

/// One compiled URL component: the canonical pattern string, the anchored
/// regular expression, and the capture-group names in emission order.
/// `group_name_list[i]` names capture group `i + 1`.
#[derive(Debug)]
pub(crate) struct Component {
    pub pattern_string: String,
    pub regexp: Regex,
    pub group_name_list: GroupNameList,
    pub has_regexp_groups: bool,
}

impl Component {
    pub(crate) fn compile<F>(
        input: &str,
        encoding_callback: F,
        options: &Options,
    ) -> PatternResult<Self>
    where
        F: Fn(&str) -> PatternResult<String>,
    {
        let part_list = parse_pattern_string(input, options, encoding_callback)?;
        let (regexp_string, group_name_list) =
            generate_regular_expression_and_name_list(&part_list, options)?;
        let regexp = Regex::new(&regexp_string)?;
        let pattern_string = generate_pattern_string(&part_list, options);
        let has_regexp_groups = part_list.iter().any(|part| part.kind == PartKind::Regexp);
        Ok(Self {
            pattern_string,
            regexp,
            group_name_list,
            has_regexp_groups,
        })
    }

    /// Whether this component, compiled as a protocol pattern, accepts any of
    /// the special schemes.
    pub(crate) fn protocol_matches_special_scheme(&self) -> bool {
        SPECIAL_SCHEMES
            .iter()
            .any(|scheme| self.regexp.is_match(scheme))
    }

    pub(crate) fn create_match_result(
        &self,
        input: &str,
        captures: &regex::Captures<'_>,
    ) -> UrlPatternComponentResult {
        // A lone empty capture of an empty input carries no information; the
        // groups mapping is left out entirely in that case.
        let single_empty_capture = self.group_name_list.len() == 1
            && input.is_empty()
            && captures
                .get(1)
                .is_none_or(|capture| capture.as_str().is_empty());

        let mut groups = HashMap::new();
        if !single_empty_capture {
            groups.reserve(self.group_name_list.len());
            for (position, name) in self.group_name_list.iter().enumerate() {
                let value = captures
                    .get(position + 1)
                    .map(|capture| capture.as_str())
                    .unwrap_or_default();
                groups.insert(name.clone(), value.to_string());
            }
        }

        UrlPatternComponentResult {
            input: input.to_string(),
            groups,
        }
    }
}
