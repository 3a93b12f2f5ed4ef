mod codegen;
mod parser;
mod parts;

pub(crate) use codegen::{
    GroupNameList, generate_pattern_string, generate_regular_expression_and_name_list,
};
pub(crate) use parser::parse_pattern_string;
pub(crate) use parts::{Options, PartKind};
