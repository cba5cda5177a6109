use crate::Rule;

/// The result of parsing a rule DSL input string.
#[derive(Debug)]
pub struct ParsedRules {
    pub attributes: Vec<String>,
    pub rules: Vec<Rule>,
}
