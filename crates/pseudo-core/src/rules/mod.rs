/*!
# Conversion Rules

Text-rewriting rules used by the pattern strategy. A rule pairs a regex
pattern (one alternative per notation, all with the same capture layout)
with a replacement, and is applied over the whole source text.

Rules are immutable once built; the built-in set lives in a process-wide
[`RuleCatalog`].
*/

use std::fmt;

use regex::{Captures, Regex};
use serde::Serialize;

pub mod catalog;

pub use catalog::RuleCatalog;

/// Rule classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleCategory {
    VariableDeclaration,
    Assignment,
    ControlStructure,
    FunctionDefinition,
    Operator,
    Expression,
    Statement,
}

impl fmt::Display for RuleCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RuleCategory::VariableDeclaration => "variable_declaration",
            RuleCategory::Assignment => "assignment",
            RuleCategory::ControlStructure => "control_structure",
            RuleCategory::FunctionDefinition => "function_definition",
            RuleCategory::Operator => "operator",
            RuleCategory::Expression => "expression",
            RuleCategory::Statement => "statement",
        };
        f.pad(name)
    }
}

/// How matched text is rewritten
#[derive(Clone, Copy)]
pub enum Replacement {
    /// Literal template; `${n}` refers to capture group `n`
    Template(&'static str),
    /// Computed from the captures of each match
    Function(fn(&Captures<'_>) -> String),
}

impl fmt::Debug for Replacement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Replacement::Template(template) => f.debug_tuple("Template").field(template).finish(),
            Replacement::Function(_) => f.write_str("Function(..)"),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RuleExample {
    pub input: &'static str,
    pub output: &'static str,
    pub description: &'static str,
}

/// A single prioritized rewrite rule
#[derive(Debug, Clone)]
pub struct Rule {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub patterns: Vec<Regex>,
    pub replacement: Replacement,
    /// Higher priority runs first
    pub priority: i32,
    pub category: RuleCategory,
    pub enabled: bool,
    pub examples: Vec<RuleExample>,
}

impl Rule {
    pub fn new(
        id: &'static str,
        name: &'static str,
        description: &'static str,
        category: RuleCategory,
        priority: i32,
        replacement: Replacement,
    ) -> Self {
        Self {
            id,
            name,
            description,
            patterns: Vec::new(),
            replacement,
            priority,
            category,
            enabled: true,
            examples: Vec::new(),
        }
    }

    /// Add a pattern alternative
    pub fn with_pattern(mut self, pattern: Regex) -> Self {
        self.patterns.push(pattern);
        self
    }

    pub fn with_example(
        mut self,
        input: &'static str,
        output: &'static str,
        description: &'static str,
    ) -> Self {
        self.examples.push(RuleExample {
            input,
            output,
            description,
        });
        self
    }

    /// Check if any alternative matches `text`
    pub fn matches(&self, text: &str) -> bool {
        self.patterns.iter().any(|pattern| pattern.is_match(text))
    }

    /// Rewrite every match of every alternative, in order
    pub fn apply(&self, text: &str) -> String {
        let mut current = text.to_string();
        for pattern in &self.patterns {
            let rewritten = match self.replacement {
                Replacement::Template(template) => pattern.replace_all(&current, template),
                Replacement::Function(function) => {
                    pattern.replace_all(&current, |caps: &Captures<'_>| function(caps))
                }
            };
            current = rewritten.into_owned();
        }
        current
    }
}

/// Serializable view of a rule for listings
#[derive(Debug, Clone, Serialize)]
pub struct RuleSummary {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub priority: i32,
    pub category: RuleCategory,
    pub enabled: bool,
    pub examples: Vec<RuleExample>,
}

impl From<&Rule> for RuleSummary {
    fn from(rule: &Rule) -> Self {
        Self {
            id: rule.id,
            name: rule.name,
            description: rule.description,
            priority: rule.priority,
            category: rule.category,
            enabled: rule.enabled,
            examples: rule.examples.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upper(caps: &Captures<'_>) -> String {
        caps[1].to_uppercase()
    }

    #[test]
    fn test_template_substitutes_groups() {
        let rule = Rule::new(
            "swap",
            "Swap",
            "Swap two words",
            RuleCategory::Expression,
            10,
            Replacement::Template("${2} ${1}"),
        )
        .with_pattern(Regex::new(r"(\w+) (\w+)").unwrap());

        assert_eq!(rule.apply("hello world"), "world hello");
    }

    #[test]
    fn test_function_receives_captures() {
        let rule = Rule::new(
            "upper",
            "Upper",
            "Upper-case marked words",
            RuleCategory::Expression,
            10,
            Replacement::Function(upper),
        )
        .with_pattern(Regex::new(r"!(\w+)").unwrap());

        assert_eq!(rule.apply("a !b c !d"), "a B c D");
    }

    #[test]
    fn test_unmatched_rule_is_noop() {
        let rule = Rule::new(
            "noop",
            "Noop",
            "Matches nothing here",
            RuleCategory::Operator,
            1,
            Replacement::Template("!="),
        )
        .with_pattern(Regex::new("≠").unwrap());

        assert!(!rule.matches("x == y"));
        assert_eq!(rule.apply("x == y"), "x == y");
    }

    #[test]
    fn test_alternatives_share_capture_layout() {
        let rule = Rule::new(
            "ret",
            "Return",
            "Return either spelling",
            RuleCategory::Statement,
            1,
            Replacement::Template("return ${1}"),
        )
        .with_pattern(Regex::new(r"戻り値\s+(.+)").unwrap())
        .with_pattern(Regex::new(r"\bgive\s+(.+)").unwrap());

        assert_eq!(rule.apply("戻り値 x\ngive y"), "return x\nreturn y");
    }
}
