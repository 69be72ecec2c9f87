/*!
# Rule Catalog

The built-in conversion rules and the queries over them. The catalog is
built once, on first use, and never changes afterwards.
*/

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use super::{Replacement, Rule, RuleCategory};
use crate::generator::adjust_range_end;

static CATALOG: Lazy<RuleCatalog> = Lazy::new(RuleCatalog::builtin);

static TYPED_PARAM: Lazy<Regex> = Lazy::new(|| regex(r"^[^:：]+[:：]\s*(\w+)"));
static BARE_PARAM: Lazy<Regex> = Lazy::new(|| regex(r"(\w+)"));

fn regex(pattern: &str) -> Regex {
    Regex::new(pattern).expect("built-in rule pattern must compile")
}

/// Ordered collection of conversion rules
#[derive(Debug, Clone)]
pub struct RuleCatalog {
    rules: Vec<Rule>,
}

impl RuleCatalog {
    /// The process-wide built-in catalog
    pub fn global() -> &'static RuleCatalog {
        &CATALOG
    }

    /// Build a catalog from explicit rules, keeping their order
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    /// Every rule, in catalog order
    pub fn all(&self) -> &[Rule] {
        &self.rules
    }

    /// Enabled rules, in catalog order
    pub fn enabled(&self) -> Vec<&Rule> {
        self.rules.iter().filter(|rule| rule.enabled).collect()
    }

    /// Enabled rules of one category, in catalog order
    pub fn by_category(&self, category: RuleCategory) -> Vec<&Rule> {
        self.rules
            .iter()
            .filter(|rule| rule.enabled && rule.category == category)
            .collect()
    }

    pub fn by_id(&self, id: &str) -> Option<&Rule> {
        self.rules.iter().find(|rule| rule.id == id)
    }

    /// Sort rules by priority (higher priority first); equal priorities keep
    /// their relative order
    pub fn sort_by_priority<'a>(rules: &[&'a Rule]) -> Vec<&'a Rule> {
        let mut sorted = rules.to_vec();
        sorted.sort_by_key(|rule| std::cmp::Reverse(rule.priority));
        sorted
    }

    /// Enabled rules in application order
    pub fn ordered(&self) -> Vec<&Rule> {
        Self::sort_by_priority(&self.enabled())
    }

    /// Apply a single rule to `text`
    pub fn apply_one(rule: &Rule, text: &str) -> String {
        rule.apply(text)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    fn builtin() -> Self {
        Self::new(vec![
            // Declarations
            Rule::new(
                "var_integer",
                "Integer declaration",
                "Turn an integer declaration into a zero-initialized variable",
                RuleCategory::VariableDeclaration,
                100,
                Replacement::Template("${1}${2} = 0"),
            )
            .with_pattern(regex(r"(?m)^([ \t]*)整数型[：:]\s*(\w+)"))
            .with_pattern(regex(r"(?m)^([ \t]*)integer\s*[：:]\s*(\w+)"))
            .with_example("整数型：count", "count = 0", "Integer variable"),
            Rule::new(
                "var_string",
                "String declaration",
                "Turn a string declaration into an empty-string variable",
                RuleCategory::VariableDeclaration,
                100,
                Replacement::Template("${1}${2} = \"\""),
            )
            .with_pattern(regex(r"(?m)^([ \t]*)文字列型[：:]\s*(\w+)"))
            .with_pattern(regex(r"(?m)^([ \t]*)string\s*[：:]\s*(\w+)"))
            .with_example("文字列型：name", "name = \"\"", "String variable"),
            Rule::new(
                "var_multiple_integers",
                "Integer list declaration",
                "Turn a comma-separated integer declaration into one variable per name",
                RuleCategory::VariableDeclaration,
                105,
                Replacement::Function(expand_integer_list),
            )
            .with_pattern(regex(r"(?m)^([ \t]*)整数[：:]([^,\n]+(?:,[^,\n]+)*)"))
            .with_pattern(regex(r"(?m)^([ \t]*)integer\s*[：:]([^,\n]+(?:,[^,\n]+)*)"))
            .with_example(
                "整数:i, j, temp",
                "i = 0\nj = 0\ntemp = 0",
                "Several integer variables",
            ),
            Rule::new(
                "array_declaration",
                "Array declaration",
                "Turn a sized array declaration into a zero-filled list",
                RuleCategory::VariableDeclaration,
                95,
                Replacement::Template("${1}${2} = [0] * ${3}"),
            )
            .with_pattern(regex(r"(?m)^([ \t]*)配列[：:]\s*(\w+)\((\d+)\)"))
            .with_pattern(regex(r"(?m)^([ \t]*)array\s*[：:]\s*(\w+)\((\d+)\)"))
            .with_example("配列：numbers(10)", "numbers = [0] * 10", "Ten-element array"),
            Rule::new(
                "array_declaration_with_type",
                "Typed array declaration",
                "Turn an array declaration with element type into a zero-filled list",
                RuleCategory::VariableDeclaration,
                96,
                Replacement::Template("${1}${2} = [0] * ${3}"),
            )
            .with_pattern(regex(r"(?m)^([ \t]*)配列[：:]\s*(\w+)\([^)\n]*?,\s*(\d+)\)"))
            .with_pattern(regex(r"(?m)^([ \t]*)array\s*[：:]\s*(\w+)\([^)\n]*?,\s*(\d+)\)"))
            .with_example("配列：B(整数型, 5)", "B = [0] * 5", "Typed five-element array"),
            // Assignment
            Rule::new(
                "assignment",
                "Assignment",
                "Replace the assignment arrow",
                RuleCategory::Assignment,
                90,
                Replacement::Template("${1} = ${2}"),
            )
            .with_pattern(regex(r"(\w+(?:\[.*?\])?)\s*←\s*(.+)"))
            .with_example("x ← 10", "x = 10", "Simple assignment")
            .with_example("array[i] ← value", "array[i] = value", "Element assignment"),
            // Control structures
            Rule::new(
                "if_statement",
                "If statement",
                "Turn a conditional header into an if block",
                RuleCategory::ControlStructure,
                85,
                Replacement::Template("if ${1}:"),
            )
            .with_pattern(regex(r"もし\s+(.+?)\s+ならば"))
            .with_pattern(regex(r"\bif\s+(.+?)\s+then\b"))
            .with_example("もし x > 0 ならば", "if x > 0:", "Conditional branch"),
            Rule::new(
                "else_statement",
                "Else clause",
                "Turn the otherwise marker into an else block",
                RuleCategory::ControlStructure,
                84,
                Replacement::Template("${1}else:"),
            )
            .with_pattern(regex(r"(?m)^([ \t]*)そうでなければ"))
            .with_pattern(regex(r"(?m)^([ \t]*)else[ \t]*$"))
            .with_example("そうでなければ", "else:", "Else clause"),
            Rule::new(
                "while_statement",
                "While loop",
                "Turn a conditional loop header into a while block",
                RuleCategory::ControlStructure,
                83,
                Replacement::Template("${1}while ${2}:"),
            )
            .with_pattern(regex(r"(?m)^([ \t]*)(.+?)\s*の間[，,]\s*繰り返す"))
            .with_pattern(regex(r"(?m)^([ \t]*)while\s+(.+?)\s+do\b"))
            .with_example("i < n の間，繰り返す", "while i < n:", "While loop"),
            Rule::new(
                "for_loop",
                "Counted loop",
                "Turn a counted loop with numeric bounds into a range loop",
                RuleCategory::ControlStructure,
                81,
                Replacement::Function(numeric_range_loop),
            )
            .with_pattern(regex(
                r"(\w+)\s*を\s*(\d+)\s*から\s*(\d+)\s*まで\s*(\d+)\s*ずつ増やす",
            ))
            .with_pattern(regex(r"\b(?:for\s+)?(\w+)\s+from\s+(\d+)\s+to\s+(\d+)\s+step\s+(\d+)\b"))
            .with_example(
                "i を 0 から 9 まで 1 ずつ増やす",
                "for i in range(0, 10, 1):",
                "Counted loop",
            ),
            Rule::new(
                "for_loop_expression",
                "Counted loop with expressions",
                "Turn a counted loop with expression bounds into a range loop",
                RuleCategory::ControlStructure,
                80,
                Replacement::Function(expression_range_loop),
            )
            .with_pattern(regex(
                r"(\w+)\s*を\s*(.+?)\s*から\s*(.+?)\s*まで\s*(\w+)\s*ずつ増やす",
            ))
            .with_pattern(regex(r"\b(?:for\s+)?(\w+)\s+from\s+(.+?)\s+to\s+(.+?)\s+step\s+(\w+)\b"))
            .with_example(
                "i を 0 から n-1 まで 1 ずつ増やす",
                "for i in range(0, n-1, 1):",
                "Counted loop with expression bound",
            ),
            // Procedures
            Rule::new(
                "procedure_definition",
                "Procedure definition",
                "Turn a procedure header into a function definition",
                RuleCategory::FunctionDefinition,
                75,
                Replacement::Function(procedure_header),
            )
            .with_pattern(regex(r"手続き\s+(\w+)\((.*?)\)"))
            .with_pattern(regex(r"\bprocedure\s+(\w+)\((.*?)\)"))
            .with_example("手続き sort(配列:A, 整数:n)", "def sort(A, n):", "Procedure with parameters"),
            Rule::new(
                "return_statement",
                "Return statement",
                "Turn a return-value line into a return statement",
                RuleCategory::Statement,
                70,
                Replacement::Template("return ${1}"),
            )
            .with_pattern(regex(r"戻り値\s+(.+)"))
            .with_pattern(regex(r"\breturn\s+(.+)"))
            .with_example("戻り値 result", "return result", "Return a value"),
            // Operators
            Rule::new(
                "operator_not_equal",
                "Not-equal operator",
                "Replace the not-equal glyph",
                RuleCategory::Operator,
                65,
                Replacement::Template("!="),
            )
            .with_pattern(regex("≠"))
            .with_example("x ≠ y", "x != y", "Not equal"),
            Rule::new(
                "operator_less_equal",
                "Less-or-equal operator",
                "Replace the less-or-equal glyph",
                RuleCategory::Operator,
                65,
                Replacement::Template("<="),
            )
            .with_pattern(regex("≤"))
            .with_example("x ≤ y", "x <= y", "Less or equal"),
            Rule::new(
                "operator_greater_equal",
                "Greater-or-equal operator",
                "Replace the greater-or-equal glyph",
                RuleCategory::Operator,
                65,
                Replacement::Template(">="),
            )
            .with_pattern(regex("≥"))
            .with_example("x ≥ y", "x >= y", "Greater or equal"),
            Rule::new(
                "operator_integer_division",
                "Integer division operator",
                "Integer division is already spelled the Python way",
                RuleCategory::Operator,
                64,
                Replacement::Template("//"),
            )
            .with_pattern(regex("//"))
            .with_example("x // y", "x // y", "Integer division"),
            Rule::new(
                "operator_modulo",
                "Modulo operator",
                "Modulo is already spelled the Python way",
                RuleCategory::Operator,
                64,
                Replacement::Template("%"),
            )
            .with_pattern(regex("%"))
            .with_example("x % y", "x % y", "Remainder"),
        ])
    }
}

fn expand_integer_list(caps: &Captures<'_>) -> String {
    let indent = caps.get(1).map_or("", |m| m.as_str());
    caps[2]
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(|name| format!("{indent}{name} = 0"))
        .collect::<Vec<_>>()
        .join("\n")
}

fn numeric_range_loop(caps: &Captures<'_>) -> String {
    let end = adjust_range_end(&caps[3]);
    format!("for {} in range({}, {}, {}):", &caps[1], &caps[2], end, &caps[4])
}

fn expression_range_loop(caps: &Captures<'_>) -> String {
    let start = caps[2].trim();
    let end = adjust_range_end(caps[3].trim());
    format!("for {} in range({}, {}, {}):", &caps[1], start, end, &caps[4])
}

fn procedure_header(caps: &Captures<'_>) -> String {
    let params = caps[2]
        .split(',')
        .map(str::trim)
        .filter(|param| !param.is_empty())
        .map(|param| {
            TYPED_PARAM
                .captures(param)
                .or_else(|| BARE_PARAM.captures(param))
                .and_then(|c| c.get(1))
                .map_or(param, |m| m.as_str())
        })
        .collect::<Vec<_>>()
        .join(", ");
    format!("def {}({}):", &caps[1], params)
}
