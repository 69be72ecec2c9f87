/*!
# Converter

Entry point of the engine. [`convert`] runs one of three strategies over a
pseudo-code text:

- **pattern**: every enabled catalog rule in priority order over the whole
  text, followed by re-indentation
- **tree**: parse, validate, then generate from the statement tree
- **hybrid**: pattern first, then tree over the rewritten text

`convert` is total. Any failure that escapes a strategy, panics included,
becomes a failed [`ConversionResult`] with a single error.
*/

use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::str::FromStr;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error};

use crate::ast::Program;
use crate::generator::{GenerationOptions, PythonGenerator};
use crate::parser::{self, Severity};
use crate::rules::RuleCatalog;
use crate::{PseudoError, Result};

mod format;
mod validate;

pub use crate::generator::LintKind as WarningKind;
pub use format::{reindent, MAX_BLOCK_DEPTH};
pub use validate::{validate_conversion, ValidationResult};

/// Conversion strategy
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConversionMethod {
    #[serde(alias = "rules")]
    Pattern,
    #[serde(alias = "ast")]
    Tree,
    #[default]
    Hybrid,
}

impl fmt::Display for ConversionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConversionMethod::Pattern => write!(f, "pattern"),
            ConversionMethod::Tree => write!(f, "tree"),
            ConversionMethod::Hybrid => write!(f, "hybrid"),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown conversion method: {0} (expected pattern, tree or hybrid)")]
pub struct UnknownMethod(pub String);

impl FromStr for ConversionMethod {
    type Err = UnknownMethod;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pattern" | "rules" => Ok(ConversionMethod::Pattern),
            "tree" | "ast" => Ok(ConversionMethod::Tree),
            "hybrid" => Ok(ConversionMethod::Hybrid),
            other => Err(UnknownMethod(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConversionOptions {
    pub method: ConversionMethod,
    pub include_comments: bool,
    pub indent_size: usize,
    /// Record a step trace
    pub include_debug_info: bool,
    /// Lint the final code and append the findings as warnings
    pub validate_output: bool,
}

impl Default for ConversionOptions {
    fn default() -> Self {
        Self {
            method: ConversionMethod::Hybrid,
            include_comments: false,
            indent_size: 4,
            include_debug_info: false,
            validate_output: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionDiagnostic {
    pub line: usize,
    pub column: usize,
    pub message: String,
    pub severity: Severity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionWarning {
    pub line: usize,
    pub column: usize,
    pub message: String,
    pub kind: WarningKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TransformationKind {
    PatternBased,
    Structural,
}

/// One snapshot in a step trace
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionStep {
    pub step_number: usize,
    pub description: String,
    pub input_text: String,
    pub output_text: String,
    /// Rule id or pass name
    pub rule_applied: String,
    pub kind: TransformationKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionMetadata {
    pub total_lines: usize,
    pub conversion_time: Duration,
    pub rules_applied: usize,
    pub complexity_score: u32,
    pub method: ConversionMethod,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ast: Option<Program>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionResult {
    pub success: bool,
    pub code: String,
    pub errors: Vec<ConversionDiagnostic>,
    pub warnings: Vec<ConversionWarning>,
    pub steps: Vec<ConversionStep>,
    pub metadata: ConversionMetadata,
}

impl ConversionResult {
    fn empty(text: &str, method: ConversionMethod) -> Self {
        Self {
            success: true,
            code: String::new(),
            errors: Vec::new(),
            warnings: Vec::new(),
            steps: Vec::new(),
            metadata: ConversionMetadata {
                total_lines: text.split('\n').count(),
                conversion_time: Duration::ZERO,
                rules_applied: 0,
                complexity_score: 0,
                method,
                ast: None,
            },
        }
    }

    /// Result standing in for a conversion that could not complete
    fn catastrophic(text: &str, method: ConversionMethod, message: String) -> Self {
        let mut result = Self::empty(text, method);
        result.success = false;
        result.errors.push(ConversionDiagnostic {
            line: 0,
            column: 0,
            message,
            severity: Severity::Error,
            suggestion: None,
        });
        result
    }
}

/// Convert pseudo-code text to Python
pub fn convert(text: &str, options: &ConversionOptions) -> ConversionResult {
    let started = Instant::now();
    debug!(method = %options.method, bytes = text.len(), "starting conversion");

    let outcome = panic::catch_unwind(AssertUnwindSafe(|| run(text, options)))
        .unwrap_or_else(|payload| Err(PseudoError::Internal(panic_message(payload.as_ref()))));

    let mut result = match outcome {
        Ok(result) => result,
        Err(e) => {
            error!(method = %options.method, error = %e, "conversion failed");
            ConversionResult::catastrophic(text, options.method, e.to_string())
        }
    };

    result.metadata.conversion_time = started.elapsed();
    debug!(
        success = result.success,
        errors = result.errors.len(),
        warnings = result.warnings.len(),
        elapsed = ?result.metadata.conversion_time,
        "conversion finished"
    );
    result
}

/// [`convert`] with the step trace forced on
pub fn convert_with_steps(text: &str, options: &ConversionOptions) -> ConversionResult {
    let options = ConversionOptions {
        include_debug_info: true,
        ..options.clone()
    };
    convert(text, &options)
}

fn run(text: &str, options: &ConversionOptions) -> Result<ConversionResult> {
    let mut result = match options.method {
        ConversionMethod::Pattern => convert_with_rules(text, options),
        ConversionMethod::Tree => convert_with_tree(text, options)?,
        ConversionMethod::Hybrid => convert_hybrid(text, options)?,
    };

    if options.validate_output {
        let validation = validate_conversion(text, &result.code);
        // Findings are advisory: lint errors are reported as warnings
        let downgraded = validation.errors.into_iter().map(|e| ConversionWarning {
            line: e.line,
            column: e.column,
            message: e.message,
            kind: WarningKind::Syntax,
            suggestion: e.suggestion,
        });
        result.warnings.extend(downgraded);
        result.warnings.extend(validation.warnings);
    }

    Ok(result)
}

fn convert_with_rules(text: &str, options: &ConversionOptions) -> ConversionResult {
    let mut result = ConversionResult::empty(text, ConversionMethod::Pattern);
    let mut current = text.to_string();

    for rule in RuleCatalog::global().ordered() {
        let rewritten = RuleCatalog::apply_one(rule, &current);
        if rewritten == current {
            continue;
        }

        debug!(rule = rule.id, priority = rule.priority, "rule applied");
        result.metadata.rules_applied += 1;
        if options.include_debug_info {
            result.steps.push(ConversionStep {
                step_number: result.steps.len() + 1,
                description: rule.description.to_string(),
                input_text: current.clone(),
                output_text: rewritten.clone(),
                rule_applied: rule.id.to_string(),
                kind: TransformationKind::PatternBased,
            });
        }
        current = rewritten;
    }

    result.code = reindent(&current, options.indent_size);
    result
}

fn convert_with_tree(text: &str, options: &ConversionOptions) -> Result<ConversionResult> {
    let mut result = ConversionResult::empty(text, ConversionMethod::Tree);

    let program = parser::parse(text);
    let tracing = options.include_debug_info;
    let tree_json = if tracing {
        parser::print_ast(&program)?
    } else {
        String::new()
    };
    if tracing {
        result.steps.push(ConversionStep {
            step_number: 1,
            description: "Parse pseudo code into a statement tree".to_string(),
            input_text: text.to_string(),
            output_text: tree_json.clone(),
            rule_applied: "syntax-parser".to_string(),
            kind: TransformationKind::Structural,
        });
    }

    let issues = parser::validate_syntax(text);
    if tracing {
        result.steps.push(ConversionStep {
            step_number: 2,
            description: "Check pseudo-code syntax".to_string(),
            input_text: text.to_string(),
            output_text: serde_json::to_string_pretty(&issues)?,
            rule_applied: "syntax-validator".to_string(),
            kind: TransformationKind::Structural,
        });
    }
    for issue in issues {
        match issue.severity {
            Severity::Error => result.errors.push(ConversionDiagnostic {
                line: issue.line,
                column: issue.column,
                message: issue.message,
                severity: Severity::Error,
                suggestion: None,
            }),
            Severity::Warning => result.warnings.push(ConversionWarning {
                line: issue.line,
                column: issue.column,
                message: issue.message,
                kind: WarningKind::Syntax,
                suggestion: None,
            }),
        }
    }

    let generator = PythonGenerator::new(GenerationOptions {
        indent_size: options.indent_size,
        include_comments: options.include_comments,
        include_type_hints: false,
        optimize_code: true,
    });
    let generated = generator.generate(&program);
    if tracing {
        result.steps.push(ConversionStep {
            step_number: 3,
            description: "Generate Python code from the statement tree".to_string(),
            input_text: tree_json,
            output_text: generated.code.clone(),
            rule_applied: "python-generator".to_string(),
            kind: TransformationKind::Structural,
        });
    }

    result.success = result.errors.is_empty();
    result.code = generated.code;
    result.metadata.complexity_score = generated.complexity;
    result.metadata.ast = Some(program);
    Ok(result)
}

fn convert_hybrid(text: &str, options: &ConversionOptions) -> Result<ConversionResult> {
    let quiet = ConversionOptions {
        include_debug_info: false,
        ..options.clone()
    };
    let rewritten = convert_with_rules(text, &quiet);
    let structured = convert_with_tree(&rewritten.code, &quiet)?;

    let mut result = ConversionResult::empty(text, ConversionMethod::Hybrid);
    if options.include_debug_info {
        result.steps.push(ConversionStep {
            step_number: 1,
            description: "Rule-based preprocessing".to_string(),
            input_text: text.to_string(),
            output_text: rewritten.code.clone(),
            rule_applied: "conversion-rules".to_string(),
            kind: TransformationKind::PatternBased,
        });
        result.steps.push(ConversionStep {
            step_number: 2,
            description: "Tree-based structure conversion".to_string(),
            input_text: rewritten.code.clone(),
            output_text: structured.code.clone(),
            rule_applied: "syntax-parser + python-generator".to_string(),
            kind: TransformationKind::Structural,
        });
    }

    result.errors = rewritten.errors;
    result.errors.extend(structured.errors);
    result.warnings = rewritten.warnings;
    result.warnings.extend(structured.warnings);
    result.success = result.errors.is_empty();
    result.code = structured.code;
    result.metadata.rules_applied = rewritten.metadata.rules_applied;
    result.metadata.complexity_score = structured.metadata.complexity_score;
    result.metadata.ast = structured.metadata.ast;
    Ok(result)
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        format!("conversion panicked: {message}")
    } else if let Some(message) = payload.downcast_ref::<String>() {
        format!("conversion panicked: {message}")
    } else {
        "conversion panicked".to_string()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn options(method: ConversionMethod) -> ConversionOptions {
        ConversionOptions {
            method,
            ..Default::default()
        }
    }

    #[test]
    fn test_method_parsing() {
        assert_eq!("rules".parse::<ConversionMethod>(), Ok(ConversionMethod::Pattern));
        assert_eq!("AST".parse::<ConversionMethod>(), Ok(ConversionMethod::Tree));
        assert_eq!("hybrid".parse::<ConversionMethod>(), Ok(ConversionMethod::Hybrid));
        assert!("regex".parse::<ConversionMethod>().is_err());
        assert_eq!(ConversionMethod::Tree.to_string(), "tree");
    }

    #[test]
    fn test_options_deserialize_with_defaults() -> anyhow::Result<()> {
        let options: ConversionOptions = serde_json::from_str(r#"{"method": "ast", "indent_size": 2}"#)?;
        assert_eq!(options.method, ConversionMethod::Tree);
        assert_eq!(options.indent_size, 2);
        assert!(options.validate_output);
        assert!(!options.include_comments);
        Ok(())
    }

    #[test]
    fn test_pattern_conversion() {
        let result = convert("integer: count\ncount ← count + 1", &options(ConversionMethod::Pattern));

        assert!(result.success);
        assert_eq!(result.code, "count = 0\ncount = count + 1");
        assert_eq!(result.metadata.rules_applied, 2);
        assert_eq!(result.metadata.complexity_score, 0);
        assert!(result.metadata.ast.is_none());
        assert!(result.steps.is_empty());
    }

    #[test]
    fn test_pattern_steps_only_for_changing_rules() {
        let result = convert_with_steps("x ← a % b", &options(ConversionMethod::Pattern));

        let rules: Vec<&str> = result.steps.iter().map(|s| s.rule_applied.as_str()).collect();
        assert_eq!(rules, vec!["assignment"]);
        assert_eq!(result.steps[0].step_number, 1);
        assert_eq!(result.steps[0].kind, TransformationKind::PatternBased);
        assert_eq!(result.metadata.rules_applied, 1);
    }

    #[test]
    fn test_tree_conversion_traces_three_passes() {
        let result = convert_with_steps("integer: n\nn ← 5", &options(ConversionMethod::Tree));

        assert!(result.success);
        assert_eq!(result.code, "n = 0\nn = 5");
        assert_eq!(result.steps.len(), 3);
        assert!(result.steps.iter().all(|s| s.kind == TransformationKind::Structural));
        assert_eq!(result.steps[2].rule_applied, "python-generator");
        assert!(result.metadata.ast.is_some());
    }

    #[test]
    fn test_hybrid_traces_two_summary_steps() {
        let result = convert_with_steps("if x > 0 then\nx ← 0", &ConversionOptions::default());

        assert_eq!(result.metadata.method, ConversionMethod::Hybrid);
        assert_eq!(result.steps.len(), 2);
        assert_eq!(result.steps[0].rule_applied, "conversion-rules");
        assert_eq!(result.steps[1].rule_applied, "syntax-parser + python-generator");
        assert_eq!(result.steps[0].output_text, result.steps[1].input_text);
    }

    #[test]
    fn test_validation_findings_are_warnings_only() {
        let mut opts = options(ConversionMethod::Tree);
        let validated = convert("while i < n do\ni ← i + 1", &opts);
        opts.validate_output = false;
        let unvalidated = convert("while i < n do\ni ← i + 1", &opts);

        assert_eq!(validated.success, unvalidated.success);
        assert_eq!(validated.errors, unvalidated.errors);
        assert!(validated
            .warnings
            .iter()
            .any(|w| w.message == "Expected indented block"));
    }

    #[test]
    fn test_catastrophic_result_shape() {
        let result = ConversionResult::catastrophic("a\nb", ConversionMethod::Tree, "boom".to_string());
        assert!(!result.success);
        assert!(result.code.is_empty());
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].line, 0);
        assert_eq!(result.metadata.total_lines, 2);
        assert_eq!(result.metadata.rules_applied, 0);
        assert_eq!(result.metadata.complexity_score, 0);
    }

    #[test]
    fn test_panic_message_extraction() {
        let payload: Box<dyn std::any::Any + Send> = Box::new("bad state");
        assert_eq!(panic_message(payload.as_ref()), "conversion panicked: bad state");
    }
}
