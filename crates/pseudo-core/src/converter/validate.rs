// Post-hoc consistency check between source and generated code

use serde::{Deserialize, Serialize};

use super::{ConversionDiagnostic, ConversionWarning, WarningKind};
use crate::generator::validate_python;
use crate::parser::Severity;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<ConversionDiagnostic>,
    pub warnings: Vec<ConversionWarning>,
    pub suggestions: Vec<String>,
}

/// Lint `python` and compare its size against `pseudo`.
///
/// The size comparison is a coverage heuristic: fewer generated statements
/// than half the source lines usually means lines were dropped.
pub fn validate_conversion(pseudo: &str, python: &str) -> ValidationResult {
    let lint = validate_python(python);

    let errors: Vec<ConversionDiagnostic> = lint
        .errors
        .into_iter()
        .map(|issue| ConversionDiagnostic {
            line: issue.line,
            column: 0,
            message: issue.message,
            severity: Severity::Error,
            suggestion: None,
        })
        .collect();

    let mut warnings: Vec<ConversionWarning> = lint
        .warnings
        .into_iter()
        .map(|issue| ConversionWarning {
            line: issue.line,
            column: 0,
            message: issue.message,
            kind: issue.kind,
            suggestion: None,
        })
        .collect();

    let mut suggestions = Vec::new();
    let pseudo_lines = pseudo.split('\n').filter(|l| !l.trim().is_empty()).count();
    let python_lines = python
        .split('\n')
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .count();

    if (python_lines as f64) < pseudo_lines as f64 * 0.5 {
        let suggestion = "Check for pseudo-code lines the converter did not recognize".to_string();
        warnings.push(ConversionWarning {
            line: 0,
            column: 0,
            message: "Generated Python code seems too short compared to pseudo code".to_string(),
            kind: WarningKind::Semantic,
            suggestion: Some(suggestion.clone()),
        });
        suggestions.push(suggestion);
    }

    ValidationResult {
        is_valid: errors.is_empty(),
        errors,
        warnings,
        suggestions,
    }
}
