// Structural lint over raw pseudo-code lines

use serde::{Deserialize, Serialize};

use crate::keywords::{is_normalized_header, IF, LOOP_FROM, LOOP_STEP, LOOP_TO, PROCEDURE, THEN};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyntaxIssue {
    /// 1-based source line
    pub line: usize,
    pub column: usize,
    pub message: String,
    pub severity: Severity,
}

impl SyntaxIssue {
    fn new(line: usize, message: &str, severity: Severity) -> Self {
        Self {
            line,
            column: 0,
            message: message.to_string(),
            severity,
        }
    }
}

/// Report malformed headers without building a tree
pub fn validate_syntax(text: &str) -> Vec<SyntaxIssue> {
    let mut issues = Vec::new();

    for (i, raw) in text.split('\n').enumerate() {
        let line = raw.trim();
        if line.is_empty() || is_normalized_header(line) {
            continue;
        }
        let number = i + 1;

        if PROCEDURE.occurs_in(line) && !line.contains('(') && !line.contains(')') {
            issues.push(SyntaxIssue::new(
                number,
                "Procedure declaration is missing parentheses",
                Severity::Error,
            ));
        }

        if IF.occurs_in(line) && !THEN.occurs_in(line) {
            issues.push(SyntaxIssue::new(
                number,
                "If statement is missing its then keyword (ならば / then)",
                Severity::Error,
            ));
        }

        if LOOP_FROM.occurs_in(line) && LOOP_TO.occurs_in(line) && !LOOP_STEP.occurs_in(line) {
            issues.push(SyntaxIssue::new(
                number,
                "Counted loop is missing its step clause (ずつ増やす / step)",
                Severity::Warning,
            ));
        }
    }

    issues
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_source_has_no_issues() {
        let source = "procedure f(a)\n\nif a > 0 then\nfor i from 0 to 9 step 1\n";
        assert!(validate_syntax(source).is_empty());
    }

    #[test]
    fn test_procedure_without_parentheses() {
        let issues = validate_syntax("integer: x\nprocedure sort");
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].line, 2);
        assert_eq!(issues[0].column, 0);
        assert_eq!(issues[0].severity, Severity::Error);
    }

    #[test]
    fn test_if_without_then() {
        let issues = validate_syntax("もし x > 0");
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::Error);
    }

    #[test]
    fn test_loop_without_step_is_a_warning() {
        let issues = validate_syntax("i を 0 から 9 まで");
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::Warning);
    }

    #[test]
    fn test_normalized_headers_are_skipped() {
        assert!(validate_syntax("if x > 0:\ndef f():").is_empty());
    }
}
