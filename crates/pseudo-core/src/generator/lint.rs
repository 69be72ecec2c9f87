// Lightweight structural lint for generated Python

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static BLOCK_HEADER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(if|elif|else|for|while|def|class|try|except|finally|with)\b.*:$")
        .expect("valid block-header pattern")
});
static ASSIGNED_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\w+)\s*=(?:[^=]|$)").expect("valid assignment pattern"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LintKind {
    Syntax,
    Semantic,
    Style,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LintIssue {
    /// 1-based line in the generated code
    pub line: usize,
    pub message: String,
    pub kind: LintKind,
}

impl LintIssue {
    fn syntax(line: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            message: message.into(),
            kind: LintKind::Syntax,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PythonValidation {
    pub is_valid: bool,
    pub errors: Vec<LintIssue>,
    pub warnings: Vec<LintIssue>,
}

/// Check generated code for obvious structural mistakes.
///
/// This is not a Python parser. It reports stray colons, block headers
/// followed by an unindented line, and assignment targets starting with a
/// digit.
pub fn validate_python(code: &str) -> PythonValidation {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();
    let lines: Vec<&str> = code.split('\n').collect();

    for (i, line) in lines.iter().enumerate() {
        let number = i + 1;
        let trimmed = line.trim();
        if trimmed.starts_with('#') {
            continue;
        }

        if trimmed.ends_with(':') && !BLOCK_HEADER.is_match(line) {
            warnings.push(LintIssue::syntax(number, "Unexpected colon in statement"));
        }

        if i > 0 && !line.is_empty() && !line.starts_with(' ') && !line.starts_with('\t') {
            let previous = lines[i - 1].trim();
            if previous.ends_with(':') && !previous.starts_with('#') {
                errors.push(LintIssue::syntax(number, "Expected indented block"));
            }
        }

        if let Some(caps) = ASSIGNED_NAME.captures(line) {
            let name = &caps[1];
            if name.starts_with(|c: char| c.is_ascii_digit()) {
                errors.push(LintIssue::syntax(
                    number,
                    format!("Invalid variable name: {name}"),
                ));
            }
        }
    }

    PythonValidation {
        is_valid: errors.is_empty(),
        errors,
        warnings,
    }
}
