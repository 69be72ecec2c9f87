/*!
# Pseudo-code Parser

Line-oriented parser for the exam notation. Every non-blank line becomes at
most one statement; compound statements are recorded as headers and their
bodies stay empty, so the tree is flat.

A line that cannot be classified is logged and skipped. [`parse`] itself
never fails.
*/

use thiserror::Error;
use tracing::{debug, trace, warn};

use crate::ast::Program;

pub mod expression;
pub mod statement;
mod validate;

pub use expression::parse_expression;
pub use statement::parse_statement;
pub use validate::{validate_syntax, Severity, SyntaxIssue};

/// Failure to classify a single line
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("malformed {construct}: {line}")]
    Malformed { construct: &'static str, line: String },

    #[error("integer literal out of range: {0}")]
    IntegerOverflow(String),

    #[error("expression nests {nesting} operators and brackets, limit is {limit}")]
    TooDeep { nesting: usize, limit: usize },
}

impl ParseError {
    pub(crate) fn malformed(construct: &'static str, line: &str) -> Self {
        ParseError::Malformed {
            construct,
            line: line.to_string(),
        }
    }
}

/// Parse pseudo-code text into a flat program
pub fn parse(text: &str) -> Program {
    let mut program = Program::new();

    for (i, raw) in text.split('\n').enumerate() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }
        program.metadata.total_lines += 1;

        match parse_statement(line, i + 1) {
            Ok(statement) => {
                trace!(line = i + 1, kind = statement.kind(), "classified line");
                program.push(statement)
            }
            Err(e) => warn!(line = i + 1, error = %e, "skipping unparsable line"),
        }
    }

    debug!(
        statements = program.body.len(),
        complexity = program.metadata.complexity,
        "parsed program"
    );
    program
}

/// Pretty JSON rendering of the tree, for debugging
pub fn print_ast(program: &Program) -> serde_json::Result<String> {
    serde_json::to_string_pretty(program)
}
