/*!
# Python Generator

Turns a parsed [`Program`] into Python source text.

Indentation is carried by an [`EmitContext`] value passed down through
every emit call, so a generator can be shared between threads and
reentrant conversions never see each other's indent level.
*/

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::ast::{DataType, Expression, Parameter, Program, Statement};

pub mod lint;
pub mod optimize;
pub mod to_python;

pub use lint::{validate_python, LintIssue, LintKind, PythonValidation};
pub use optimize::optimize;
pub use to_python::ToPython;

/// Element count used for arrays declared without a size
pub const DEFAULT_ARRAY_SIZE: usize = 10;

/// Widest indentation step; larger requested sizes are clamped
pub const MAX_INDENT_SIZE: usize = 16;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationOptions {
    pub indent_size: usize,
    pub include_comments: bool,
    pub include_type_hints: bool,
    pub optimize_code: bool,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            indent_size: 4,
            include_comments: false,
            include_type_hints: false,
            optimize_code: false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerationResult {
    pub code: String,
    pub imports: Vec<String>,
    pub functions: Vec<String>,
    pub variables: Vec<String>,
    pub complexity: u32,
}

/// Emission failure for a single statement
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GenerationError {
    #[error("cannot assign to {target} at line {line}")]
    InvalidAssignmentTarget { target: String, line: usize },

    #[error("{construct} at line {line} has an empty name")]
    EmptyName { construct: &'static str, line: usize },
}

/// Indentation state threaded through emission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmitContext {
    pub level: usize,
    pub indent_size: usize,
}

impl EmitContext {
    pub fn root(indent_size: usize) -> Self {
        Self {
            level: 0,
            indent_size: indent_size.min(MAX_INDENT_SIZE),
        }
    }

    /// Context for the body of a compound statement
    pub fn nested(&self) -> Self {
        Self {
            level: self.level + 1,
            indent_size: self.indent_size,
        }
    }

    pub fn indent(&self) -> String {
        " ".repeat(self.level.saturating_mul(self.indent_size))
    }
}

/// Exclusive upper bound for a `range` built from an inclusive end.
///
/// Only a purely numeric end is bumped by one; text containing `+` or `-`,
/// or anything non-numeric, is returned unchanged. This is a textual
/// heuristic, so `n+0` is left alone as well.
pub fn adjust_range_end(end: &str) -> String {
    let trimmed = end.trim();
    if trimmed.contains('-') || trimmed.contains('+') {
        return trimmed.to_string();
    }
    match trimmed.parse::<i64>().ok().and_then(|n| n.checked_add(1)) {
        Some(bumped) => bumped.to_string(),
        None => trimmed.to_string(),
    }
}

/// Generator from the statement tree to Python source
#[derive(Debug, Clone, Default)]
pub struct PythonGenerator {
    options: GenerationOptions,
}

impl PythonGenerator {
    pub fn new(options: GenerationOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &GenerationOptions {
        &self.options
    }

    /// Generate Python code for a whole program
    pub fn generate(&self, program: &Program) -> GenerationResult {
        let ctx = EmitContext::root(self.options.indent_size);
        let mut lines = Vec::new();
        let mut functions = Vec::new();
        let mut variables = Vec::new();

        if self.options.include_comments {
            lines.push("# Generated from IPA pseudo code".to_string());
            lines.push("# Auto-converted by pseudo-core".to_string());
            lines.push(String::new());
        }

        for statement in &program.body {
            self.emit_or_degrade(statement, ctx, &mut lines);

            match statement {
                Statement::VariableDeclaration { name, .. } => variables.push(name.clone()),
                Statement::ProcedureDeclaration { name, .. } => functions.push(name.clone()),
                _ => {}
            }
        }

        let code = lines.join("\n");
        let code = if self.options.optimize_code {
            optimize(&code)
        } else {
            code
        };

        debug!(
            statements = program.body.len(),
            lines = code.lines().count(),
            "generated python"
        );

        GenerationResult {
            code,
            imports: Vec::new(),
            functions,
            variables,
            complexity: program.metadata.complexity,
        }
    }

    /// Emit one statement; a failure becomes a comment or is dropped
    fn emit_or_degrade(&self, statement: &Statement, ctx: EmitContext, lines: &mut Vec<String>) {
        match self.emit_statement(statement, ctx) {
            Ok(emitted) => lines.extend(emitted),
            Err(e) => {
                warn!(line = statement.line(), error = %e, "code generation failed");
                if self.options.include_comments {
                    let indent = ctx.indent();
                    lines.push(format!(
                        "{indent}# ERROR: Could not generate code for statement at line {}",
                        statement.line()
                    ));
                    lines.push(format!("{indent}# {e}"));
                }
            }
        }
    }

    fn emit_block(&self, body: &[Statement], ctx: EmitContext, lines: &mut Vec<String>) {
        for statement in body {
            self.emit_or_degrade(statement, ctx, lines);
        }
    }

    /// Emit the lines for a single statement at the given indentation
    pub fn emit_statement(
        &self,
        statement: &Statement,
        ctx: EmitContext,
    ) -> Result<Vec<String>, GenerationError> {
        let indent = ctx.indent();

        match statement {
            Statement::VariableDeclaration {
                data_type,
                name,
                size,
                line,
            } => {
                require_name(name, "variable declaration", *line)?;
                let value = match data_type {
                    DataType::Integer => "0".to_string(),
                    DataType::String => "\"\"".to_string(),
                    DataType::Array => {
                        format!("[0] * {}", size.unwrap_or(DEFAULT_ARRAY_SIZE))
                    }
                };
                Ok(vec![format!("{indent}{name} = {value}")])
            }

            Statement::Assignment { left, right, line } => {
                if !matches!(
                    left,
                    Expression::Identifier { .. } | Expression::ArrayAccess { .. }
                ) {
                    return Err(GenerationError::InvalidAssignmentTarget {
                        target: left.to_python(),
                        line: *line,
                    });
                }
                Ok(vec![format!(
                    "{indent}{} = {}",
                    left.to_python(),
                    right.to_python()
                )])
            }

            Statement::IfStatement {
                condition,
                consequent,
                alternate,
                ..
            } => {
                let mut lines = vec![format!("{indent}if {}:", condition.to_python())];
                self.emit_block(consequent, ctx.nested(), &mut lines);

                if let Some(alternate) = alternate {
                    lines.push(format!("{indent}else:"));
                    self.emit_block(alternate, ctx.nested(), &mut lines);
                }
                Ok(lines)
            }

            Statement::ForStatement {
                variable,
                start,
                end,
                step,
                body,
                line,
            } => {
                require_name(variable, "loop variable", *line)?;
                let start = start.to_python_compact();
                let end = adjust_range_end(&end.to_python_compact());
                let step = step.to_python_compact();
                let step = if step == "1" {
                    String::new()
                } else {
                    format!(", {step}")
                };

                let mut lines = vec![format!(
                    "{indent}for {variable} in range({start}, {end}{step}):"
                )];
                self.emit_block(body, ctx.nested(), &mut lines);
                Ok(lines)
            }

            Statement::WhileStatement {
                condition, body, ..
            } => {
                let mut lines = vec![format!("{indent}while {}:", condition.to_python())];
                self.emit_block(body, ctx.nested(), &mut lines);
                Ok(lines)
            }

            Statement::ProcedureDeclaration {
                name,
                parameters,
                body,
                line,
            } => {
                require_name(name, "procedure", *line)?;
                let params = parameters
                    .iter()
                    .map(|p| p.name.as_str())
                    .collect::<Vec<_>>()
                    .join(", ");
                let hints = self.type_hints(parameters);

                let inner = ctx.nested();
                let mut lines = vec![format!("{indent}def {name}({params}){hints}:")];
                if self.options.include_comments {
                    lines.push(format!(
                        "{}\"\"\"Generated procedure from pseudo code\"\"\"",
                        inner.indent()
                    ));
                }

                if body.is_empty() {
                    lines.push(format!("{}pass", inner.indent()));
                } else {
                    self.emit_block(body, inner, &mut lines);
                }
                Ok(lines)
            }

            Statement::ReturnStatement { argument, .. } => {
                Ok(vec![format!("{indent}return {}", argument.to_python())])
            }

            // Literals render their raw text, so markers such as `else:`
            // and unrecognized lines pass through verbatim.
            Statement::ExpressionStatement { expression, .. } => {
                Ok(vec![format!("{indent}{}", expression.to_python())])
            }
        }
    }

    fn type_hints(&self, parameters: &[Parameter]) -> &'static str {
        if self.options.include_type_hints && !parameters.is_empty() {
            " -> None"
        } else {
            ""
        }
    }
}

fn require_name(name: &str, construct: &'static str, line: usize) -> Result<(), GenerationError> {
    if name.trim().is_empty() {
        return Err(GenerationError::EmptyName { construct, line });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::ast::Expression;

    fn program(statements: Vec<Statement>) -> Program {
        let mut program = Program::new();
        for statement in statements {
            program.push(statement);
        }
        program
    }

    fn generate(statements: Vec<Statement>) -> String {
        PythonGenerator::default().generate(&program(statements)).code
    }

    #[test]
    fn test_emit_context_clamps_indent_size() {
        let ctx = EmitContext::root(usize::MAX).nested();
        assert_eq!(ctx.indent_size, MAX_INDENT_SIZE);
        assert_eq!(ctx.indent().len(), MAX_INDENT_SIZE);
    }

    fn declaration(data_type: DataType, name: &str, size: Option<usize>) -> Statement {
        Statement::VariableDeclaration {
            data_type,
            name: name.to_string(),
            size,
            line: 1,
        }
    }

    fn counted_loop(end: Expression, step: i64) -> Statement {
        Statement::ForStatement {
            variable: "i".to_string(),
            start: Expression::integer(0),
            end,
            step: Expression::integer(step),
            body: Vec::new(),
            line: 1,
        }
    }

    #[test]
    fn test_declarations_emit_zero_values() {
        let code = generate(vec![
            declaration(DataType::Integer, "count", None),
            declaration(DataType::String, "name", None),
            declaration(DataType::Array, "A", Some(5)),
            declaration(DataType::Array, "B", None),
        ]);
        assert_eq!(code, "count = 0\nname = \"\"\nA = [0] * 5\nB = [0] * 10");
    }

    #[test]
    fn test_range_end_adjustment() {
        assert_eq!(adjust_range_end("9"), "10");
        assert_eq!(adjust_range_end("n-1"), "n-1");
        assert_eq!(adjust_range_end("n+0"), "n+0");
        assert_eq!(adjust_range_end("n"), "n");
        assert_eq!(adjust_range_end(" 3 "), "4");
    }

    #[test]
    fn test_for_loop_bounds() {
        assert_eq!(
            generate(vec![counted_loop(Expression::integer(9), 1)]),
            "for i in range(0, 10):"
        );
        assert_eq!(
            generate(vec![counted_loop(
                Expression::binary("-", Expression::identifier("n"), Expression::integer(1)),
                2
            )]),
            "for i in range(0, n-1, 2):"
        );
    }

    #[test]
    fn test_nested_bodies_use_context_indent() {
        let code = generate(vec![Statement::IfStatement {
            condition: Expression::binary("≠", Expression::identifier("x"), Expression::integer(0)),
            consequent: vec![Statement::WhileStatement {
                condition: Expression::binary("≤", Expression::identifier("i"), Expression::identifier("n")),
                body: vec![Statement::Assignment {
                    left: Expression::identifier("i"),
                    right: Expression::binary("+", Expression::identifier("i"), Expression::integer(1)),
                    line: 3,
                }],
                line: 2,
            }],
            alternate: Some(vec![Statement::ReturnStatement {
                argument: Expression::identifier("x"),
                line: 5,
            }]),
            line: 1,
        }]);

        assert_eq!(
            code,
            "if x != 0:\n    while i <= n:\n        i = i + 1\nelse:\n    return x"
        );
    }

    #[test]
    fn test_procedure_strips_types_and_emits_pass() {
        let code = generate(vec![Statement::ProcedureDeclaration {
            name: "sort".to_string(),
            parameters: vec![
                Parameter {
                    type_name: Some("array".to_string()),
                    name: "A".to_string(),
                },
                Parameter {
                    type_name: None,
                    name: "n".to_string(),
                },
            ],
            body: Vec::new(),
            line: 1,
        }]);
        assert_eq!(code, "def sort(A, n):\n    pass");
    }

    #[test]
    fn test_procedure_with_comments_and_hints() {
        let generator = PythonGenerator::new(GenerationOptions {
            include_comments: true,
            include_type_hints: true,
            indent_size: 2,
            ..Default::default()
        });
        let result = generator.generate(&program(vec![Statement::ProcedureDeclaration {
            name: "f".to_string(),
            parameters: vec![Parameter {
                type_name: None,
                name: "a".to_string(),
            }],
            body: Vec::new(),
            line: 1,
        }]));

        assert!(result.code.starts_with("# Generated from IPA pseudo code"));
        assert!(result.code.contains("def f(a) -> None:"));
        assert!(result.code.contains("  \"\"\"Generated procedure from pseudo code\"\"\""));
        assert!(result.code.ends_with("  pass"));
        assert_eq!(result.functions, vec!["f".to_string()]);
        assert_eq!(result.complexity, 2);
    }

    #[test]
    fn test_markers_pass_through_verbatim() {
        let code = generate(vec![
            Statement::ExpressionStatement {
                expression: Expression::verbatim("else:"),
                line: 1,
            },
            Statement::ExpressionStatement {
                expression: Expression::verbatim("print(x)"),
                line: 2,
            },
        ]);
        assert_eq!(code, "else:\nprint(x)");
    }

    #[test]
    fn test_failed_statement_degrades_and_generation_continues() {
        let bad = Statement::Assignment {
            left: Expression::integer(5),
            right: Expression::identifier("x"),
            line: 1,
        };
        let good = declaration(DataType::Integer, "y", None);

        assert_eq!(generate(vec![bad.clone(), good.clone()]), "y = 0");

        let generator = PythonGenerator::new(GenerationOptions {
            include_comments: true,
            ..Default::default()
        });
        let code = generator.generate(&program(vec![bad, good])).code;
        assert!(code.contains("# ERROR: Could not generate code for statement at line 1"));
        assert!(code.contains("# cannot assign to 5 at line 1"));
        assert!(code.ends_with("y = 0"));
    }

    #[test]
    fn test_emit_context_is_explicit() {
        let generator = PythonGenerator::default();
        let statement = declaration(DataType::Integer, "x", None);
        let nested = EmitContext::root(4).nested().nested();

        assert_eq!(
            generator.emit_statement(&statement, nested).unwrap(),
            vec!["        x = 0".to_string()]
        );
        // The generator itself holds no indentation state
        assert_eq!(
            generator.emit_statement(&statement, EmitContext::root(4)).unwrap(),
            vec!["x = 0".to_string()]
        );
    }

    #[test]
    fn test_empty_name_is_rejected() {
        let generator = PythonGenerator::default();
        let err = generator
            .emit_statement(&declaration(DataType::Integer, " ", None), EmitContext::root(4))
            .unwrap_err();
        assert_eq!(
            err,
            GenerationError::EmptyName {
                construct: "variable declaration",
                line: 1
            }
        );
    }
}
