// Python source rendering for expressions
// Operator glyphs are translated; everything else is rendered structurally.

use crate::ast::{Expression, LiteralValue};
use crate::keywords::python_operator;

/// Trait for tree nodes that render as Python source
pub trait ToPython {
    fn to_python(&self) -> String;

    /// Rendering without padding around binary operators (`n-1`)
    fn to_python_compact(&self) -> String {
        self.to_python()
    }
}

impl ToPython for Expression {
    fn to_python(&self) -> String {
        render(self, false)
    }

    fn to_python_compact(&self) -> String {
        render(self, true)
    }
}

fn render(expression: &Expression, compact: bool) -> String {
    match expression {
        Expression::Identifier { name } => name.clone(),
        Expression::Literal { value, raw } => {
            if !raw.is_empty() {
                return raw.clone();
            }
            match value {
                LiteralValue::Integer(n) => n.to_string(),
                LiteralValue::Text(s) => format!("\"{}\"", escape_string(s)),
            }
        }
        Expression::BinaryExpression {
            operator,
            left,
            right,
        } => {
            let operator = python_operator(operator);
            let left = render(left, compact);
            let right = render(right, compact);
            if compact {
                format!("{left}{operator}{right}")
            } else {
                format!("{left} {operator} {right}")
            }
        }
        Expression::ArrayAccess { object, property } => {
            format!("{}[{}]", render(object, compact), render(property, compact))
        }
        Expression::FunctionCall { callee, arguments } => {
            let args = arguments
                .iter()
                .map(|arg| render(arg, compact))
                .collect::<Vec<_>>()
                .join(", ");
            format!("{}({})", render(callee, compact), args)
        }
    }
}

fn escape_string(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operator_glyphs_translate() {
        let cases = [("≠", "!="), ("≤", "<="), ("≥", ">="), ("←", "=")];
        for (glyph, python) in cases {
            let expr = Expression::binary(glyph, Expression::identifier("x"), Expression::identifier("y"));
            assert_eq!(expr.to_python(), format!("x {python} y"));
        }
    }

    #[test]
    fn test_nested_expressions() {
        let expr = Expression::call(
            Expression::identifier("max"),
            vec![
                Expression::index(Expression::identifier("A"), Expression::identifier("i")),
                Expression::integer(0),
            ],
        );
        assert_eq!(expr.to_python(), "max(A[i], 0)");
    }

    #[test]
    fn test_compact_rendering() {
        let expr = Expression::binary("-", Expression::identifier("n"), Expression::integer(1));
        assert_eq!(expr.to_python(), "n - 1");
        assert_eq!(expr.to_python_compact(), "n-1");
    }

    #[test]
    fn test_literal_without_raw_renders_value() {
        let expr = Expression::Literal {
            value: LiteralValue::Text("a\"b".to_string()),
            raw: String::new(),
        };
        assert_eq!(expr.to_python(), "\"a\\\"b\"");
    }
}
