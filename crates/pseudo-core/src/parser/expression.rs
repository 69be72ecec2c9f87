// Expression parsing
//
// Precedence is shallow: the first operator of OPERATORS that occurs at
// bracket depth zero splits the expression once, and each side is parsed
// recursively. Every level of recursion consumes an operator or a bracket,
// so the nesting budget is checked once up front by counting those.

use once_cell::sync::Lazy;
use regex::Regex;

use super::ParseError;
use crate::ast::Expression;

/// Most operators and brackets a single expression may contain
pub const MAX_NESTING: usize = 256;

/// Operators in the order they are tried
pub const OPERATORS: [&str; 15] = [
    "≠", "!=", "≤", "<=", "≥", ">=", "<", ">", "==", "+", "-", "*", "//", "/", "%",
];

static INTEGER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+$").expect("valid integer pattern"));
static INDEXED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\w+)\[").expect("valid array access pattern"));
static CALL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\w+)\((.*)\)$").expect("valid call pattern"));

pub fn parse_expression(text: &str) -> Result<Expression, ParseError> {
    let nesting = nesting_units(text);
    if nesting > MAX_NESTING {
        return Err(ParseError::TooDeep {
            nesting,
            limit: MAX_NESTING,
        });
    }
    parse_nested(text)
}

fn parse_nested(text: &str) -> Result<Expression, ParseError> {
    let expr = text.trim();

    if INTEGER.is_match(expr) {
        let value = expr
            .parse::<i64>()
            .map_err(|_| ParseError::IntegerOverflow(expr.to_string()))?;
        return Ok(Expression::integer(value));
    }

    if expr.len() >= 2 && expr.starts_with('"') && expr.ends_with('"') {
        return Ok(Expression::string(&expr[1..expr.len() - 1]));
    }

    if let Some(caps) = INDEXED.captures(expr) {
        let open = caps[0].len() - 1;
        if closing_bracket(expr, open) == Some(expr.len() - 1) {
            let property = parse_nested(&expr[open + 1..expr.len() - 1])?;
            return Ok(Expression::index(Expression::identifier(&caps[1]), property));
        }
    }

    if let Some((operator, at)) = split_point(expr) {
        let left = parse_nested(&expr[..at])?;
        let right = parse_nested(&expr[at + operator.len()..])?;
        return Ok(Expression::binary(operator, left, right));
    }

    if let Some(caps) = CALL.captures(expr) {
        let arguments = split_arguments(&caps[2])
            .into_iter()
            .map(parse_nested)
            .collect::<Result<Vec<_>, _>>()?;
        return Ok(Expression::call(Expression::identifier(&caps[1]), arguments));
    }

    Ok(Expression::identifier(expr))
}

/// Byte index of the `]` matching the `[` at `open`
fn closing_bracket(expr: &str, open: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (i, c) in expr[open..].char_indices() {
        match c {
            '[' => depth += 1,
            ']' => {
                depth -= 1;
                if depth == 0 {
                    return Some(open + i);
                }
            }
            _ => {}
        }
    }
    None
}

/// Operator characters and opening brackets outside string literals
fn nesting_units(expr: &str) -> usize {
    let mut in_string = false;
    let mut count = 0;
    for c in expr.chars() {
        match c {
            '"' => in_string = !in_string,
            '(' | '[' | '≠' | '≤' | '≥' | '!' | '<' | '>' | '=' | '+' | '-' | '*' | '/' | '%'
                if !in_string =>
            {
                count += 1
            }
            _ => {}
        }
    }
    count
}

/// The first operator of [`OPERATORS`] with a top-level occurrence past the
/// start of `expr`, and the byte index of its first such occurrence.
///
/// One scan records the first position of every operator, outside brackets
/// and string literals.
fn split_point(expr: &str) -> Option<(&'static str, usize)> {
    let mut first: [Option<usize>; OPERATORS.len()] = [None; OPERATORS.len()];
    let mut depth = 0i32;
    let mut in_string = false;
    for (i, c) in expr.char_indices() {
        match c {
            '"' => in_string = !in_string,
            '(' | '[' if !in_string => depth += 1,
            ')' | ']' if !in_string => depth -= 1,
            _ if !in_string && depth == 0 => {
                let rest = &expr[i..];
                for (slot, operator) in first.iter_mut().zip(OPERATORS) {
                    if slot.is_none() && rest.starts_with(operator) {
                        *slot = Some(i);
                    }
                }
            }
            _ => {}
        }
    }

    OPERATORS
        .iter()
        .zip(first)
        .find_map(|(operator, at)| at.filter(|&at| at > 0).map(|at| (*operator, at)))
}

/// Split call arguments on top-level commas
fn split_arguments(args: &str) -> Vec<&str> {
    if args.trim().is_empty() {
        return Vec::new();
    }

    let mut parts = Vec::new();
    let mut depth = 0i32;
    let mut in_string = false;
    let mut start = 0;
    for (i, c) in args.char_indices() {
        match c {
            '"' => in_string = !in_string,
            '(' | '[' if !in_string => depth += 1,
            ')' | ']' if !in_string => depth -= 1,
            ',' if !in_string && depth == 0 => {
                parts.push(&args[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&args[start..]);
    parts
}
