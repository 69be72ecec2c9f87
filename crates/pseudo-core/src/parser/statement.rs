// Line classification into statements

use once_cell::sync::Lazy;
use regex::Regex;

use super::expression::parse_expression;
use super::ParseError;
use crate::ast::{DataType, Expression, Parameter, Statement};
use crate::keywords::{
    is_normalized_header, ARRAY_TYPE, ASSIGN_ARROW, ELSE as ELSE_KW, PROCEDURE as PROCEDURE_KW,
    RETURN as RETURN_KW,
};

fn regex(pattern: &str) -> Regex {
    Regex::new(pattern).expect("built-in statement pattern must compile")
}

static DECLARATION: Lazy<Regex> =
    Lazy::new(|| regex(r"^(?:整数型|文字列型|整数|integer|string)\s*[:：]"));
static INTEGER_DECL: Lazy<Regex> = Lazy::new(|| regex(r"^(?:整数型|整数|integer)\s*[:：]\s*(\w+)"));
static STRING_DECL: Lazy<Regex> = Lazy::new(|| regex(r"^(?:文字列型|string)\s*[:：]\s*(\w+)"));

static ARRAY: Lazy<Regex> = Lazy::new(|| regex(&format!(r"^{}\s*[:：]", ARRAY_TYPE.pattern())));
static ARRAY_SIZED: Lazy<Regex> =
    Lazy::new(|| regex(r"^(?:配列|array)\s*[:：]\s*(\w+)\s*\((\d+)\)"));
static ARRAY_TYPED: Lazy<Regex> =
    Lazy::new(|| regex(r"^(?:配列|array)\s*[:：]\s*(\w+)\s*\([^)]*?,\s*(\d+)\)"));
static ARRAY_UNSIZED: Lazy<Regex> = Lazy::new(|| regex(r"^(?:配列|array)\s*[:：]\s*(\w+)\s*$"));

static PROCEDURE: Lazy<Regex> = Lazy::new(|| regex(&format!(r"^{}\s+", PROCEDURE_KW.pattern())));
static PROCEDURE_HEADER: Lazy<Regex> =
    Lazy::new(|| regex(r"^(?:手続き|procedure)\s+(\w+)\s*\((.*?)\)"));
static TYPED_PARAM: Lazy<Regex> = Lazy::new(|| regex(r"^([^:：]+)[:：]\s*(\w+)$"));
static BARE_PARAM: Lazy<Regex> = Lazy::new(|| regex(r"^(\w+)$"));

static IF: Lazy<Regex> = Lazy::new(|| regex(r"^(?:もし|if)\s+"));
static IF_JA: Lazy<Regex> = Lazy::new(|| regex(r"^もし\s+(.+?)\s*ならば"));
static IF_EN: Lazy<Regex> = Lazy::new(|| regex(r"^if\s+(.+?)\s+then\b"));

static ELSE: Lazy<Regex> = Lazy::new(|| regex(&format!("^{}", ELSE_KW.pattern())));

static LOOP_JA: Lazy<Regex> =
    Lazy::new(|| regex(r"(\w+)\s*を\s*(.+?)\s*から\s*(.+?)\s*まで\s*(\w+)\s*ずつ増やす"));
static LOOP_EN: Lazy<Regex> =
    Lazy::new(|| regex(r"^(?:for\s+)?(\w+)\s+from\s+(.+?)\s+to\s+(.+?)\s+step\s+(\S+)"));

static WHILE_JA: Lazy<Regex> = Lazy::new(|| regex(r"^(.+?)\s*の間[，,]\s*繰り返す$"));
static WHILE_EN: Lazy<Regex> = Lazy::new(|| regex(r"^while\s+(.+?)\s+do$"));

static RETURN: Lazy<Regex> = Lazy::new(|| regex(&format!(r"^{}\s+(.+)", RETURN_KW.pattern())));
static ASSIGNMENT: Lazy<Regex> =
    Lazy::new(|| regex(&format!(r"^(.+?)\s*{ASSIGN_ARROW}\s*(.+)$")));

/// Classify one trimmed, non-blank line
pub fn parse_statement(line: &str, number: usize) -> Result<Statement, ParseError> {
    // Already in target form: carried through as-is
    if is_normalized_header(line) {
        return Ok(verbatim(line, number));
    }

    if DECLARATION.is_match(line) {
        return parse_declaration(line, number);
    }
    if ARRAY.is_match(line) {
        return parse_array(line, number);
    }
    if PROCEDURE.is_match(line) {
        return parse_procedure(line, number);
    }
    if IF.is_match(line) {
        return parse_if(line, number);
    }
    if ELSE.is_match(line) {
        return Ok(verbatim("else:", number));
    }
    if let Some(caps) = LOOP_JA.captures(line).or_else(|| LOOP_EN.captures(line)) {
        return Ok(Statement::ForStatement {
            variable: caps[1].to_string(),
            start: parse_expression(&caps[2])?,
            end: parse_expression(&caps[3])?,
            step: parse_expression(&caps[4])?,
            body: Vec::new(),
            line: number,
        });
    }
    if let Some(caps) = WHILE_JA.captures(line).or_else(|| WHILE_EN.captures(line)) {
        return Ok(Statement::WhileStatement {
            condition: parse_expression(&caps[1])?,
            body: Vec::new(),
            line: number,
        });
    }
    if let Some(caps) = RETURN.captures(line) {
        return Ok(Statement::ReturnStatement {
            argument: parse_expression(&caps[1])?,
            line: number,
        });
    }
    if line.contains('←') {
        let caps = ASSIGNMENT
            .captures(line)
            .ok_or_else(|| ParseError::malformed("assignment", line))?;
        return Ok(Statement::Assignment {
            left: parse_expression(&caps[1])?,
            right: parse_expression(&caps[2])?,
            line: number,
        });
    }

    Ok(verbatim(line, number))
}

fn verbatim(text: &str, number: usize) -> Statement {
    Statement::ExpressionStatement {
        expression: Expression::verbatim(text),
        line: number,
    }
}

fn parse_declaration(line: &str, number: usize) -> Result<Statement, ParseError> {
    let (data_type, caps) = if let Some(caps) = INTEGER_DECL.captures(line) {
        (DataType::Integer, caps)
    } else if let Some(caps) = STRING_DECL.captures(line) {
        (DataType::String, caps)
    } else {
        return Err(ParseError::malformed("variable declaration", line));
    };

    // A comma list keeps only its first name
    Ok(Statement::VariableDeclaration {
        data_type,
        name: caps[1].to_string(),
        size: None,
        line: number,
    })
}

fn parse_array(line: &str, number: usize) -> Result<Statement, ParseError> {
    let (name, size) = if let Some(caps) = ARRAY_SIZED
        .captures(line)
        .or_else(|| ARRAY_TYPED.captures(line))
    {
        let size = caps[2]
            .parse::<usize>()
            .map_err(|_| ParseError::IntegerOverflow(caps[2].to_string()))?;
        (caps[1].to_string(), Some(size))
    } else if let Some(caps) = ARRAY_UNSIZED.captures(line) {
        (caps[1].to_string(), None)
    } else {
        return Err(ParseError::malformed("array declaration", line));
    };

    Ok(Statement::VariableDeclaration {
        data_type: DataType::Array,
        name,
        size,
        line: number,
    })
}

fn parse_procedure(line: &str, number: usize) -> Result<Statement, ParseError> {
    let caps = PROCEDURE_HEADER
        .captures(line)
        .ok_or_else(|| ParseError::malformed("procedure declaration", line))?;

    let parameters = caps[2]
        .split(',')
        .map(str::trim)
        .filter(|param| !param.is_empty())
        .filter_map(|param| {
            if let Some(typed) = TYPED_PARAM.captures(param) {
                Some(Parameter {
                    type_name: Some(typed[1].trim().to_string()),
                    name: typed[2].to_string(),
                })
            } else {
                BARE_PARAM.captures(param).map(|bare| Parameter {
                    type_name: None,
                    name: bare[1].to_string(),
                })
            }
        })
        .collect();

    Ok(Statement::ProcedureDeclaration {
        name: caps[1].to_string(),
        parameters,
        body: Vec::new(),
        line: number,
    })
}

fn parse_if(line: &str, number: usize) -> Result<Statement, ParseError> {
    let caps = IF_JA
        .captures(line)
        .or_else(|| IF_EN.captures(line))
        .ok_or_else(|| ParseError::malformed("if statement", line))?;

    Ok(Statement::IfStatement {
        condition: parse_expression(&caps[1])?,
        consequent: Vec::new(),
        alternate: None,
        line: number,
    })
}
