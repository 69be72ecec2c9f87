// Tree produced by the pseudo-code parser and consumed by the Python generator

use std::fmt;

use serde::{Deserialize, Serialize};

/// Declared type of a variable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    /// integer: x
    Integer,
    /// string: s
    String,
    /// array: A(10)
    Array,
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataType::Integer => write!(f, "integer"),
            DataType::String => write!(f, "string"),
            DataType::Array => write!(f, "array"),
        }
    }
}

/// Procedure parameter; the declared type is dropped on generation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub type_name: Option<String>,
    pub name: String,
}

/// Value carried by a literal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LiteralValue {
    Integer(i64),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Expression {
    Identifier {
        name: String,
    },
    /// `raw` is the source text the literal was read from
    Literal {
        value: LiteralValue,
        raw: String,
    },
    BinaryExpression {
        operator: String,
        left: Box<Expression>,
        right: Box<Expression>,
    },
    ArrayAccess {
        object: Box<Expression>,
        property: Box<Expression>,
    },
    FunctionCall {
        callee: Box<Expression>,
        arguments: Vec<Expression>,
    },
}

impl Expression {
    pub fn identifier(name: impl Into<String>) -> Self {
        Expression::Identifier { name: name.into() }
    }

    pub fn integer(value: i64) -> Self {
        Expression::Literal {
            value: LiteralValue::Integer(value),
            raw: value.to_string(),
        }
    }

    /// String literal; `raw` gets the surrounding quotes
    pub fn string(value: impl Into<String>) -> Self {
        let value = value.into();
        Expression::Literal {
            raw: format!("\"{value}\""),
            value: LiteralValue::Text(value),
        }
    }

    /// Opaque source text carried through unchanged
    pub fn verbatim(text: impl Into<String>) -> Self {
        let text = text.into();
        Expression::Literal {
            value: LiteralValue::Text(text.clone()),
            raw: text,
        }
    }

    pub fn binary(operator: impl Into<String>, left: Expression, right: Expression) -> Self {
        Expression::BinaryExpression {
            operator: operator.into(),
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn index(object: Expression, property: Expression) -> Self {
        Expression::ArrayAccess {
            object: Box::new(object),
            property: Box::new(property),
        }
    }

    pub fn call(callee: Expression, arguments: Vec<Expression>) -> Self {
        Expression::FunctionCall {
            callee: Box::new(callee),
            arguments,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Statement {
    VariableDeclaration {
        data_type: DataType,
        name: String,
        size: Option<usize>,
        line: usize,
    },
    Assignment {
        left: Expression,
        right: Expression,
        line: usize,
    },
    IfStatement {
        condition: Expression,
        consequent: Vec<Statement>,
        alternate: Option<Vec<Statement>>,
        line: usize,
    },
    ForStatement {
        variable: String,
        start: Expression,
        end: Expression,
        step: Expression,
        body: Vec<Statement>,
        line: usize,
    },
    WhileStatement {
        condition: Expression,
        body: Vec<Statement>,
        line: usize,
    },
    ProcedureDeclaration {
        name: String,
        parameters: Vec<Parameter>,
        body: Vec<Statement>,
        line: usize,
    },
    ReturnStatement {
        argument: Expression,
        line: usize,
    },
    ExpressionStatement {
        expression: Expression,
        line: usize,
    },
}

impl Statement {
    /// Source line (1-based) the statement was read from
    pub fn line(&self) -> usize {
        match self {
            Statement::VariableDeclaration { line, .. }
            | Statement::Assignment { line, .. }
            | Statement::IfStatement { line, .. }
            | Statement::ForStatement { line, .. }
            | Statement::WhileStatement { line, .. }
            | Statement::ProcedureDeclaration { line, .. }
            | Statement::ReturnStatement { line, .. }
            | Statement::ExpressionStatement { line, .. } => *line,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Statement::VariableDeclaration { .. } => "VariableDeclaration",
            Statement::Assignment { .. } => "Assignment",
            Statement::IfStatement { .. } => "IfStatement",
            Statement::ForStatement { .. } => "ForStatement",
            Statement::WhileStatement { .. } => "WhileStatement",
            Statement::ProcedureDeclaration { .. } => "ProcedureDeclaration",
            Statement::ReturnStatement { .. } => "ReturnStatement",
            Statement::ExpressionStatement { .. } => "ExpressionStatement",
        }
    }

    /// Contribution to the program complexity score
    pub fn complexity(&self) -> u32 {
        match self {
            Statement::ProcedureDeclaration { .. } => 2,
            Statement::IfStatement { .. }
            | Statement::ForStatement { .. }
            | Statement::WhileStatement { .. } => 1,
            _ => 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableInfo {
    pub name: String,
    #[serde(rename = "type")]
    pub data_type: DataType,
    pub size: Option<usize>,
    pub line: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProgramMetadata {
    /// Non-blank lines seen by the parser
    pub total_lines: usize,
    pub complexity: u32,
    pub procedures: Vec<String>,
    pub variables: Vec<VariableInfo>,
}

/// Root of a parsed pseudo-code program
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Program {
    pub body: Vec<Statement>,
    pub metadata: ProgramMetadata,
}

impl Program {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a statement, folding it into the metadata
    pub fn push(&mut self, statement: Statement) {
        match &statement {
            Statement::VariableDeclaration {
                data_type,
                name,
                size,
                line,
            } => self.metadata.variables.push(VariableInfo {
                name: name.clone(),
                data_type: *data_type,
                size: *size,
                line: *line,
            }),
            Statement::ProcedureDeclaration { name, .. } => {
                self.metadata.procedures.push(name.clone())
            }
            _ => {}
        }
        self.metadata.complexity += statement.complexity();
        self.body.push(statement);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_collects_metadata() {
        let mut program = Program::new();
        program.push(Statement::VariableDeclaration {
            data_type: DataType::Array,
            name: "A".to_string(),
            size: Some(5),
            line: 1,
        });
        program.push(Statement::ProcedureDeclaration {
            name: "sort".to_string(),
            parameters: Vec::new(),
            body: Vec::new(),
            line: 2,
        });
        program.push(Statement::WhileStatement {
            condition: Expression::identifier("done"),
            body: Vec::new(),
            line: 3,
        });

        assert_eq!(program.metadata.complexity, 3);
        assert_eq!(program.metadata.procedures, vec!["sort".to_string()]);
        assert_eq!(program.metadata.variables.len(), 1);
        assert_eq!(program.metadata.variables[0].size, Some(5));
        assert_eq!(program.body[2].line(), 3);
    }

    #[test]
    fn test_statement_serializes_with_type_tag() {
        let statement = Statement::ReturnStatement {
            argument: Expression::integer(1),
            line: 4,
        };
        let json = serde_json::to_value(&statement).unwrap();
        assert_eq!(json["type"], "ReturnStatement");
        assert_eq!(json["argument"]["type"], "Literal");
        assert_eq!(json["argument"]["value"], 1);
    }
}
