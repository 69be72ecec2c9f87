//! REPL command parsing and definitions
//!
//! Handles parsing of dot-commands (.help, .quit, .method, etc.).

use anyhow::{anyhow, Result};
use pseudo_core::ConversionMethod;

/// Available REPL commands
#[derive(Debug, Clone, PartialEq)]
pub enum ReplCommand {
    /// Show help information
    Help,
    /// Exit the REPL
    Quit,
    /// Toggle quiet mode
    Quiet,
    /// Select the conversion strategy
    Method(ConversionMethod),
    /// Toggle the step trace
    Steps,
    /// Toggle comments in generated code
    Comments,
    /// List the rule catalog
    Rules,
    /// Toggle printing the statement tree after each conversion
    Ast,
    /// Show the current settings
    Status,
}

/// Parse a command string into a ReplCommand
pub fn parse_command(input: &str) -> Result<ReplCommand> {
    let trimmed = input.trim();

    let Some(body) = trimmed.strip_prefix('.') else {
        return Err(anyhow!("Commands must start with '.'"));
    };

    let parts: Vec<&str> = body.split_whitespace().collect();

    if parts.is_empty() {
        return Err(anyhow!("Empty command"));
    }

    match parts[0] {
        "help" | "h" => Ok(ReplCommand::Help),
        "quit" | "q" | "exit" => Ok(ReplCommand::Quit),
        "quiet" => Ok(ReplCommand::Quiet),
        "method" | "m" => {
            if parts.len() != 2 {
                return Err(anyhow!("Usage: .method <pattern|tree|hybrid>"));
            }
            Ok(ReplCommand::Method(parts[1].parse()?))
        }
        "steps" | "trace" => Ok(ReplCommand::Steps),
        "comments" => Ok(ReplCommand::Comments),
        "rules" => Ok(ReplCommand::Rules),
        "ast" | "tree" => Ok(ReplCommand::Ast),
        "status" => Ok(ReplCommand::Status),
        _ => Err(anyhow!("Unknown command: .{}", parts[0])),
    }
}
