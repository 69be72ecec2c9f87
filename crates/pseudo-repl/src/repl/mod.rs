//! REPL (Read-Eval-Print Loop) functionality for the converter
//!
//! This module wraps the conversion engine with:
//! - Block input collection
//! - REPL commands (.help, .method, .steps, etc.)
//! - Output formatting and notifications

use anyhow::Result;
use pseudo_core::{convert, print_ast, ConversionOptions, ConversionResult, RuleCatalog};

pub mod commands;
pub mod multiline;
pub mod notifier;

pub use commands::ReplCommand;
pub use multiline::{BlockCollector, LineProcessResult};
pub use notifier::{DefaultNotifier, ReplNotifier};

/// Interactive pseudo-code converter
pub struct Repl {
    options: ConversionOptions,
    notifier: Box<dyn ReplNotifier>,
    running: bool,
    /// Suppress the summary line
    quiet: bool,
    /// Print the statement tree after each conversion
    show_ast: bool,
    last: Option<ConversionResult>,
}

impl Repl {
    pub fn new(options: ConversionOptions) -> Self {
        Self {
            options,
            notifier: Box::new(DefaultNotifier::new()),
            running: true,
            quiet: false,
            show_ast: false,
            last: None,
        }
    }

    /// Set the notifier for this REPL
    pub fn set_notifier(&mut self, notifier: Box<dyn ReplNotifier>) {
        self.notifier = notifier;
    }

    pub fn notifier(&self) -> &dyn ReplNotifier {
        self.notifier.as_ref()
    }

    pub fn options(&self) -> &ConversionOptions {
        &self.options
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_quiet(&self) -> bool {
        self.quiet
    }

    pub fn set_quiet(&mut self, quiet: bool) {
        self.quiet = quiet;
    }

    /// Result of the most recent conversion
    pub fn last_result(&self) -> Option<&ConversionResult> {
        self.last.as_ref()
    }

    /// Parse REPL input into a command
    pub fn parse_input(&self, input: &str) -> Result<ReplCommand> {
        commands::parse_command(input)
    }

    /// Handle a REPL command
    pub fn handle_command(&mut self, command: ReplCommand) -> Result<String> {
        match command {
            ReplCommand::Help => Ok(self.get_help_text()),
            ReplCommand::Quit => {
                self.running = false;
                Ok("Goodbye!".to_string())
            }
            ReplCommand::Quiet => {
                self.quiet = !self.quiet;
                Ok(format!("Quiet mode: {}", on_off(self.quiet)))
            }
            ReplCommand::Method(method) => {
                self.options.method = method;
                Ok(format!("Conversion method: {method}"))
            }
            ReplCommand::Steps => {
                self.options.include_debug_info = !self.options.include_debug_info;
                Ok(format!(
                    "Step trace: {}",
                    on_off(self.options.include_debug_info)
                ))
            }
            ReplCommand::Comments => {
                self.options.include_comments = !self.options.include_comments;
                Ok(format!("Comments: {}", on_off(self.options.include_comments)))
            }
            ReplCommand::Rules => Ok(self.list_rules()),
            ReplCommand::Ast => {
                self.show_ast = !self.show_ast;
                Ok(format!("Tree output: {}", on_off(self.show_ast)))
            }
            ReplCommand::Status => Ok(self.status()),
        }
    }

    /// Convert a block and report it through the notifier
    pub fn convert(&mut self, source: &str) -> Result<&ConversionResult> {
        let result = convert(source, &self.options);
        self.report(result)
    }

    /// Report a finished conversion: step trace, result, then the tree
    pub fn report(&mut self, result: ConversionResult) -> Result<&ConversionResult> {
        for step in &result.steps {
            self.notifier.on_output(&format!(
                "-- step {} [{}] {}\n{}",
                step.step_number, step.rule_applied, step.description, step.output_text
            ));
        }
        self.notifier.on_result(&result, self.quiet);

        if self.show_ast {
            if let Some(program) = &result.metadata.ast {
                self.notifier.on_output(&print_ast(program)?);
            }
        }

        Ok(self.last.insert(result))
    }

    fn list_rules(&self) -> String {
        let catalog = RuleCatalog::global();
        let rows = RuleCatalog::sort_by_priority(&catalog.all().iter().collect::<Vec<_>>())
            .into_iter()
            .map(|rule| {
                let state = if rule.enabled { "" } else { " (disabled)" };
                format!(
                    "  {:<28} {:>4}  {:<20} {}{}",
                    rule.id,
                    rule.priority,
                    rule.category.to_string(),
                    rule.name,
                    state
                )
            })
            .collect::<Vec<_>>()
            .join("\n");
        format!("Rules ({}):\n{}", catalog.len(), rows)
    }

    fn status(&self) -> String {
        format!(
            "Method: {}\n  Indent: {}\n  Comments: {}\n  Step trace: {}\n  Validate output: {}\n  Tree output: {}\n  Quiet: {}",
            self.options.method,
            self.options.indent_size,
            on_off(self.options.include_comments),
            on_off(self.options.include_debug_info),
            on_off(self.options.validate_output),
            on_off(self.show_ast),
            on_off(self.quiet)
        )
    }

    fn get_help_text(&self) -> String {
        r#"Pseudo REPL Commands:
  .help            - Show this help message
  .quit            - Exit the REPL
  .method <name>   - Conversion method: pattern, tree or hybrid
  .steps           - Toggle the step trace
  .comments        - Toggle comments in generated code
  .rules           - List the conversion rules
  .ast             - Toggle printing the statement tree
  .status          - Show current settings
  .quiet           - Toggle quiet mode (hide the summary line)

Enter pseudo-code line by line; a blank line or '.' converts the block.

Notation (Japanese or English):
  整数型：x       / integer: x
  配列：A(10)     / array: A(10)
  x ← 1
  もし c ならば   / if c then
  そうでなければ  / else
  c の間，繰り返す / while c do
  i を 0 から 9 まで 1 ずつ増やす / for i from 0 to 9 step 1
  手続き f(整数: a) / procedure f(integer: a)
  戻り値 x        / return x"#
            .to_string()
    }

    /// Show exit statistics
    pub fn show_exit_stats(&self) {
        if !self.quiet {
            println!("\nSession complete.");
        }
    }
}

fn on_off(flag: bool) -> &'static str {
    if flag {
        "on"
    } else {
        "off"
    }
}
