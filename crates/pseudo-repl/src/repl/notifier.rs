//! Output notification system for the REPL
//!
//! Provides a trait-based system for handling REPL output, allowing different
//! output backends (console, file, test capture) to be plugged in.

use pseudo_core::{ConversionResult, Severity};

/// Trait for handling REPL output notifications
pub trait ReplNotifier: Send + Sync {
    /// Handle regular output
    fn on_output(&self, content: &str);

    /// Handle error output
    fn on_error(&self, content: &str);

    /// Handle a finished conversion
    fn on_result(&self, result: &ConversionResult, quiet: bool);
}

/// Default console-based notifier
///
/// Generated code goes to stdout; diagnostics and the summary line go to
/// stderr so the code can be piped.
pub struct DefaultNotifier;

impl DefaultNotifier {
    pub fn new() -> Self {
        Self
    }
}

impl ReplNotifier for DefaultNotifier {
    fn on_output(&self, content: &str) {
        if !content.is_empty() {
            println!("{}", content);
        }
    }

    fn on_error(&self, content: &str) {
        eprintln!("{}", content);
    }

    fn on_result(&self, result: &ConversionResult, quiet: bool) {
        if !result.code.is_empty() {
            println!("{}", result.code);
        }

        for line in describe_diagnostics(result) {
            eprintln!("{}", line);
        }

        if !quiet {
            eprintln!("{}", summary(result));
        }
    }
}

impl Default for DefaultNotifier {
    fn default() -> Self {
        Self::new()
    }
}

/// One line per error and warning, errors first
pub fn describe_diagnostics(result: &ConversionResult) -> Vec<String> {
    let errors = result.errors.iter().map(|e| {
        let label = match e.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        format!("{label}: line {}: {}", e.line, e.message)
    });
    let warnings = result.warnings.iter().map(|w| {
        let mut text = format!("warning: line {}: {}", w.line, w.message);
        if let Some(suggestion) = &w.suggestion {
            text.push_str(&format!(" ({suggestion})"));
        }
        text
    });
    errors.chain(warnings).collect()
}

/// Summary line: strategy, rules applied, complexity and timing
pub fn summary(result: &ConversionResult) -> String {
    let status = if result.success { "ok" } else { "failed" };
    format!(
        "=> {} [{}] {} rules, complexity {} ({}ms)",
        status,
        result.metadata.method,
        result.metadata.rules_applied,
        result.metadata.complexity_score,
        result.metadata.conversion_time.as_millis()
    )
}
