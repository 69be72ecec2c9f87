//! # Pseudo Core
//!
//! Translation engine for the keyword-driven pseudo-language of the IPA
//! certification exam, producing Python source text. The crate provides:
//! - a prioritized text-rewriting rule catalog
//! - a line-oriented parser building a statement/expression tree
//! - a tree-driven Python generator with lint and cleanup passes
//! - a converter composing them into pattern, tree and hybrid strategies
//!
//! Execution of the generated code, problem banks and presentation are left
//! to the callers.

#![warn(clippy::all)]

pub mod ast;
pub mod converter;
pub mod generator;
pub mod keywords;
pub mod parser;
pub mod rules;

// Re-export commonly used types
pub use ast::{DataType, Expression, LiteralValue, Parameter, Program, ProgramMetadata, Statement, VariableInfo};
pub use converter::{
    convert, convert_with_steps, validate_conversion, ConversionDiagnostic, ConversionMetadata,
    ConversionMethod, ConversionOptions, ConversionResult, ConversionStep, ConversionWarning,
    TransformationKind, UnknownMethod, ValidationResult, WarningKind,
};
pub use generator::{GenerationOptions, GenerationResult, PythonGenerator, MAX_INDENT_SIZE};
pub use parser::{parse, print_ast, validate_syntax, Severity, SyntaxIssue};
pub use rules::{Rule, RuleCatalog, RuleCategory, RuleSummary};

/// Engine version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize tracing for the translation engine
pub fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("pseudo_core=info"));

    // A subscriber may already be installed by the embedding application.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Front-end configuration shared by the command-line tools
#[derive(Debug, Clone)]
pub struct PseudoConfig {
    /// Strategy used when none is requested explicitly
    pub default_method: ConversionMethod,
    /// Spaces per indentation level in generated code
    pub indent_size: usize,
    /// Enable debug mode (step traces, tree dumps)
    pub debug: bool,
}

impl Default for PseudoConfig {
    fn default() -> Self {
        Self {
            default_method: ConversionMethod::Hybrid,
            indent_size: 4,
            debug: false,
        }
    }
}

impl PseudoConfig {
    /// Conversion options derived from this configuration
    pub fn conversion_options(&self) -> ConversionOptions {
        ConversionOptions {
            method: self.default_method,
            indent_size: self.indent_size,
            include_debug_info: self.debug,
            ..Default::default()
        }
    }
}

/// Error types for pipeline-level failures
///
/// Per-line parse failures and per-statement generation failures are
/// recovered locally; only what escapes them ends up here, and
/// [`convert`] turns any of these into a failed [`ConversionResult`].
#[derive(thiserror::Error, Debug)]
pub enum PseudoError {
    /// Step trace serialization failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A panic was caught inside the pipeline
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type for pipeline-level operations
pub type Result<T> = std::result::Result<T, PseudoError>;
