//! Pseudo REPL - Interactive command-line interface for the pseudo-code
//! converter
//!
//! This crate provides the REPL and file front end over `pseudo-core`,
//! including command parsing, block input handling and options loading.

pub mod options;
pub mod repl;

// Re-export commonly used types for convenience
pub use options::{convert_file, load_options, resolve_options, CliOverrides};
pub use repl::{BlockCollector, DefaultNotifier, LineProcessResult, Repl, ReplCommand, ReplNotifier};
