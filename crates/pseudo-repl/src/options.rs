//! Conversion options from a JSON file and command-line overrides

use std::{fs, path::Path};

use anyhow::{Context, Result};
use pseudo_core::{
    ConversionMethod, ConversionOptions, ConversionResult, PseudoConfig, MAX_INDENT_SIZE,
};
use tracing::warn;

/// Settings given on the command line; `None` leaves the base value alone
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub method: Option<ConversionMethod>,
    pub indent_size: Option<usize>,
    pub include_comments: bool,
    pub include_debug_info: bool,
    pub no_validate: bool,
}

impl CliOverrides {
    /// Apply the overrides on top of `options`
    pub fn apply(&self, mut options: ConversionOptions) -> ConversionOptions {
        if let Some(method) = self.method {
            options.method = method;
        }
        if let Some(indent_size) = self.indent_size {
            options.indent_size = indent_size;
        }
        if self.include_comments {
            options.include_comments = true;
        }
        if self.include_debug_info {
            options.include_debug_info = true;
        }
        if self.no_validate {
            options.validate_output = false;
        }
        options
    }
}

/// Read options from a JSON file; missing fields take their defaults
pub fn load_options(path: &Path) -> Result<ConversionOptions> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read options file {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Invalid options file {}", path.display()))
}

/// Base options (file or built-in defaults) with the overrides applied
pub fn resolve_options(
    options_file: Option<&Path>,
    config: &PseudoConfig,
    overrides: &CliOverrides,
) -> Result<ConversionOptions> {
    let base = match options_file {
        Some(path) => load_options(path)?,
        None => config.conversion_options(),
    };
    let mut options = overrides.apply(base);
    if options.indent_size > MAX_INDENT_SIZE {
        warn!(
            requested = options.indent_size,
            max = MAX_INDENT_SIZE,
            "indent size clamped"
        );
        options.indent_size = MAX_INDENT_SIZE;
    }
    Ok(options)
}

/// Convert a pseudo-code file
pub fn convert_file(path: &Path, options: &ConversionOptions) -> Result<ConversionResult> {
    let source = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(pseudo_core::convert(&source, options))
}
