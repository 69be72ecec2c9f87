// Re-indentation of rule-rewritten text

use crate::generator::MAX_INDENT_SIZE;

/// Deepest block nesting that is rendered; deeper headers keep this level
pub const MAX_BLOCK_DEPTH: usize = 100;

/// Rebuild indentation from block colons.
///
/// Every colon-terminated line opens a block. `else:` and `elif` lines close
/// the current block before reopening one at the same depth. Nothing else
/// ever closes a block, so this only recovers nesting for straight-line
/// bodies.
pub fn reindent(code: &str, indent_size: usize) -> String {
    let indent_size = indent_size.min(MAX_INDENT_SIZE);
    let mut level = 0usize;
    let mut lines = Vec::new();

    for line in code.split('\n') {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            lines.push(String::new());
            continue;
        }

        if trimmed == "else:" || trimmed.starts_with("elif ") {
            level = level.saturating_sub(1);
        }
        lines.push(format!("{}{}", " ".repeat(level * indent_size), trimmed));
        if trimmed.ends_with(':') {
            level = (level + 1).min(MAX_BLOCK_DEPTH);
        }
    }

    lines.join("\n")
}
