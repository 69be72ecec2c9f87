//! Block collection for the REPL
//!
//! Pseudo-code is converted a block at a time. Lines are collected until a
//! blank line or a lone `.` terminates the block.

/// Result of processing a line of input
#[derive(Debug, PartialEq)]
pub enum LineProcessResult {
    /// Block is complete and ready for conversion
    Complete(String),
    /// More input is needed
    NeedMore,
}

/// Collects lines into a pseudo-code block
#[derive(Debug, Default)]
pub struct BlockCollector {
    lines: Vec<String>,
}

impl BlockCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the appropriate prompt for the current state
    pub fn get_prompt(&self) -> &'static str {
        if self.is_collecting() {
            ".. "
        } else {
            ">> "
        }
    }

    pub fn is_collecting(&self) -> bool {
        !self.lines.is_empty()
    }

    pub fn reset(&mut self) {
        self.lines.clear();
    }

    /// Process a line of input
    pub fn process_line(&mut self, line: &str) -> LineProcessResult {
        let trimmed = line.trim();
        let terminator = trimmed.is_empty() || trimmed == ".";

        if !terminator {
            // Indentation is kept; the pattern strategy rebuilds it anyway
            self.lines.push(line.trim_end().to_string());
            return LineProcessResult::NeedMore;
        }

        if self.lines.is_empty() {
            return LineProcessResult::NeedMore;
        }

        let block = self.lines.join("\n");
        self.reset();
        LineProcessResult::Complete(block)
    }
}
