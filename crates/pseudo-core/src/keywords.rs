//! Keyword vocabulary of the exam notation.
//!
//! Every keyword has a native (Japanese) spelling and the English
//! transliteration. Japanese keywords are matched as substrings, since the
//! notation does not separate them from neighbouring text; English keywords
//! are matched as whole words.

/// A keyword in both notations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Keyword {
    pub japanese: &'static str,
    pub english: &'static str,
}

impl Keyword {
    /// Whether the keyword occurs anywhere in `line`
    pub fn occurs_in(&self, line: &str) -> bool {
        line.contains(self.japanese) || contains_word(line, self.english)
    }

    /// Regex fragment matching either spelling
    pub fn pattern(&self) -> String {
        format!(
            r"(?:{}|\b{}\b)",
            regex::escape(self.japanese),
            regex::escape(self.english)
        )
    }
}

pub const ARRAY_TYPE: Keyword = Keyword { japanese: "配列", english: "array" };
pub const PROCEDURE: Keyword = Keyword { japanese: "手続き", english: "procedure" };
pub const IF: Keyword = Keyword { japanese: "もし", english: "if" };
pub const THEN: Keyword = Keyword { japanese: "ならば", english: "then" };
pub const ELSE: Keyword = Keyword { japanese: "そうでなければ", english: "else" };
pub const RETURN: Keyword = Keyword { japanese: "戻り値", english: "return" };

/// Counted-loop markers. The Japanese form is `i を a から b まで s ずつ増やす`.
pub const LOOP_FROM: Keyword = Keyword { japanese: "から", english: "from" };
pub const LOOP_TO: Keyword = Keyword { japanese: "まで", english: "to" };
pub const LOOP_STEP: Keyword = Keyword { japanese: "ずつ増やす", english: "step" };

/// Assignment arrow shared by both notations
pub const ASSIGN_ARROW: &str = "←";

/// Glyph operators and their Python spelling
pub const OPERATOR_GLYPHS: [(&str, &str); 4] = [("≠", "!="), ("≤", "<="), ("≥", ">="), ("←", "=")];

/// Translate a pseudo-code operator to Python; unknown operators pass through
pub fn python_operator(operator: &str) -> &str {
    OPERATOR_GLYPHS
        .iter()
        .find(|(glyph, _)| *glyph == operator)
        .map(|(_, python)| *python)
        .unwrap_or(operator)
}

/// A line that already ends in a block colon is in target form
pub fn is_normalized_header(line: &str) -> bool {
    line.trim_end().ends_with(':')
}

fn contains_word(line: &str, word: &str) -> bool {
    line.split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .any(|token| token == word)
}
