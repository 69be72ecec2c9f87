// Cleanup pass over generated Python text

use once_cell::sync::Lazy;
use regex::Regex;

static BLANK_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n\s*\n\s*\n").expect("valid blank-run pattern"));
static TRAILING_WS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)[ \t]+$").expect("valid trailing-whitespace pattern"));
static ZERO_INIT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*(\w+)\s*=\s*0$").expect("valid zero-init pattern"));

/// Collapse blank-line runs, strip trailing whitespace and fold each pair
/// of identical consecutive zero-initializations into one.
///
/// Pairs do not overlap: three repeated lines become two.
pub fn optimize(code: &str) -> String {
    let collapsed = BLANK_RUN.replace_all(code, "\n\n");
    let stripped = TRAILING_WS.replace_all(&collapsed, "");

    let lines: Vec<&str> = stripped.split('\n').collect();
    let mut kept: Vec<&str> = Vec::with_capacity(lines.len());
    let mut i = 0;
    while i < lines.len() {
        kept.push(lines[i]);
        let paired = lines
            .get(i + 1)
            .is_some_and(|next| same_zero_init(lines[i], next));
        i += if paired { 2 } else { 1 };
    }
    kept.join("\n")
}

fn same_zero_init(first: &str, second: &str) -> bool {
    match (ZERO_INIT.captures(first), ZERO_INIT.captures(second)) {
        (Some(a), Some(b)) => a[1] == b[1],
        _ => false,
    }
}
