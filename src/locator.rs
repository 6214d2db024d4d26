// src/locator.rs
use regex::Regex;
use std::sync::OnceLock;

/// Largest line number accepted from an error message.
pub const MAX_LINE_NUMBER: u32 = 10_000_000;

fn line_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"Line (\d+):").expect("line pattern is a valid regex"))
}

/// Extracts the 1-based source line from an error message such as
/// `"Line 3: unsupported token '#'"`.
///
/// Only the first `Line <digits>:` occurrence is considered. A missing pattern
/// or a number above [`MAX_LINE_NUMBER`] yields `None`.
pub fn locate(message: &str) -> Option<u32> {
    let caps = line_pattern().captures(message)?;
    let line: u32 = caps[1].parse().ok()?;
    (line <= MAX_LINE_NUMBER).then_some(line)
}
