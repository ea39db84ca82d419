use std::sync::LazyLock;

use regex::Regex;

use logspan_types::LogLevel;

// One alternation over every known alias, whole words, case-insensitive.
// Word boundaries keep "info" from matching inside "informational".
static LEVEL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    let aliases = LogLevel::ALIASES
        .iter()
        .map(|(alias, _)| *alias)
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(r"(?i)\b({})\b", aliases)).expect("level pattern must compile")
});

/// Detect the severity of a raw log line.
///
/// The earliest level word in the line wins, so a message like
/// `info: retrying after error` classifies as info.
pub fn detect_level(entry: &str) -> LogLevel {
    match LEVEL_PATTERN.find(entry) {
        Some(found) => LogLevel::from_alias(found.as_str()).unwrap_or(LogLevel::Unknown),
        None => LogLevel::Unknown,
    }
}
