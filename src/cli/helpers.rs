//! Shared helper functions for CLI commands
//!
//! This module contains utility functions that are used across multiple
//! command modules to avoid code duplication.

/// Truncate a string to max_len characters, adding "..." if truncated
///
/// Useful for table columns that need fixed-width output.
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Escape a string for CSV output
///
/// Handles commas, quotes, and newlines according to RFC 4180.
pub fn escape_csv(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

/// Escape a value for a TSV cell (tabs and newlines become spaces)
pub fn escape_tsv(s: &str) -> String {
    s.replace(['\t', '\n'], " ")
}

/// Format an optional amount with its currency, e.g. "12.50 EUR"
pub fn format_price(amount: Option<f64>, currency: &str) -> String {
    match amount {
        Some(value) => format!("{:.2} {}", value, currency),
        None => "-".to_string(),
    }
}

/// Axis label "Title (ID)", or just the id when no title is known
pub fn axis_label(id: &str, title: Option<&str>) -> String {
    match title {
        Some(t) if !t.is_empty() && t != id => format!("{} ({})", t, id),
        _ => id.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_str() {
        assert_eq!(truncate_str("hello", 10), "hello");
        assert_eq!(truncate_str("hello world", 8), "hello...");
        assert_eq!(truncate_str("hi", 2), "hi");
        assert_eq!(truncate_str("Bremsbeläge vorne", 8), "Brems...");
    }

    #[test]
    fn test_escape_csv() {
        assert_eq!(escape_csv("simple"), "simple");
        assert_eq!(escape_csv("with,comma"), "\"with,comma\"");
        assert_eq!(escape_csv("with\"quote"), "\"with\"\"quote\"");
        assert_eq!(escape_csv("with\nnewline"), "\"with\nnewline\"");
    }

    #[test]
    fn test_escape_tsv() {
        assert_eq!(escape_tsv("a\tb\nc"), "a b c");
    }

    #[test]
    fn test_format_price() {
        assert_eq!(format_price(Some(12.5), "EUR"), "12.50 EUR");
        assert_eq!(format_price(None, "EUR"), "-");
    }

    #[test]
    fn test_axis_label() {
        assert_eq!(axis_label("C1", Some("Brakes")), "Brakes (C1)");
        assert_eq!(axis_label("C1", Some("")), "C1");
        assert_eq!(axis_label("C1", Some("C1")), "C1");
        assert_eq!(axis_label("C1", None), "C1");
    }
}
