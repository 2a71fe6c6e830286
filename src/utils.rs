use crate::regex::Regex;
use std::sync::LazyLock;

// Unicode White_Space; `\s` is ASCII-only under regex-lite.
static WHITESPACE_RUN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"[\t\n\x0B\x0C\r\x20\x{85}\x{A0}\x{1680}\x{2000}-\x{200A}\x{2028}\x{2029}\x{202F}\x{205F}\x{3000}]+",
    )
    .unwrap()
});

/// Trims a field value and collapses internal whitespace runs (including line
/// breaks) to a single space.
///
/// # Arguments
///
/// * `value` - The raw value text
pub fn collapse_whitespace(value: &str) -> String {
    WHITESPACE_RUN.replace_all(value.trim(), " ").into_owned()
}

/// Lowercases text for case-insensitive substring matching.
pub fn fold_case(text: &str) -> String {
    text.to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("plain", "plain")]
    #[case("  padded  ", "padded")]
    #[case("two\n  lines", "two lines")]
    #[case("tabs\t\tand  spaces", "tabs and spaces")]
    #[case("", "")]
    #[case("no\u{A0}break", "no break")]
    #[case("line\u{2028}\u{3000} separator", "line separator")]
    fn test_collapse_whitespace(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(collapse_whitespace(input), expected);
    }

    #[rstest]
    #[case("a\u{85}b\u{1680}c\u{2009}d\u{202F}e\u{205F}f\u{2029}g")]
    #[case(" \u{A0}lead and trail\u{2000}\u{200A} ")]
    fn test_collapse_whitespace_agrees_with_char_whitespace(#[case] input: &str) {
        let expected = input.split_whitespace().collect::<Vec<_>>().join(" ");
        assert_eq!(collapse_whitespace(input), expected);
    }

    #[test]
    fn test_fold_case() {
        assert_eq!(fold_case("Elsevier"), "elsevier");
        assert_eq!(fold_case("ÉCOLE"), "école");
    }
}
