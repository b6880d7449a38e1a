//! Paragraph whitespace normalisation.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref NEWLINES: Regex = Regex::new(r"\n+").expect("valid newline regex");
    static ref WHITESPACE: Regex = Regex::new(r"\s+").expect("valid whitespace regex");
}

/// Collapse line breaks and whitespace runs into single spaces and trim.
pub fn normalize(paragraph: &str) -> String {
    let single_line = NEWLINES.replace_all(paragraph, " ");
    WHITESPACE.replace_all(&single_line, " ").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapses_newlines_and_spaces() {
        assert_eq!(
            normalize("Levels rose\n\n  sharply\tin\r\nweek two. "),
            "Levels rose sharply in week two."
        );
    }

    #[test]
    fn test_trims_and_handles_empty() {
        assert_eq!(normalize("   \n\n "), "");
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn test_unicode_whitespace() {
        assert_eq!(normalize("a\u{00A0}\u{2009}b"), "a b");
    }

    #[test]
    fn test_idempotent() {
        let once = normalize(" x \n y  z ");
        assert_eq!(normalize(&once), once);
    }
}
