//! Boilerplate section filter.
//!
//! Trailing administrative sections (references, declarations, footnotes)
//! are recognised by a fixed stop list matched case-insensitively as a
//! substring.

/// Section names that end the body content of an article.
pub const STOP_SECTIONS: &[&str] = &[
    "Author Contributions",
    "Ethics Statement",
    "Conflicts of Interest",
    "Data Availability Statement",
    "Data availability",
    "Footnotes",
    "References",
    "Human subjects",
    "Payment/services info",
    "Financial relationships",
    "Other relationships",
];

/// True if a heading marks the start of an excluded trailing section.
/// Blank headings never do.
pub fn is_stop_heading(text: &str) -> bool {
    let heading = text.trim();
    if heading.is_empty() {
        return false;
    }
    contains_stop_phrase(heading)
}

/// True if `text` mentions any stop-list phrase anywhere.
pub fn contains_stop_phrase(text: &str) -> bool {
    let lower = text.to_lowercase();
    STOP_SECTIONS
        .iter()
        .any(|stop| lower.contains(&stop.to_lowercase()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stop_heading_case_insensitive() {
        assert!(is_stop_heading("References"));
        assert!(is_stop_heading("  REFERENCES "));
        assert!(is_stop_heading("Supplementary references"));
        assert!(is_stop_heading("Conflicts of interest"));
        assert!(is_stop_heading("Payment/Services Info"));
    }

    #[test]
    fn test_body_headings_are_not_stop_headings() {
        assert!(!is_stop_heading("Introduction"));
        assert!(!is_stop_heading("Materials and Methods"));
        assert!(!is_stop_heading("Results"));
    }

    #[test]
    fn test_empty_heading_is_never_stop() {
        assert!(!is_stop_heading(""));
        assert!(!is_stop_heading("   \n\t"));
    }

    #[test]
    fn test_contains_stop_phrase_anywhere() {
        assert!(contains_stop_phrase(
            "All data generated are listed in the data availability section of this report."
        ));
        assert!(contains_stop_phrase("See footnotes for details."));
        assert!(!contains_stop_phrase("KRAS G12D drives pancreatic tumour growth."));
    }

    #[test]
    fn test_every_stop_section_matches_itself() {
        for stop in STOP_SECTIONS {
            assert!(is_stop_heading(stop), "{stop} should be a stop heading");
            assert!(contains_stop_phrase(&stop.to_uppercase()));
        }
    }
}
