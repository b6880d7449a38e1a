//! Abbreviation guard.
//!
//! Rewrites periods that must not end a sentence (initials, numbered list
//! markers, `et al.`, page citations, common short forms) into a placeholder
//! before segmentation, and restores them afterwards. Rules run in a fixed
//! order; the narrow ones claim their periods before the broad abbreviation
//! rule sees the text. Whitespace around a guarded period is kept verbatim,
//! so `unguard(guard(x)) == x` for any `x` without the placeholder.

use lazy_static::lazy_static;
use regex::{Captures, Regex};

/// Stand-in for a protected period. Built from private-use code points so it
/// cannot occur in article text.
pub const PLACEHOLDER: &str = "\u{E000}DOT\u{E001}";

/// Short forms whose trailing period is never a sentence boundary.
/// Also handed to the boundary detector as abbreviation hints.
pub const ABBREVIATION_CATALOG: &[&str] = &[
    "et al", "e.g", "i.e", "vs", "Fig", "Ref", "No", "Dr", "Prof", "p", "etc", "Ltd", "Co",
];

lazy_static! {
    // A. M. / B. W.
    static ref INITIALS: Regex =
        Regex::new(r"\b([A-Z])\.(\s)([A-Z])\.").expect("valid initials regex");
    // (12).
    static ref LIST_NUMBER: Regex =
        Regex::new(r"\((\d+)\)\.(\s+)").expect("valid list number regex");
    // et al. (2020) / et al. Smith
    static ref ET_AL: Regex =
        Regex::new(r"\bet al\.(\s*)(\(|[A-Z])").expect("valid et al regex");
    // p. 14)
    static ref PAGE_CITATION: Regex =
        Regex::new(r"\bp\.(\s*)(\d+)\)").expect("valid page citation regex");
    static ref ABBREVIATION: Regex = {
        let alternation = ABBREVIATION_CATALOG
            .iter()
            .map(|abbr| regex::escape(abbr))
            .collect::<Vec<_>>()
            .join("|");
        Regex::new(&format!(r"\b({alternation})\.(\s+)")).expect("valid abbreviation regex")
    };
}

/// Replace every protected period in `text` with [`PLACEHOLDER`].
pub fn guard(text: &str) -> String {
    let text = INITIALS.replace_all(text, |c: &Captures| {
        format!("{}{PLACEHOLDER}{}{}{PLACEHOLDER}", &c[1], &c[2], &c[3])
    });
    let text = LIST_NUMBER.replace_all(&text, |c: &Captures| {
        format!("({}){PLACEHOLDER}{}", &c[1], &c[2])
    });
    let text = ET_AL.replace_all(&text, |c: &Captures| {
        format!("et al{PLACEHOLDER}{}{}", &c[1], &c[2])
    });
    let text = PAGE_CITATION.replace_all(&text, |c: &Captures| {
        format!("p{PLACEHOLDER}{}{})", &c[1], &c[2])
    });
    let text = ABBREVIATION.replace_all(&text, |c: &Captures| {
        format!("{}{PLACEHOLDER}{}", c[1].replace('.', PLACEHOLDER), &c[2])
    });
    text.into_owned()
}

/// Restore every placeholder to a literal period.
pub fn unguard(text: &str) -> String {
    text.replace(PLACEHOLDER, ".")
}

pub fn contains_placeholder(text: &str) -> bool {
    text.contains(PLACEHOLDER)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
