//! Statistical boundary detector driven by a [`BoundaryModel`].

use std::sync::Arc;

use super::model::BoundaryModel;
use super::token::{bare_word, core, is_initial, period_word, starts_upper, tokens, OPENERS};
use super::BoundaryDetector;

/// Punkt-style detector. Every `?`/`!` ends a sentence; a final period does
/// too unless the token is a known abbreviation, an initial, an ellipsis or
/// an internally dotted form. Abbreviations and initials still break before
/// a capitalised sentence starter.
#[derive(Debug, Clone)]
pub struct PunktDetector {
    model: Arc<BoundaryModel>,
}

impl PunktDetector {
    pub fn new(model: Arc<BoundaryModel>) -> Self {
        Self { model }
    }

    fn is_boundary(&self, prev: Option<&str>, tok: &str, next: &str) -> bool {
        let body = core(tok);
        if body.ends_with('?') || body.ends_with('!') {
            return true;
        }
        if !body.ends_with('.') {
            return false;
        }

        let next_upper = starts_upper(next);
        let word = period_word(tok);
        if body.ends_with("..") || word.is_empty() {
            return next_upper;
        }

        let next_is_starter = next_upper && self.model.is_sentence_starter(&bare_word(next));
        if self.is_abbreviation(prev, &word) || is_initial(&word) {
            return next_is_starter;
        }
        if word.contains('.') {
            return next_upper;
        }
        true
    }

    fn is_abbreviation(&self, prev: Option<&str>, word: &str) -> bool {
        if self.model.is_abbreviation(word) {
            return true;
        }
        prev.is_some_and(|p| {
            let pair = format!("{} {word}", p.trim_start_matches(OPENERS).to_lowercase());
            self.model.is_abbreviation(&pair)
        })
    }
}

impl BoundaryDetector for PunktDetector {
    fn name(&self) -> &'static str {
        "punkt"
    }

    fn split(&self, text: &str) -> Vec<String> {
        let toks = tokens(text);
        let mut sentences = Vec::new();
        let mut start = 0;

        for (i, tok) in toks.iter().enumerate() {
            let Some(next) = toks.get(i + 1) else { break };
            let prev = i.checked_sub(1).map(|p| toks[p].text);
            if self.is_boundary(prev, tok.text, next.text) {
                sentences.push(text[start..tok.end].trim().to_string());
                start = next.start;
            }
        }

        let rest = text[start..].trim();
        if !rest.is_empty() {
            sentences.push(rest.to_string());
        }
        sentences
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
