//! Rule-based fallback detector: no model, one rule.

use super::token::{core, starts_upper, tokens};
use super::BoundaryDetector;

/// Splits after `.`, `?` or `!` (optionally followed by closing brackets or
/// quotes) when whitespace and an upper-case letter follow. Guarded periods
/// are not periods, so guarded text is never split.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleDetector;

impl BoundaryDetector for RuleDetector {
    fn name(&self) -> &'static str {
        "rule"
    }

    fn split(&self, text: &str) -> Vec<String> {
        let toks = tokens(text);
        let mut sentences = Vec::new();
        let mut start = 0;

        for pair in toks.windows(2) {
            let (tok, next) = (pair[0], pair[1]);
            let ends = core(tok.text).ends_with(&['.', '?', '!'][..]);
            if ends && starts_upper(next.text) {
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
