//! Whitespace tokenisation shared by the detectors and the model trainer.

/// Characters that may trail a sentence-final period: `rose.)`, `end."`.
pub(crate) const CLOSERS: &[char] = &[')', ']', '}', '"', '\'', '\u{2019}', '\u{201D}', '\u{00BB}'];

/// Characters that may precede the first letter of a word: `(The`, `"We`.
pub(crate) const OPENERS: &[char] = &['(', '[', '{', '"', '\'', '\u{2018}', '\u{201C}', '\u{00AB}'];

/// A whitespace-delimited token with its byte span in the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Token<'a> {
    pub text: &'a str,
    pub start: usize,
    pub end: usize,
}

pub(crate) fn tokens(text: &str) -> Vec<Token<'_>> {
    let mut out = Vec::new();
    let mut start = None;
    for (idx, ch) in text.char_indices() {
        match (ch.is_whitespace(), start) {
            (true, Some(s)) => {
                out.push(Token { text: &text[s..idx], start: s, end: idx });
                start = None;
            }
            (false, None) => start = Some(idx),
            _ => {}
        }
    }
    if let Some(s) = start {
        out.push(Token { text: &text[s..], start: s, end: text.len() });
    }
    out
}

/// The token without trailing closing brackets and quotes.
pub(crate) fn core(token: &str) -> &str {
    token.trim_end_matches(CLOSERS)
}

/// Lower-cased word of a period-final token, without the trailing period(s)
/// and leading openers: `(Fig.` → `fig`, `e.g.` → `e.g`.
pub(crate) fn period_word(token: &str) -> String {
    core(token)
        .trim_end_matches('.')
        .trim_start_matches(OPENERS)
        .to_lowercase()
}

/// Lower-cased alphanumeric body of a token: `(However,` → `however`.
pub(crate) fn bare_word(token: &str) -> String {
    token
        .trim_start_matches(|c: char| !c.is_alphanumeric())
        .trim_end_matches(|c: char| !c.is_alphanumeric())
        .to_lowercase()
}

/// Whether the first letter after any openers is upper-case.
pub(crate) fn starts_upper(token: &str) -> bool {
    token
        .trim_start_matches(OPENERS)
        .chars()
        .next()
        .is_some_and(char::is_uppercase)
}

/// A single alphabetic character, as left by `A.` once the period is removed.
pub(crate) fn is_initial(word: &str) -> bool {
    let mut chars = word.chars();
    matches!((chars.next(), chars.next()), (Some(c), None) if c.is_alphabetic())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokens_spans() {
        let text = " Levels  rose.\nSee";
        let toks = tokens(text);
        assert_eq!(toks.len(), 3);
        assert_eq!(toks[1].text, "rose.");
        assert_eq!(&text[toks[1].start..toks[1].end], "rose.");
        assert_eq!(toks[2].end, text.len());
    }

    #[test]
    fn test_word_helpers() {
        assert_eq!(period_word("(Fig."), "fig");
        assert_eq!(period_word("e.g."), "e.g");
        assert_eq!(period_word("rose.)"), "rose");
        assert_eq!(bare_word("(However,"), "however");
        assert!(starts_upper("\"The"));
        assert!(!starts_upper("(the"));
        assert!(!starts_upper("14)"));
        assert!(is_initial("a"));
        assert!(!is_initial("ab"));
        assert!(!is_initial("4"));
    }
}
