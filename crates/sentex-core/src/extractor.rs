//! Body paragraph extractor.
//!
//! Scans a document forward from the abstract marker (or from the start when
//! there is none) and collects qualifying paragraphs until the first stop
//! heading. Halting is permanent for the document.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::boilerplate::{contains_stop_phrase, is_stop_heading};
use crate::document::{BlockKind, Document};

/// Configuration for paragraph extraction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractorConfig {
    /// Minimum paragraph length in characters, measured after trimming.
    #[serde(default = "default_min_paragraph_chars")]
    pub min_paragraph_chars: usize,
    /// Token a heading must contain (case-insensitive) to mark the body start.
    #[serde(default = "default_abstract_marker")]
    pub abstract_marker: String,
}

fn default_min_paragraph_chars() -> usize { 50 }
fn default_abstract_marker() -> String { "ABSTRACT".to_string() }

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            min_paragraph_chars: default_min_paragraph_chars(),
            abstract_marker: default_abstract_marker(),
        }
    }
}

/// Scan state. `Collecting → Halted` is the only transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionState {
    Collecting,
    Halted,
}

/// Result of one extraction pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    pub paragraphs: Vec<String>,
    pub state: ExtractionState,
    /// Whether the scan started after an abstract marker.
    pub marker_found: bool,
}

impl Extraction {
    pub fn is_empty(&self) -> bool {
        self.paragraphs.is_empty()
    }
}

#[derive(Debug, Clone, Default)]
pub struct ParagraphExtractor {
    config: ExtractorConfig,
}

impl ParagraphExtractor {
    pub fn new(config: ExtractorConfig) -> Self {
        Self { config }
    }

    /// Qualifying paragraphs of `doc`, in document order.
    pub fn extract(&self, doc: &Document) -> Vec<String> {
        self.extract_detailed(doc).paragraphs
    }

    pub fn extract_detailed(&self, doc: &Document) -> Extraction {
        let marker = self.find_abstract_marker(doc);
        let start = marker.map(|idx| idx + 1).unwrap_or(0);

        let mut state = ExtractionState::Collecting;
        let mut paragraphs = Vec::new();

        for node in &doc.nodes[start..] {
            match node.kind {
                BlockKind::Heading => {
                    if is_stop_heading(&node.text) {
                        debug!(key = %doc.key, heading = %node.text.trim(), "Stop heading reached");
                        state = ExtractionState::Halted;
                        break;
                    }
                }
                BlockKind::Paragraph => {
                    if let Some(text) = self.qualify(&node.text) {
                        paragraphs.push(text.to_string());
                    }
                }
                BlockKind::Other => {}
            }
        }

        Extraction {
            paragraphs,
            state,
            marker_found: marker.is_some(),
        }
    }

    /// Index of the first heading containing the abstract marker.
    fn find_abstract_marker(&self, doc: &Document) -> Option<usize> {
        let marker = self.config.abstract_marker.to_uppercase();
        if marker.is_empty() {
            return None;
        }
        doc.nodes.iter().position(|node| {
            node.kind == BlockKind::Heading && node.text.to_uppercase().contains(&marker)
        })
    }

    /// The trimmed paragraph text, if it passes every paragraph filter.
    fn qualify<'a>(&self, raw: &'a str) -> Option<&'a str> {
        let text = raw.trim();
        if contains_stop_phrase(text) {
            return None;
        }
        if text.chars().count() < self.config.min_paragraph_chars || !text.ends_with('.') {
            return None;
        }
        Some(text)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
