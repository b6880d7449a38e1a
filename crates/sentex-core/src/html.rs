//! HTML → [`Document`] adapter.
//!
//! Walks every element under `<body>` in document order. Configured heading
//! tags become headings, paragraph tags become paragraphs, every other
//! element is kept as `other` so ordering stays intact.

use scraper::{ElementRef, Html};
use serde::{Deserialize, Serialize};

use crate::document::{BlockKind, BlockNode, Document};
use crate::error::{Result, SentexError};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HtmlParseOptions {
    /// Tags treated as section headings (PMC article pages use `h2`).
    #[serde(default = "default_heading_tags")]
    pub heading_tags: Vec<String>,
    #[serde(default = "default_paragraph_tags")]
    pub paragraph_tags: Vec<String>,
}

fn default_heading_tags() -> Vec<String> { vec!["h2".to_string()] }
fn default_paragraph_tags() -> Vec<String> { vec!["p".to_string()] }

impl Default for HtmlParseOptions {
    fn default() -> Self {
        Self {
            heading_tags: default_heading_tags(),
            paragraph_tags: default_paragraph_tags(),
        }
    }
}

impl HtmlParseOptions {
    fn kind_of(&self, tag: &str) -> BlockKind {
        if self.heading_tags.iter().any(|t| t.eq_ignore_ascii_case(tag)) {
            BlockKind::Heading
        } else if self.paragraph_tags.iter().any(|t| t.eq_ignore_ascii_case(tag)) {
            BlockKind::Paragraph
        } else {
            BlockKind::Other
        }
    }
}

/// Parse an HTML page into a block-node document.
///
/// Fails with [`SentexError::Parse`] when no element can be located under
/// `<body>`.
pub fn parse_html(key: &str, html: &str, options: &HtmlParseOptions) -> Result<Document> {
    let page = Html::parse_document(html);

    let body = page
        .root_element()
        .children()
        .filter_map(ElementRef::wrap)
        .find(|el| el.value().name() == "body")
        .ok_or_else(|| SentexError::Parse(format!("{key}: no <body> element")))?;

    let nodes: Vec<BlockNode> = body
        .descendants()
        .skip(1)
        .filter_map(ElementRef::wrap)
        .map(|el| BlockNode {
            kind: options.kind_of(el.value().name()),
            text: el.text().collect::<String>(),
        })
        .collect();

    if nodes.is_empty() {
        return Err(SentexError::Parse(format!("{key}: no block nodes under <body>")));
    }

    Ok(Document::new(key, nodes))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
