//! Block-level document model consumed by the extractor.
//!
//! A `Document` is produced by an external parser (see `html.rs`) or read
//! from its JSON serialisation. The core only ever reads it.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SentexError};

/// Kind of a block node, as far as extraction cares.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BlockKind {
    Heading,
    Paragraph,
    Other,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BlockNode {
    pub kind: BlockKind,
    #[serde(default)]
    pub text: String,
}

impl BlockNode {
    pub fn heading(text: impl Into<String>) -> Self {
        Self { kind: BlockKind::Heading, text: text.into() }
    }

    pub fn paragraph(text: impl Into<String>) -> Self {
        Self { kind: BlockKind::Paragraph, text: text.into() }
    }

    pub fn other(text: impl Into<String>) -> Self {
        Self { kind: BlockKind::Other, text: text.into() }
    }
}

/// An ordered sequence of block nodes keyed by a stable identifier
/// (typically a PMCID such as `PMC1234567`).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Document {
    #[serde(default)]
    pub key: String,
    pub nodes: Vec<BlockNode>,
}

impl Document {
    pub fn new(key: impl Into<String>, nodes: Vec<BlockNode>) -> Self {
        Self { key: key.into(), nodes }
    }

    /// Parse the JSON form `{"key": "...", "nodes": [{"kind": "...", "text": "..."}]}`.
    /// A missing `key` falls back to `default_key`.
    pub fn from_json(default_key: &str, json: &str) -> Result<Self> {
        let mut doc: Document = serde_json::from_str(json)
            .map_err(|e| SentexError::Parse(format!("{default_key}: {e}")))?;
        if doc.key.is_empty() {
            doc.key = default_key.to_string();
        }
        Ok(doc)
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Stable document key for an input path: the file name without its extension.
pub fn key_for_path(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("unknown")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_from_json_with_default_key() {
        let json = r#"{"nodes":[{"kind":"heading","text":"Abstract"},{"kind":"paragraph","text":"Body."}]}"#;
        let doc = Document::from_json("PMC42", json).unwrap();
        assert_eq!(doc.key, "PMC42");
        assert_eq!(doc.nodes.len(), 2);
        assert_eq!(doc.nodes[0], BlockNode::heading("Abstract"));
        assert_eq!(doc.nodes[1].kind, BlockKind::Paragraph);
    }

    #[test]
    fn test_from_json_keeps_explicit_key() {
        let json = r#"{"key":"PMC7","nodes":[]}"#;
        let doc = Document::from_json("fallback", json).unwrap();
        assert_eq!(doc.key, "PMC7");
        assert!(doc.is_empty());
    }

    #[test]
    fn test_from_json_malformed_is_parse_error() {
        let err = Document::from_json("PMC1", "{not json").unwrap_err();
        assert!(matches!(err, SentexError::Parse(_)));
    }

    #[test]
    fn test_key_for_path() {
        assert_eq!(key_for_path(&PathBuf::from("articles_html/PMC123.html")), "PMC123");
        assert_eq!(key_for_path(&PathBuf::from("PMC9.txt")), "PMC9");
    }
}
