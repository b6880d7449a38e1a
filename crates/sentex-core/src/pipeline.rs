//! Per-document pipeline.
//!
//! One document in, one text artifact out:
//!   - `Extract`: document → qualifying paragraphs (blank-line separated)
//!   - `Segment`: paragraph file → sentences (one per line)
//!   - `Full`:    document → sentences, skipping the intermediate file
//!
//! Everything here is synchronous; the batch driver runs it on blocking
//! worker threads.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::document::{key_for_path, Document};
use crate::error::{Result, SentexError};
use crate::extractor::{ExtractorConfig, ParagraphExtractor};
use crate::html::{parse_html, HtmlParseOptions};
use crate::normalize::normalize;
use crate::segmenter::{SegmenterConfig, SentenceSegmenter};

/// Separator between paragraphs in a paragraph file.
pub const PARAGRAPH_SEPARATOR: &str = "\n\n";
/// Separator between sentences in a sentence file.
pub const SENTENCE_SEPARATOR: &str = "\n";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Extract,
    Segment,
    Full,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Extract => "extract",
            Stage::Segment => "segment",
            Stage::Full    => "full",
        }
    }

    /// Whether `path` is an input this stage consumes.
    pub fn accepts(&self, path: &Path) -> bool {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        match (self, ext.as_deref()) {
            (Stage::Segment, Some("txt")) => true,
            (Stage::Extract | Stage::Full, Some("html" | "htm" | "json")) => true,
            _ => false,
        }
    }
}

/// What happened to one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentOutcome {
    /// An artifact with `items` paragraphs or sentences was written.
    Written { output: PathBuf, items: usize },
    /// Nothing qualified; no artifact written.
    NoContent,
}

/// Sentences of one document plus the paragraph count they came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentSentences {
    pub key: String,
    pub paragraphs: usize,
    pub sentences: Vec<String>,
}

/// Everything a worker needs to process documents. Cloning is cheap and
/// gives each worker its own instance; the boundary model stays shared.
#[derive(Debug, Clone)]
pub struct PipelineContext {
    pub extractor: ParagraphExtractor,
    pub segmenter: SentenceSegmenter,
    pub html: HtmlParseOptions,
}

impl PipelineContext {
    /// Fails only if the segmenter cannot be built, which is fatal for a run.
    pub fn new(
        extractor: ExtractorConfig,
        segmenter: &SegmenterConfig,
        html: HtmlParseOptions,
    ) -> Result<Self> {
        Ok(Self {
            extractor: ParagraphExtractor::new(extractor),
            segmenter: SentenceSegmenter::new(segmenter)?,
            html,
        })
    }

    /// Read and parse an HTML or JSON document.
    pub fn load_document(&self, path: &Path) -> Result<Document> {
        let key = key_for_path(path);
        let text = read_text(path)?;
        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("json"));
        if is_json {
            Document::from_json(&key, &text)
        } else {
            parse_html(&key, &text, &self.html)
        }
    }

    /// Extraction followed by per-paragraph segmentation.
    pub fn sentences(&self, doc: &Document) -> DocumentSentences {
        let paragraphs = self.extractor.extract(doc);
        let sentences = self.segmenter.segment_paragraphs(&paragraphs);
        DocumentSentences {
            key: doc.key.clone(),
            paragraphs: paragraphs.len(),
            sentences,
        }
    }

    pub fn process_file(&self, stage: Stage, input: &Path, out_dir: &Path) -> Result<DocumentOutcome> {
        let output = output_path(out_dir, input);
        let (items, separator) = match stage {
            Stage::Extract => {
                let doc = self.load_document(input)?;
                let paragraphs: Vec<String> = self
                    .extractor
                    .extract(&doc)
                    .iter()
                    .map(|p| normalize(p))
                    .collect();
                (paragraphs, PARAGRAPH_SEPARATOR)
            }
            Stage::Segment => {
                let text = read_text(input)?;
                let sentences = self.segmenter.segment_paragraphs(&split_paragraphs(&text));
                (sentences, SENTENCE_SEPARATOR)
            }
            Stage::Full => {
                let doc = self.load_document(input)?;
                (self.sentences(&doc).sentences, SENTENCE_SEPARATOR)
            }
        };

        if items.is_empty() {
            debug!(input = %input.display(), stage = stage.as_str(), "No content");
            return Ok(DocumentOutcome::NoContent);
        }

        write_joined(&output, &items, separator)?;
        Ok(DocumentOutcome::Written { output, items: items.len() })
    }
}

/// Read a file as UTF-8. Undecodable bytes are a [`SentexError::Encoding`].
pub fn read_text(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path)?;
    String::from_utf8(bytes)
        .map_err(|e| SentexError::Encoding(format!("{}: {e}", path.display())))
}

/// `<out_dir>/<key>.txt` for an input file.
pub fn output_path(out_dir: &Path, input: &Path) -> PathBuf {
    out_dir.join(format!("{}.txt", key_for_path(input)))
}

/// Paragraphs of a paragraph file; blank chunks are dropped.
pub fn split_paragraphs(text: &str) -> Vec<&str> {
    text.split(PARAGRAPH_SEPARATOR)
        .filter(|p| !p.trim().is_empty())
        .collect()
}

/// Write `items` joined by `separator`, without a trailing separator.
pub fn write_joined(path: &Path, items: &[String], separator: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, items.join(separator))?;
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::BlockNode;

    fn ctx() -> PipelineContext {
        PipelineContext::new(
            ExtractorConfig::default(),
            &SegmenterConfig::default(),
            HtmlParseOptions::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_stage_accepts() {
        assert!(Stage::Full.accepts(Path::new("a/PMC1.html")));
        assert!(Stage::Extract.accepts(Path::new("PMC1.JSON")));
        assert!(!Stage::Full.accepts(Path::new("PMC1.txt")));
        assert!(Stage::Segment.accepts(Path::new("PMC1.txt")));
        assert!(!Stage::Segment.accepts(Path::new("PMC1")));
    }

    #[test]
    fn test_output_path_replaces_extension() {
        assert_eq!(
            output_path(Path::new("out"), Path::new("in/PMC123.html")),
            PathBuf::from("out/PMC123.txt")
        );
    }

    #[test]
    fn test_sentences_in_paragraph_order() {
        let doc = Document::new(
            "PMC5",
            vec![
                BlockNode::heading("Abstract"),
                BlockNode::paragraph("The first paragraph has one sentence that is long enough."),
                BlockNode::paragraph("Second paragraph, first sentence here. Second paragraph, second sentence."),
                BlockNode::heading("References"),
                BlockNode::paragraph("Smith J. A cited work that should never show up in output."),
            ],
        );
        let out = ctx().sentences(&doc);
        assert_eq!(out.paragraphs, 2);
        assert_eq!(
            out.sentences,
            vec![
                "The first paragraph has one sentence that is long enough.",
                "Second paragraph, first sentence here.",
                "Second paragraph, second sentence.",
            ]
        );
    }

    #[test]
    fn test_no_paragraphs_means_no_sentences() {
        let doc = Document::new(
            "PMC6",
            vec![BlockNode::heading("Abstract"), BlockNode::heading("References")],
        );
        let out = ctx().sentences(&doc);
        assert_eq!(out.paragraphs, 0);
        assert!(out.sentences.is_empty());
    }

    #[test]
    fn test_split_paragraphs_drops_blank_chunks() {
        assert_eq!(split_paragraphs("a\n\n\n\nb\n\n"), vec!["a", "b"]);
        assert!(split_paragraphs("").is_empty());
    }

    #[test]
    fn test_read_text_rejects_invalid_utf8() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("PMC9.html");
        std::fs::write(&path, [0x3c, 0x70, 0x3e, 0xff, 0xfe, 0x3c]).unwrap();
        let err = read_text(&path).unwrap_err();
        assert!(matches!(err, SentexError::Encoding(_)));
    }

    #[test]
    fn test_write_joined_has_no_trailing_newline() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/PMC1.txt");
        write_joined(&path, &["one".to_string(), "two".to_string()], SENTENCE_SEPARATOR).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "one\ntwo");
    }
}
