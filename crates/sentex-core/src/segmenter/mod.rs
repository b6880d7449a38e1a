//! Sentence segmenter.
//!
//! `segment` runs normalise → guard → boundary detection → unguard → trim →
//! length filter over one paragraph. Paragraphs are always segmented
//! independently.

pub mod model;
pub mod punkt;
pub mod rule;
mod token;

use std::fmt::Debug;
use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::Result;
use crate::guard::{guard, unguard, ABBREVIATION_CATALOG};
use crate::normalize::normalize;

pub use model::{BoundaryModel, TrainingConfig};
pub use punkt::PunktDetector;
pub use rule::RuleDetector;

/// Splits guarded, normalised text into candidate sentences.
pub trait BoundaryDetector: Send + Sync + Debug {
    fn name(&self) -> &'static str;
    fn split(&self, text: &str) -> Vec<String>;
}

/// Which boundary detector to use.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DetectorKind {
    /// Model-driven detector (built-in model unless `model_path` is set).
    #[default]
    Punkt,
    /// Regex-style fallback, no model.
    Rule,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SegmenterConfig {
    #[serde(default)]
    pub detector: DetectorKind,
    /// JSON model file replacing the built-in model.
    #[serde(default)]
    pub model_path: Option<PathBuf>,
    /// Minimum sentence length in characters after trimming.
    #[serde(default = "default_min_sentence_chars")]
    pub min_sentence_chars: usize,
}

fn default_min_sentence_chars() -> usize { 10 }

impl Default for SegmenterConfig {
    fn default() -> Self {
        Self {
            detector: DetectorKind::default(),
            model_path: None,
            min_sentence_chars: default_min_sentence_chars(),
        }
    }
}

/// Cheap to clone: the detector (and its model) is shared read-only.
#[derive(Debug, Clone)]
pub struct SentenceSegmenter {
    detector: Arc<dyn BoundaryDetector>,
    min_sentence_chars: usize,
}

impl SentenceSegmenter {
    /// Build the configured detector. A model that cannot be loaded is a
    /// [`crate::SentexError::SegmentationModel`] and should abort the run.
    pub fn new(config: &SegmenterConfig) -> Result<Self> {
        let detector: Arc<dyn BoundaryDetector> = match config.detector {
            DetectorKind::Punkt => {
                let model = match &config.model_path {
                    Some(path) => BoundaryModel::load(path)?,
                    None => BoundaryModel::builtin()?,
                };
                let model = model.with_hints(ABBREVIATION_CATALOG);
                info!(
                    abbrev_types = model.abbrev_types.len(),
                    sentence_starters = model.sentence_starters.len(),
                    "Punkt detector ready"
                );
                Arc::new(PunktDetector::new(Arc::new(model)))
            }
            DetectorKind::Rule => {
                info!("Rule-based detector ready");
                Arc::new(RuleDetector)
            }
        };
        Ok(Self::with_detector(detector, config.min_sentence_chars))
    }

    pub fn with_detector(detector: Arc<dyn BoundaryDetector>, min_sentence_chars: usize) -> Self {
        Self { detector, min_sentence_chars }
    }

    pub fn detector_name(&self) -> &'static str {
        self.detector.name()
    }

    /// Sentences of one paragraph, in order.
    pub fn segment(&self, paragraph: &str) -> Vec<String> {
        let cleaned = normalize(paragraph);
        if cleaned.is_empty() {
            return Vec::new();
        }
        self.detector
            .split(&guard(&cleaned))
            .iter()
            .map(|s| unguard(s).trim().to_string())
            .filter(|s| s.chars().count() >= self.min_sentence_chars)
            .collect()
    }

    /// Sentences of every paragraph, concatenated in paragraph order.
    pub fn segment_paragraphs<S: AsRef<str>>(&self, paragraphs: &[S]) -> Vec<String> {
        paragraphs
            .iter()
            .flat_map(|p| self.segment(p.as_ref()))
            .collect()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
