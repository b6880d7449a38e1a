//! Trainable sentence-boundary parameters.
//!
//! A Punkt-style model: the set of word types that behave as abbreviations
//! (usually followed by a period that does not end the sentence) and the set
//! of words that frequently open a sentence. Models are plain JSON so they
//! can be trained once on a corpus and shipped with a run.

use std::collections::{BTreeSet, HashMap};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::token::{bare_word, core, is_initial, starts_upper, CLOSERS, OPENERS};
use crate::error::{Result, SentexError};

/// Model trained on open-access biomedical articles, compiled into the crate.
const BUILTIN_MODEL: &str = include_str!("../../models/biomedical.json");

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct BoundaryModel {
    /// Lower-cased abbreviation types without their final period
    /// (`fig`, `e.g`, `et al`).
    #[serde(default)]
    pub abbrev_types: BTreeSet<String>,
    /// Lower-cased words that commonly start a sentence.
    #[serde(default)]
    pub sentence_starters: BTreeSet<String>,
}

/// Knobs for [`BoundaryModel::train`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingConfig {
    /// Minimum Punkt abbreviation score for a type to be kept.
    #[serde(default = "default_abbrev_threshold")]
    pub abbrev_threshold: f64,
    /// Minimum number of unambiguous sentence-initial occurrences for a starter.
    #[serde(default = "default_min_starter_count")]
    pub min_starter_count: usize,
}

fn default_abbrev_threshold() -> f64 { 0.3 }
fn default_min_starter_count() -> usize { 5 }

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            abbrev_threshold: default_abbrev_threshold(),
            min_starter_count: default_min_starter_count(),
        }
    }
}

impl BoundaryModel {
    /// The built-in biomedical model.
    pub fn builtin() -> Result<Self> {
        Self::from_json(BUILTIN_MODEL)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let model: BoundaryModel = serde_json::from_str(json)
            .map_err(|e| SentexError::SegmentationModel(format!("invalid model JSON: {e}")))?;
        if model.abbrev_types.is_empty() && model.sentence_starters.is_empty() {
            return Err(SentexError::SegmentationModel(
                "model has no trained parameters".to_string(),
            ));
        }
        Ok(model)
    }

    /// Load a model file. Any failure is a [`SentexError::SegmentationModel`].
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path).map_err(|e| {
            SentexError::SegmentationModel(format!("cannot read {}: {e}", path.display()))
        })?;
        let model = Self::from_json(&json)?;
        info!(
            path = %path.display(),
            abbrev_types = model.abbrev_types.len(),
            sentence_starters = model.sentence_starters.len(),
            "Boundary model loaded"
        );
        Ok(model)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Add abbreviation hints (any case, with or without final period).
    pub fn with_hints(mut self, hints: &[&str]) -> Self {
        for hint in hints {
            let word = hint.trim().trim_end_matches('.').to_lowercase();
            if !word.is_empty() {
                self.abbrev_types.insert(word);
            }
        }
        self
    }

    /// Union of both parameter sets.
    pub fn merge(&mut self, other: &BoundaryModel) {
        self.abbrev_types.extend(other.abbrev_types.iter().cloned());
        self.sentence_starters.extend(other.sentence_starters.iter().cloned());
    }

    pub fn is_abbreviation(&self, word: &str) -> bool {
        self.abbrev_types.contains(word)
    }

    pub fn is_sentence_starter(&self, word: &str) -> bool {
        self.sentence_starters.contains(word)
    }

    /// Learn abbreviation types and sentence starters from raw text.
    ///
    /// Abbreviations use the Punkt score: Dunning log-likelihood of the type
    /// co-occurring with a final period, scaled by `exp(-length)`, by the
    /// number of internal periods plus one, and penalised by
    /// `length^-(occurrences without period)`.
    pub fn train(corpus: &str, config: &TrainingConfig) -> Self {
        let mut type_counts: HashMap<String, usize> = HashMap::new();
        let mut period_counts: HashMap<String, usize> = HashMap::new();
        let mut period_tokens = 0usize;
        let mut counted_tokens = 0usize;

        for tok in corpus.split_whitespace() {
            let body = core(tok).trim_start_matches(OPENERS);
            let has_period = body.ends_with('.') && !body.ends_with("..");
            let word = body.trim_end_matches('.').to_lowercase();
            if !word.chars().any(char::is_alphabetic) {
                continue;
            }
            counted_tokens += 1;
            *type_counts.entry(word.clone()).or_default() += 1;
            if has_period {
                period_tokens += 1;
                *period_counts.entry(word).or_default() += 1;
            }
        }

        let mut model = BoundaryModel::default();
        if counted_tokens == 0 {
            return model;
        }

        for (word, &with_period) in &period_counts {
            let total = type_counts.get(word).copied().unwrap_or(with_period);
            let without_period = total - with_period;
            let ll = dunning_log_likelihood(total, period_tokens, with_period, counted_tokens);

            let length = word.chars().filter(|c| *c != '.').count() as f64;
            let internal_periods = word.chars().filter(|c| *c == '.').count() as f64;
            let f_length = (-length).exp();
            let f_periods = internal_periods + 1.0;
            let f_penalty = length.powi(-(without_period as i32));

            let score = ll * f_length * f_periods * f_penalty;
            if score >= config.abbrev_threshold {
                debug!(word = %word, score, "Abbreviation type learned");
                model.abbrev_types.insert(word.clone());
            }
        }

        model.sentence_starters = learn_sentence_starters(corpus, &model, config.min_starter_count);

        info!(
            tokens = counted_tokens,
            abbrev_types = model.abbrev_types.len(),
            sentence_starters = model.sentence_starters.len(),
            "Boundary model trained"
        );
        model
    }
}

/// Capitalised words that follow unambiguous sentence breaks at least
/// `min_count` times and in most of their capitalised occurrences.
fn learn_sentence_starters(corpus: &str, model: &BoundaryModel, min_count: usize) -> BTreeSet<String> {
    let toks: Vec<&str> = corpus.split_whitespace().collect();
    let mut after_break: HashMap<String, usize> = HashMap::new();
    let mut capitalised: HashMap<String, usize> = HashMap::new();

    for (i, tok) in toks.iter().enumerate() {
        if starts_upper(tok) {
            *capitalised.entry(bare_word(tok)).or_default() += 1;
        }
        let Some(next) = toks.get(i + 1) else { continue };
        if !starts_upper(next) || !is_unambiguous_break(tok, model) {
            continue;
        }
        let word = bare_word(next);
        if !word.is_empty() {
            *after_break.entry(word).or_default() += 1;
        }
    }

    after_break
        .into_iter()
        .filter(|(word, starts)| {
            let caps = capitalised.get(word).copied().unwrap_or(*starts);
            *starts >= min_count && starts * 2 > caps
        })
        .map(|(word, _)| word)
        .collect()
}

fn is_unambiguous_break(tok: &str, model: &BoundaryModel) -> bool {
    let body = tok.trim_end_matches(CLOSERS);
    if body.ends_with('?') || body.ends_with('!') {
        return true;
    }
    if !body.ends_with('.') || body.ends_with("..") {
        return false;
    }
    let word = body.trim_end_matches('.').trim_start_matches(OPENERS).to_lowercase();
    !word.is_empty() && !word.contains('.') && !is_initial(&word) && !model.is_abbreviation(&word)
}

/// One-sided Dunning log-likelihood ratio as used by Punkt, comparing the
/// corpus-wide period rate against a near-certain (0.99) period rate.
fn dunning_log_likelihood(count_a: usize, count_b: usize, count_ab: usize, n: usize) -> f64 {
    let p1 = count_b as f64 / n as f64;
    let p2: f64 = 0.99;
    if p1 <= 0.0 || p1 >= 1.0 {
        return 0.0;
    }
    let ab = count_ab as f64;
    let a_not_b = (count_a - count_ab) as f64;

    let null_hypo = ab * p1.ln() + a_not_b * (1.0 - p1).ln();
    let alt_hypo = ab * p2.ln() + a_not_b * (1.0_f64 - p2).ln();
    -2.0 * (null_hypo - alt_hypo)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
