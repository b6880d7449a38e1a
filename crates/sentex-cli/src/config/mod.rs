//! Configuration loading for sentex.
//! Reads sentex.toml from `--config`, the SENTEX_CONFIG env var, or the
//! current directory, in that order. Without a file, defaults apply.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use sentex_core::segmenter::SegmenterConfig;
use sentex_core::{ExtractorConfig, HtmlParseOptions};
use sentex_harvest::HarvestConfig;

pub const CONFIG_ENV: &str = "SENTEX_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "sentex.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub extraction: ExtractorConfig,
    #[serde(default)]
    pub html: HtmlParseOptions,
    #[serde(default)]
    pub segmentation: SegmenterConfig,
    #[serde(default)]
    pub batch: BatchConfig,
    #[serde(default)]
    pub harvest: HarvestConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Downloaded article pages.
    #[serde(default = "default_html_dir")]
    pub html_dir: PathBuf,
    /// Paragraph files from `extract`.
    #[serde(default = "default_paragraph_dir")]
    pub paragraph_dir: PathBuf,
    /// Sentence files from `segment` / `run`.
    #[serde(default = "default_sentence_dir")]
    pub sentence_dir: PathBuf,
    /// Manifest name, relative to the sentence directory.
    #[serde(default = "default_manifest_name")]
    pub manifest_name: String,
}

fn default_html_dir()      -> PathBuf { PathBuf::from("articles_html") }
fn default_paragraph_dir() -> PathBuf { PathBuf::from("articles_paragraphs") }
fn default_sentence_dir()  -> PathBuf { PathBuf::from("articles") }
fn default_manifest_name() -> String  { sentex_harvest::manifest::MANIFEST_FILE.to_string() }

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            html_dir: default_html_dir(),
            paragraph_dir: default_paragraph_dir(),
            sentence_dir: default_sentence_dir(),
            manifest_name: default_manifest_name(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchConfig {
    /// Concurrent documents; 0 uses every available core.
    #[serde(default)]
    pub workers: usize,
}


/// Pick the config file: explicit path, then env var, then
/// `./sentex.toml` if it exists.
pub fn resolve_path(explicit: Option<&Path>, env_value: Option<String>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    if let Some(path) = env_value.filter(|v| !v.trim().is_empty()) {
        return Some(PathBuf::from(path));
    }
    let local = PathBuf::from(DEFAULT_CONFIG_FILE);
    local.exists().then_some(local)
}

impl Config {
    /// Load configuration. A named file that does not exist is an error;
    /// no file at all means built-in defaults.
    pub fn load(explicit: Option<&Path>) -> anyhow::Result<(Self, Option<PathBuf>)> {
        let Some(path) = resolve_path(explicit, std::env::var(CONFIG_ENV).ok()) else {
            return Ok((Self::default(), None));
        };

        if !path.exists() {
            anyhow::bail!(
                "Config file not found: {}\n\
                 Unset {CONFIG_ENV} or pass --config with an existing file.",
                path.display()
            );
        }

        let content = std::fs::read_to_string(&path)?;
        let config = Self::from_toml(&content)?;
        Ok((config, Some(path)))
    }

    pub fn from_toml(content: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(content)?)
    }
}
