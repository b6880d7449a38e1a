//! sentex-harvest: corpus acquisition.
//!
//! Discovers open-access PMCIDs through Europe PMC, downloads the PMC article
//! pages, and writes the `list.json` manifest for a directory of outputs.

pub mod europepmc;
pub mod fetcher;
pub mod harvest;
pub mod manifest;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub use europepmc::EuropePmcClient;
pub use fetcher::{ArticleFetcher, FetchOutcome};
pub use harvest::{harvest, HarvestSummary, PmcSource};
pub use manifest::write_manifest;

/// Discovery plus download, as one source of article pages.
#[async_trait]
pub trait ArticleSource: Send + Sync {
    /// PMCIDs matching `query`, at most `page_size` of them.
    async fn discover(&self, query: &str, page_size: usize) -> anyhow::Result<Vec<String>>;

    /// Download one article page.
    async fn fetch(&self, pmcid: &str) -> anyhow::Result<FetchOutcome>;
}

/// `[harvest]` settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HarvestConfig {
    #[serde(default = "default_query")]
    pub query: String,
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    /// Concurrent downloads.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// PMC rejects non-browser agents with 403.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_search_url")]
    pub search_url: String,
    /// Article pages live at `<article_base_url>/<pmcid>/`.
    #[serde(default = "default_article_base_url")]
    pub article_base_url: String,
}

fn default_query() -> String { "OPEN_ACCESS:Y".to_string() }
fn default_page_size() -> usize { 100 }
fn default_concurrency() -> usize { 4 }
fn default_timeout_secs() -> u64 { 60 }
fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/58.0.3029.110 Safari/537.36"
        .to_string()
}
fn default_search_url() -> String {
    europepmc::EPMC_SEARCH_URL.to_string()
}
fn default_article_base_url() -> String {
    fetcher::PMC_ARTICLE_BASE_URL.to_string()
}

impl Default for HarvestConfig {
    fn default() -> Self {
        Self {
            query: default_query(),
            page_size: default_page_size(),
            concurrency: default_concurrency(),
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
            search_url: default_search_url(),
            article_base_url: default_article_base_url(),
        }
    }
}
