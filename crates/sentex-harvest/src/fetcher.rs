//! PMC article page downloader.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use reqwest::StatusCode;
use tracing::{debug, instrument};

use crate::HarvestConfig;

pub const PMC_ARTICLE_BASE_URL: &str = "https://www.ncbi.nlm.nih.gov/pmc/articles";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Page written to this path.
    Saved(PathBuf),
    /// HTTP 403. PMC does this for bot-like clients.
    Forbidden,
    /// Any other non-200 status.
    Failed(u16),
}

pub struct ArticleFetcher {
    client: reqwest::Client,
    base_url: String,
    html_dir: PathBuf,
}

impl ArticleFetcher {
    pub fn new(config: &HarvestConfig, html_dir: impl Into<PathBuf>) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.as_str())
            .build()?;
        Ok(Self {
            client,
            base_url: config.article_base_url.trim_end_matches('/').to_string(),
            html_dir: html_dir.into(),
        })
    }

    pub fn html_dir(&self) -> &Path {
        &self.html_dir
    }

    pub fn article_url(&self, pmcid: &str) -> String {
        format!("{}/{}/", self.base_url, pmcid)
    }

    /// Download the article page for `pmcid` into `<html_dir>/<pmcid>.html`.
    #[instrument(skip(self))]
    pub async fn fetch_html(&self, pmcid: &str) -> anyhow::Result<FetchOutcome> {
        let url = self.article_url(pmcid);
        let resp = self.client.get(&url).send().await?;

        match resp.status() {
            StatusCode::OK => {}
            StatusCode::FORBIDDEN => return Ok(FetchOutcome::Forbidden),
            status => {
                debug!(%url, status = status.as_u16(), "Article download rejected");
                return Ok(FetchOutcome::Failed(status.as_u16()));
            }
        }

        let html = resp.text().await?;
        tokio::fs::create_dir_all(&self.html_dir)
            .await
            .with_context(|| format!("creating {}", self.html_dir.display()))?;
        let path = self.html_dir.join(format!("{pmcid}.html"));
        tokio::fs::write(&path, html)
            .await
            .with_context(|| format!("writing {}", path.display()))?;
        Ok(FetchOutcome::Saved(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_article_url() {
        let config = HarvestConfig {
            article_base_url: "https://example.org/pmc/articles/".to_string(),
            ..Default::default()
        };
        let fetcher = ArticleFetcher::new(&config, "html").unwrap();
        assert_eq!(fetcher.article_url("PMC42"), "https://example.org/pmc/articles/PMC42/");
        assert_eq!(fetcher.html_dir(), Path::new("html"));
    }

    #[tokio::test]
    #[ignore] // Requires network access
    async fn test_live_fetch() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = ArticleFetcher::new(&HarvestConfig::default(), dir.path()).unwrap();
        match fetcher.fetch_html("PMC3531190").await.unwrap() {
            FetchOutcome::Saved(path) => assert!(path.exists()),
            other => println!("PMC did not serve the page: {other:?}"),
        }
    }
}
