//! Discover-then-download driver.

use std::path::PathBuf;

use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use serde::Serialize;
use tracing::{info, instrument, warn};

use crate::{ArticleFetcher, ArticleSource, EuropePmcClient, FetchOutcome, HarvestConfig};

/// Europe PMC discovery plus PMC page download.
pub struct PmcSource {
    search: EuropePmcClient,
    fetcher: ArticleFetcher,
}

impl PmcSource {
    pub fn new(config: &HarvestConfig, html_dir: impl Into<PathBuf>) -> anyhow::Result<Self> {
        Ok(Self {
            search: EuropePmcClient::new(config)?,
            fetcher: ArticleFetcher::new(config, html_dir)?,
        })
    }
}

#[async_trait]
impl ArticleSource for PmcSource {
    async fn discover(&self, query: &str, page_size: usize) -> anyhow::Result<Vec<String>> {
        self.search.search_open_access(query, page_size).await
    }

    async fn fetch(&self, pmcid: &str) -> anyhow::Result<FetchOutcome> {
        self.fetcher.fetch_html(pmcid).await
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct HarvestSummary {
    pub discovered: usize,
    pub saved: usize,
    pub forbidden: usize,
    pub failed: usize,
    pub errors: Vec<String>,
    pub duration_ms: u64,
}

/// Discover PMCIDs and download each page, `config.concurrency` at a time.
///
/// A failed search is an error. Failed downloads are counted and logged.
#[instrument(skip(source, config), fields(query = %config.query))]
pub async fn harvest(source: &dyn ArticleSource, config: &HarvestConfig) -> anyhow::Result<HarvestSummary> {
    let t0 = std::time::Instant::now();
    let pmcids = source.discover(&config.query, config.page_size).await?;
    info!(count = pmcids.len(), "PMCIDs discovered");

    let mut summary = HarvestSummary { discovered: pmcids.len(), ..Default::default() };

    let mut downloads = stream::iter(pmcids)
        .map(|pmcid| async move {
            let outcome = source.fetch(&pmcid).await;
            (pmcid, outcome)
        })
        .buffer_unordered(config.concurrency.max(1));

    while let Some((pmcid, outcome)) = downloads.next().await {
        match outcome {
            Ok(FetchOutcome::Saved(_)) => {
                summary.saved += 1;
                info!("✅ Saved {pmcid}");
            }
            Ok(FetchOutcome::Forbidden) => {
                summary.forbidden += 1;
                warn!("❌ Failed to fetch {pmcid}: Access Forbidden (403)");
            }
            Ok(FetchOutcome::Failed(status)) => {
                summary.failed += 1;
                let msg = format!("{pmcid}: HTTP {status}");
                warn!("❌ Failed to fetch {pmcid}: {status}");
                summary.errors.push(msg);
            }
            Err(e) => {
                summary.failed += 1;
                let msg = format!("{pmcid}: {e}");
                warn!("❌ Failed to fetch {}", &msg);
                summary.errors.push(msg);
            }
        }
    }

    summary.duration_ms = t0.elapsed().as_millis() as u64;
    info!(
        discovered  = summary.discovered,
        saved       = summary.saved,
        forbidden   = summary.forbidden,
        failed      = summary.failed,
        duration_ms = summary.duration_ms,
        "Harvest complete"
    );
    Ok(summary)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Scripted source: one outcome per PMCID, records fetch order.
    struct ScriptedSource {
        script: Vec<(&'static str, Option<FetchOutcome>)>,
        fetched: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl ArticleSource for ScriptedSource {
        async fn discover(&self, _query: &str, page_size: usize) -> anyhow::Result<Vec<String>> {
            Ok(self.script.iter().take(page_size).map(|(id, _)| id.to_string()).collect())
        }

        async fn fetch(&self, pmcid: &str) -> anyhow::Result<FetchOutcome> {
            self.fetched.lock().unwrap().push(pmcid.to_string());
            let (_, outcome) = self.script.iter().find(|(id, _)| *id == pmcid).unwrap();
            outcome.clone().ok_or_else(|| anyhow::anyhow!("connection reset"))
        }
    }

    #[test]
    fn test_harvest_tallies_every_outcome() {
        let source = ScriptedSource {
            script: vec![
                ("PMC1", Some(FetchOutcome::Saved(PathBuf::from("html/PMC1.html")))),
                ("PMC2", Some(FetchOutcome::Forbidden)),
                ("PMC3", Some(FetchOutcome::Failed(500))),
                ("PMC4", None),
                ("PMC5", Some(FetchOutcome::Saved(PathBuf::from("html/PMC5.html")))),
            ],
            fetched: Mutex::new(Vec::new()),
        };
        let config = HarvestConfig { concurrency: 2, ..Default::default() };

        let summary = tokio_test::block_on(harvest(&source, &config)).unwrap();

        assert_eq!(summary.discovered, 5);
        assert_eq!(summary.saved, 2);
        assert_eq!(summary.forbidden, 1);
        assert_eq!(summary.failed, 2);
        assert_eq!(summary.errors.len(), 2);
        assert_eq!(source.fetched.lock().unwrap().len(), 5);
    }

    #[tokio::test]
    async fn test_harvest_respects_page_size() {
        let source = ScriptedSource {
            script: vec![
                ("PMC1", Some(FetchOutcome::Forbidden)),
                ("PMC2", Some(FetchOutcome::Forbidden)),
            ],
            fetched: Mutex::new(Vec::new()),
        };
        let config = HarvestConfig { page_size: 1, ..Default::default() };
        let summary = harvest(&source, &config).await.unwrap();
        assert_eq!(summary.discovered, 1);
        assert_eq!(*source.fetched.lock().unwrap(), vec!["PMC1".to_string()]);
    }
}
