//! Europe PMC REST search client.
//!
//! Endpoint: https://www.ebi.ac.uk/europepmc/webservices/rest/search

use std::time::Duration;

use tracing::{debug, instrument};

use crate::HarvestConfig;

pub const EPMC_SEARCH_URL: &str = "https://www.ebi.ac.uk/europepmc/webservices/rest/search";

/// Europe PMC caps a single result page at 1000 entries.
const MAX_PAGE_SIZE: usize = 1000;

pub struct EuropePmcClient {
    client: reqwest::Client,
    search_url: String,
}

impl EuropePmcClient {
    pub fn new(config: &HarvestConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { client, search_url: config.search_url.clone() })
    }

    /// PMCIDs of one result page for `query`.
    #[instrument(skip(self))]
    pub async fn search_open_access(&self, query: &str, page_size: usize) -> anyhow::Result<Vec<String>> {
        let page_size = page_size.clamp(1, MAX_PAGE_SIZE).to_string();
        let params = [
            ("query", query),
            ("format", "json"),
            ("pageSize", page_size.as_str()),
        ];

        let resp = self.client
            .get(&self.search_url)
            .query(&params)
            .send()
            .await?
            .error_for_status()?
            .json::<serde_json::Value>()
            .await?;

        let pmcids = parse_search_response(&resp);
        debug!(count = pmcids.len(), "Europe PMC search returned PMCIDs");
        Ok(pmcids)
    }
}

/// PMCIDs from a search response, in result order. Results without a
/// `pmcid` field are skipped.
pub fn parse_search_response(resp: &serde_json::Value) -> Vec<String> {
    resp["resultList"]["result"]
        .as_array()
        .map(|results| {
            results
                .iter()
                .filter_map(|r| r["pmcid"].as_str())
                .filter(|id| !id.trim().is_empty())
                .map(String::from)
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_skips_results_without_pmcid() {
        let resp = json!({
            "hitCount": 3,
            "resultList": { "result": [
                { "id": "1", "pmcid": "PMC111", "title": "A" },
                { "id": "2", "title": "No PMC copy" },
                { "id": "3", "pmcid": "PMC333" }
            ]}
        });
        assert_eq!(parse_search_response(&resp), vec!["PMC111", "PMC333"]);
    }

    #[test]
    fn test_parse_missing_result_list() {
        assert!(parse_search_response(&json!({ "hitCount": 0 })).is_empty());
        assert!(parse_search_response(&json!({ "resultList": {} })).is_empty());
    }

    #[tokio::test]
    #[ignore] // Requires network access
    async fn test_live_open_access_search() {
        let client = EuropePmcClient::new(&HarvestConfig::default()).unwrap();
        let pmcids = client.search_open_access("OPEN_ACCESS:Y", 5).await.unwrap();
        assert!(!pmcids.is_empty());
        assert!(pmcids.iter().all(|id| id.starts_with("PMC")));
    }
}
