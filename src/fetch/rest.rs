//! Thin REST collaborator turning JSON array responses into record vectors.

use anyhow::Context;

use crate::types::Record;

/// HTTP client for a REST service exposing flat JSON collections.
#[derive(Clone, Debug)]
pub struct RestClient {
    client: reqwest::Client,
    base_url: String,
}

impl RestClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url_for(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// GET a collection endpoint and parse the body as an array of records.
    ///
    /// Non-2xx statuses and non-array bodies are errors; no record-shape
    /// validation happens beyond that.
    pub async fn fetch_records(&self, path: &str) -> anyhow::Result<Vec<Record>> {
        let url = self.url_for(path);
        tracing::debug!(%url, "fetching collection");

        let records = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("request to {url} failed"))?
            .error_for_status()
            .with_context(|| format!("request to {url} returned an error status"))?
            .json::<Vec<Record>>()
            .await
            .with_context(|| format!("response from {url} was not a record array"))?;

        Ok(records)
    }
}
