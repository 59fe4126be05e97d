use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

use super::base::{JobSource, ProviderError, RawJob};
use crate::core::config::JobScoutConfig;

const NO_RESULTS_MARKER: &str = "hasn't returned any results";

#[derive(Debug, Deserialize)]
struct SerpApiResponse {
    #[serde(default)]
    jobs_results: Vec<RawJob>,
    error: Option<String>,
}

/// Google Jobs through SerpApi, restricted to listings posted today.
pub struct SerpApiSource {
    api_key: Option<String>,
    endpoint: String,
    location: String,
    language: String,
    country: String,
    client: Client,
}

impl SerpApiSource {
    pub fn new(
        api_key: Option<String>,
        endpoint: impl Into<String>,
        location: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ProviderError> {
        let client = Client::builder().timeout(timeout).build()?;
        let endpoint = endpoint.into();
        info!(
            "SerpApiSource initialized: endpoint={}, timeout_secs={}, key_present={}",
            endpoint,
            timeout.as_secs(),
            api_key.is_some()
        );
        Ok(Self {
            api_key,
            endpoint,
            location: location.into(),
            language: "en".to_string(),
            country: "in".to_string(),
            client,
        })
    }

    pub fn from_config(config: &JobScoutConfig) -> Result<Self, ProviderError> {
        let mut source = Self::new(
            config.serpapi_key().map(String::from),
            config.serpapi_url.clone(),
            config.search_location.clone(),
            Duration::from_secs(config.fetch_timeout_secs),
        )?;
        source.language = config.search_language.clone();
        source.country = config.search_country.clone();
        Ok(source)
    }

    fn request_url(&self, query: &str, api_key: &str) -> Result<Url, ProviderError> {
        Url::parse_with_params(
            &self.endpoint,
            &[
                ("engine", "google_jobs"),
                ("q", query),
                ("location", self.location.as_str()),
                ("chips", "date_posted:today"),
                ("hl", self.language.as_str()),
                ("gl", self.country.as_str()),
                ("api_key", api_key),
            ],
        )
        .map_err(|e| ProviderError::NotConfigured(format!("invalid endpoint {}: {e}", self.endpoint)))
    }
}

#[async_trait]
impl JobSource for SerpApiSource {
    async fn search(&self, query: &str) -> Result<Vec<RawJob>, ProviderError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| ProviderError::NotConfigured("SERPAPI_KEY is not set".to_string()))?;

        let url = self.request_url(query, api_key)?;
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::Status(status.as_u16()));
        }

        let body: SerpApiResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::InvalidResponse(e.to_string()))?;

        if let Some(error) = body.error {
            if error.contains(NO_RESULTS_MARKER) {
                debug!("SerpApi returned no results for '{}'", query);
                return Ok(Vec::new());
            }
            return Err(ProviderError::InvalidResponse(error));
        }

        debug!("SerpApi returned {} raw jobs for '{}'", body.jobs_results.len(), query);
        Ok(body.jobs_results)
    }

    fn source_name(&self) -> &str {
        "serpapi"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source() -> SerpApiSource {
        SerpApiSource::new(
            Some("secret".into()),
            "https://serpapi.com/search",
            "India",
            Duration::from_secs(15),
        )
        .unwrap()
    }

    #[test]
    fn test_request_url_params() {
        let url = source().request_url("rust developer jobs India", "secret").unwrap();
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert!(pairs.contains(&("engine".into(), "google_jobs".into())));
        assert!(pairs.contains(&("q".into(), "rust developer jobs India".into())));
        assert!(pairs.contains(&("chips".into(), "date_posted:today".into())));
        assert!(pairs.contains(&("location".into(), "India".into())));
        assert!(pairs.contains(&("gl".into(), "in".into())));
    }

    #[tokio::test]
    async fn test_missing_key_is_not_configured() {
        let source = SerpApiSource::new(None, "https://serpapi.com/search", "India", Duration::from_secs(1)).unwrap();
        let err = source.search("anything").await.unwrap_err();
        assert!(matches!(err, ProviderError::NotConfigured(_)));
        assert!(!err.is_transient());
    }

    #[test]
    fn test_response_with_error_field() {
        let body: SerpApiResponse =
            serde_json::from_str(r#"{"error": "Google hasn't returned any results for this query."}"#).unwrap();
        assert!(body.jobs_results.is_empty());
        assert!(body.error.unwrap().contains(NO_RESULTS_MARKER));
    }
}
