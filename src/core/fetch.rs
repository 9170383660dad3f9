use crate::domain::model::{QuerySpec, Region, SourceResponse};
use crate::domain::ports::FeatureSource;
use crate::utils::error::{FetchFailure, HarvestError, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

pub const DEFAULT_ENDPOINT: &str = "https://overpass-api.de/api/interpreter";

/// Overpass interpreter client. The query goes in the `data` form field.
#[derive(Debug, Clone)]
pub struct OverpassClient {
    endpoint: String,
    client: Client,
}

impl OverpassClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            client: Client::new(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

fn classify(error: reqwest::Error, timeout_seconds: u64) -> FetchFailure {
    if error.is_timeout() {
        FetchFailure::Timeout {
            seconds: timeout_seconds,
        }
    } else if error.is_decode() {
        FetchFailure::MalformedBody(error.to_string())
    } else {
        FetchFailure::Network(error)
    }
}

#[async_trait]
impl FeatureSource for OverpassClient {
    async fn fetch(&self, region: &Region, query: &str, spec: &QuerySpec) -> Result<SourceResponse> {
        tracing::debug!("📡 Posting query for {} to {}", region, self.endpoint);

        let response = self
            .client
            .post(&self.endpoint)
            .form(&[("data", query)])
            .timeout(Duration::from_secs(spec.timeout_seconds))
            .send()
            .await
            .map_err(|e| HarvestError::fetch(region.name(), classify(e, spec.timeout_seconds)))?;

        let status = response.status();
        tracing::debug!("📡 {}: response status {}", region, status);

        if !status.is_success() {
            return Err(HarvestError::fetch(
                region.name(),
                FetchFailure::Status(status.as_u16()),
            ));
        }

        // 先讀完整 body 再解析，解析失敗歸類為格式錯誤
        let body = response
            .bytes()
            .await
            .map_err(|e| HarvestError::fetch(region.name(), classify(e, spec.timeout_seconds)))?;

        serde_json::from_slice::<SourceResponse>(&body).map_err(|e| {
            HarvestError::fetch(region.name(), FetchFailure::MalformedBody(e.to_string()))
        })
    }
}
