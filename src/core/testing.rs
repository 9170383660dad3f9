use crate::domain::model::{QuerySpec, Region, SourceResponse};
use crate::domain::ports::{FeatureSource, Storage, Waiter};
use crate::utils::error::{FetchFailure, HarvestError, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

#[derive(Clone, Default)]
pub struct MockStorage {
    files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    fail_on: Option<String>,
}

impl MockStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_on(path: &str) -> Self {
        Self {
            fail_on: Some(path.to_string()),
            ..Self::default()
        }
    }

    pub async fn get_file(&self, path: &str) -> Option<Vec<u8>> {
        let files = self.files.lock().await;
        files.get(path).cloned()
    }
}

impl Storage for MockStorage {
    async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
        if self.fail_on.as_deref() == Some(path) {
            return Err(HarvestError::IoError(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                format!("read-only: {}", path),
            )));
        }
        let mut files = self.files.lock().await;
        files.insert(path.to_string(), data.to_vec());
        Ok(())
    }

    fn describe(&self, path: &str) -> String {
        format!("mock://{}", path)
    }
}

/// Canned responses keyed by region name; unknown regions fail with HTTP 504.
#[derive(Default)]
pub struct FakeSource {
    responses: HashMap<String, serde_json::Value>,
    pub queries: Mutex<Vec<(String, String)>>,
}

impl FakeSource {
    pub fn with(mut self, region: &str, body: serde_json::Value) -> Self {
        self.responses.insert(region.to_string(), body);
        self
    }
}

#[async_trait]
impl FeatureSource for FakeSource {
    async fn fetch(&self, region: &Region, query: &str, _spec: &QuerySpec) -> Result<SourceResponse> {
        self.queries
            .lock()
            .await
            .push((region.name().to_string(), query.to_string()));

        match self.responses.get(region.name()) {
            Some(body) => serde_json::from_value(body.clone()).map_err(|e| {
                HarvestError::fetch(region.name(), FetchFailure::MalformedBody(e.to_string()))
            }),
            None => Err(HarvestError::fetch(region.name(), FetchFailure::Status(504))),
        }
    }
}

#[derive(Default)]
pub struct RecordingWaiter {
    pub waits: Mutex<Vec<Duration>>,
}

#[async_trait]
impl Waiter for RecordingWaiter {
    async fn wait(&self, delay: Duration) {
        self.waits.lock().await.push(delay);
    }
}
