use crate::domain::model::{QuerySpec, Region, SourceResponse};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

pub trait Storage: Send + Sync {
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;

    /// Location of `path` as reported to the operator.
    fn describe(&self, path: &str) -> String;
}

/// Remote source of features for one region.
#[async_trait]
pub trait FeatureSource: Send + Sync {
    async fn fetch(&self, region: &Region, query: &str, spec: &QuerySpec) -> Result<SourceResponse>;
}

/// Pacing between regions.
#[async_trait]
pub trait Waiter: Send + Sync {
    async fn wait(&self, delay: Duration);
}

pub struct TokioWaiter;

#[async_trait]
impl Waiter for TokioWaiter {
    async fn wait(&self, delay: Duration) {
        tokio::time::sleep(delay).await;
    }
}
