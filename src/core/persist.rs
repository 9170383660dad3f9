use crate::domain::model::{LocationRecord, Region, RunContext};
use crate::domain::ports::Storage;
use crate::utils::error::{HarvestError, Result};

/// Writes one region's records as `<prefix>_<Region_Name>.json`.
pub struct RegionPersister<'a, S: Storage> {
    storage: &'a S,
    file_prefix: &'a str,
}

impl<'a, S: Storage> RegionPersister<'a, S> {
    pub fn new(storage: &'a S, file_prefix: &'a str) -> Self {
        Self {
            storage,
            file_prefix,
        }
    }

    pub fn artifact_name(&self, region: &Region) -> String {
        format!("{}_{}.json", self.file_prefix, region.file_stem())
    }

    /// Returns the location the records were written to.
    pub async fn persist(&self, region: &Region, records: &[LocationRecord]) -> Result<String> {
        let name = self.artifact_name(region);
        write_records(self.storage, &name, records).await?;
        Ok(self.storage.describe(&name))
    }
}

/// Combined output across every region of a run.
pub struct Aggregator<'a, S: Storage> {
    storage: &'a S,
    file_prefix: &'a str,
}

impl<'a, S: Storage> Aggregator<'a, S> {
    pub fn new(storage: &'a S, file_prefix: &'a str) -> Self {
        Self {
            storage,
            file_prefix,
        }
    }

    pub fn artifact_name(&self) -> String {
        format!("{}_worldwide.json", self.file_prefix)
    }

    pub fn append(&self, ctx: &mut RunContext, records: &[LocationRecord]) {
        ctx.aggregate.extend_from_slice(records);
    }

    /// Write the whole buffer once. Returns the artifact location.
    pub async fn flush(&self, ctx: &RunContext) -> Result<String> {
        let name = self.artifact_name();
        write_records(self.storage, &name, &ctx.aggregate).await?;
        Ok(self.storage.describe(&name))
    }
}

async fn write_records<S: Storage>(storage: &S, name: &str, records: &[LocationRecord]) -> Result<()> {
    let json = serde_json::to_string_pretty(records)
        .map_err(|e| HarvestError::persist(name, HarvestError::from(e)))?;

    tracing::debug!("Writing {} records ({} bytes) to {}", records.len(), json.len(), name);
    storage
        .write_file(name, json.as_bytes())
        .await
        .map_err(|e| HarvestError::persist(name, e))
}
