use crate::config::toml_config::HarvestConfig;
use crate::core::normalize::normalize;
use crate::core::persist::{Aggregator, RegionPersister};
use crate::core::query::build_query;
use crate::domain::model::{Region, RegionOutcome, RunContext, RunSummary};
use crate::domain::ports::{FeatureSource, Storage, Waiter};
use crate::utils::error::Result;

/// Runs the region loop: query, fetch, normalize, persist, pace.
pub struct HarvestEngine<F: FeatureSource, S: Storage, W: Waiter> {
    source: F,
    storage: S,
    waiter: W,
    config: HarvestConfig,
}

impl<F: FeatureSource, S: Storage, W: Waiter> HarvestEngine<F, S, W> {
    pub fn new(source: F, storage: S, waiter: W, config: HarvestConfig) -> Self {
        Self {
            source,
            storage,
            waiter,
            config,
        }
    }

    pub fn config(&self) -> &HarvestConfig {
        &self.config
    }

    /// Process a single region against the run context. Fetch failures are
    /// reported and yield no records; write failures keep the records in
    /// the aggregate.
    pub async fn process_region(&self, ctx: &mut RunContext, region: &Region) -> RegionOutcome {
        let spec = self.config.query_spec();
        let query = build_query(region, &spec);

        tracing::info!("🔎 Fetching {} in {}...", spec.brand, region);
        let response = match self.source.fetch(region, &query, &spec).await {
            Ok(response) => response,
            Err(e) => {
                tracing::error!("❌ Error fetching {}: {}", region, e);
                tracing::debug!("💡 {}", e.recovery_suggestion());
                return RegionOutcome::FetchFailed {
                    error: e.to_string(),
                };
            }
        };

        let records = normalize(&response, ctx, &self.config.output.id_prefix);
        tracing::debug!(
            "{}: {} of {} elements had coordinates",
            region,
            records.len(),
            response.elements.len()
        );

        let persister = RegionPersister::new(&self.storage, &self.config.output.file_prefix);
        let outcome = match persister.persist(region, &records).await {
            Ok(artifact) => {
                tracing::info!("✅ Saved {} {} in {} → {}", records.len(), spec.brand, region, artifact);
                RegionOutcome::Saved {
                    count: records.len(),
                    artifact,
                }
            }
            Err(e) => {
                tracing::error!(
                    "❌ Could not save {} ({} records kept in aggregate): {}",
                    region,
                    records.len(),
                    e
                );
                RegionOutcome::PersistFailed {
                    count: records.len(),
                    error: e.to_string(),
                }
            }
        };

        Aggregator::new(&self.storage, &self.config.output.file_prefix).append(ctx, &records);
        outcome
    }

    /// Walk every configured region in order, then write the combined
    /// artifact. Only that final write can fail the run.
    pub async fn run(&self) -> Result<RunSummary> {
        let started_at = chrono::Utc::now();
        let regions = self.config.regions();
        let pacing = self.config.pacing();
        let mut ctx = RunContext::new();
        let mut outcomes = Vec::with_capacity(regions.len());

        tracing::info!("🚀 Starting harvest over {} regions", regions.len());

        for (index, region) in regions.iter().enumerate() {
            let outcome = self.process_region(&mut ctx, region).await;
            let fetched = !outcome.is_fetch_failure();
            outcomes.push((region.clone(), outcome));

            // 只在成功取得資料後等待，最後一個區域之後不等待
            if fetched && index + 1 < regions.len() && !pacing.is_zero() {
                tracing::debug!("⏳ Waiting {:?} before next region", pacing);
                self.waiter.wait(pacing).await;
            }
        }

        let aggregator = Aggregator::new(&self.storage, &self.config.output.file_prefix);
        let worldwide_artifact = aggregator.flush(&ctx).await?;

        let regions_failed = outcomes.iter().filter(|(_, o)| o.is_fetch_failure()).count();
        let summary = RunSummary {
            regions_processed: regions.len(),
            regions_failed,
            total_records: ctx.aggregate.len(),
            worldwide_artifact,
            started_at,
            finished_at: chrono::Utc::now(),
            outcomes,
        };

        tracing::info!(
            "🌍 Total {} fetched worldwide: {} ({} regions, {} failed) → {}",
            self.config.filter.brand,
            summary.total_records,
            summary.regions_processed,
            summary.regions_failed,
            summary.worldwide_artifact
        );

        Ok(summary)
    }
}

/// What a run would do with `config`: a settings summary followed by each
/// region's query, without touching the network or the file system.
pub fn dry_run_lines(config: &HarvestConfig) -> Vec<String> {
    let spec = config.query_spec();
    let regions = config.regions();

    let mut lines = vec![
        "📋 Configuration Summary:".to_string(),
        format!("  Endpoint: {}", config.source.endpoint),
        format!("  Filter: amenity={} brand={}", spec.category, spec.brand),
        format!("  Timeout: {}s", spec.timeout_seconds),
        format!("  Delay between regions: {}s", config.run.delay_seconds),
        format!("  Output: {}", config.output_path()),
        format!("  Regions: {}", regions.len()),
        String::new(),
    ];

    for region in &regions {
        lines.push(format!("# {}", region));
        lines.push(build_query(region, &spec));
    }
    lines
}
