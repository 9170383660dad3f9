pub mod cli;
pub mod regions;
pub mod toml_config;

#[cfg(feature = "cli")]
use crate::config::toml_config::HarvestConfig;
#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use clap::Parser;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "poi-harvest")]
#[command(about = "Collect brand locations per country from the Overpass API")]
pub struct CliConfig {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Overpass interpreter URL
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Directory the JSON artifacts are written to
    #[arg(long)]
    pub output_path: Option<String>,

    /// Comma separated region names, replacing the configured list
    #[arg(long, value_delimiter = ',')]
    pub regions: Vec<String>,

    /// Seconds to wait between regions
    #[arg(long)]
    pub delay_seconds: Option<u64>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub json_logs: bool,

    /// Print the queries that would be sent without fetching anything
    #[arg(long)]
    pub dry_run: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// Load the file (or defaults) and apply command line overrides on top.
    pub fn resolve(&self) -> Result<HarvestConfig> {
        let mut config = match &self.config {
            Some(path) => HarvestConfig::from_file(path)?,
            None => HarvestConfig::default(),
        };
        self.apply_overrides(&mut config);
        Ok(config)
    }

    pub fn apply_overrides(&self, config: &mut HarvestConfig) {
        if let Some(endpoint) = &self.endpoint {
            config.source.endpoint = endpoint.clone();
        }
        if let Some(output_path) = &self.output_path {
            config.output.output_path = output_path.clone();
        }
        if !self.regions.is_empty() {
            config.run.regions = self.regions.iter().map(|r| r.trim().to_string()).collect();
        }
        if let Some(delay) = self.delay_seconds {
            config.run.delay_seconds = delay;
        }
    }
}
