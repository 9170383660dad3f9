pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use config::{cli::LocalStorage, toml_config::HarvestConfig};
pub use crate::core::{engine::HarvestEngine, fetch::OverpassClient};
pub use domain::ports::TokioWaiter;
pub use utils::error::{HarvestError, Result};
