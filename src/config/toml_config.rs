use crate::config::regions::DEFAULT_REGIONS;
use crate::core::fetch::DEFAULT_ENDPOINT;
use crate::domain::model::{QuerySpec, Region};
use crate::utils::error::{HarvestError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;
use std::time::Duration;

const MAX_TIMEOUT_SECONDS: u64 = 86_400;

/// Full harvest configuration. Every section is optional in the TOML file;
/// missing keys fall back to the built-in Burger King run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HarvestConfig {
    pub source: SourceConfig,
    pub filter: FilterConfig,
    pub run: RunConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub endpoint: String,
    pub timeout_seconds: u64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout_seconds: 1800,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    pub category: String,
    pub brand: String,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            category: "fast_food".to_string(),
            brand: "Burger King".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub regions: Vec<String>,
    pub delay_seconds: u64,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            regions: DEFAULT_REGIONS.iter().map(|r| r.to_string()).collect(),
            delay_seconds: 5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub output_path: String,
    pub file_prefix: String,
    pub id_prefix: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            output_path: "./output".to_string(),
            file_prefix: "burgerking".to_string(),
            id_prefix: "bk".to_string(),
        }
    }
}

impl HarvestConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(|e| HarvestError::ConfigError {
            message: format!("cannot read {}: {}", path.as_ref().display(), e),
        })?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| HarvestError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${OVERPASS_URL})；未定義的保留原樣
    fn substitute_env_vars(content: &str) -> String {
        static ENV_VAR: OnceLock<Regex> = OnceLock::new();
        let re = ENV_VAR.get_or_init(|| {
            Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("static pattern is valid")
        });

        re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .into_owned()
    }

    pub fn query_spec(&self) -> QuerySpec {
        QuerySpec {
            category: self.filter.category.clone(),
            brand: self.filter.brand.clone(),
            timeout_seconds: self.source.timeout_seconds,
        }
    }

    pub fn regions(&self) -> Vec<Region> {
        self.run.regions.iter().map(|r| Region::new(r.as_str())).collect()
    }

    pub fn pacing(&self) -> Duration {
        Duration::from_secs(self.run.delay_seconds)
    }

    pub fn output_path(&self) -> &str {
        &self.output.output_path
    }
}

impl Validate for HarvestConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_url("source.endpoint", &self.source.endpoint)?;
        validation::validate_range("source.timeout_seconds", self.source.timeout_seconds, 1, MAX_TIMEOUT_SECONDS)?;

        validation::validate_non_empty_string("filter.category", &self.filter.category)?;
        validation::validate_non_empty_string("filter.brand", &self.filter.brand)?;

        if self.run.regions.is_empty() {
            return Err(HarvestError::MissingConfigError {
                field: "run.regions".to_string(),
            });
        }
        for region in &self.run.regions {
            validation::validate_non_empty_string("run.regions", region)?;
        }

        validation::validate_path("output.output_path", &self.output.output_path)?;
        validation::validate_file_component("output.file_prefix", &self.output.file_prefix)?;
        validation::validate_non_empty_string("output.id_prefix", &self.output.id_prefix)?;

        Ok(())
    }
}
