use thiserror::Error;

/// Why a single region's fetch did not produce a usable response.
#[derive(Error, Debug)]
pub enum FetchFailure {
    #[error("network error: {0}")]
    Network(#[source] reqwest::Error),

    #[error("request timed out after {seconds}s")]
    Timeout { seconds: u64 },

    #[error("endpoint returned HTTP {0}")]
    Status(u16),

    #[error("malformed response body: {0}")]
    MalformedBody(String),
}

#[derive(Error, Debug)]
pub enum HarvestError {
    #[error("Fetch failed for {region}: {source}")]
    Fetch {
        region: String,
        #[source]
        source: FetchFailure,
    },

    #[error("Failed to write {artifact}: {source}")]
    Persist {
        artifact: String,
        #[source]
        source: Box<HarvestError>,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration error in {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Storage,
    Data,
    Configuration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl HarvestError {
    pub fn fetch(region: impl Into<String>, source: FetchFailure) -> Self {
        Self::Fetch {
            region: region.into(),
            source,
        }
    }

    pub fn persist(artifact: impl Into<String>, source: HarvestError) -> Self {
        Self::Persist {
            artifact: artifact.into(),
            source: Box::new(source),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Fetch { source, .. } => match source {
                FetchFailure::MalformedBody(_) => ErrorCategory::Data,
                _ => ErrorCategory::Network,
            },
            Self::Persist { .. } | Self::IoError(_) => ErrorCategory::Storage,
            Self::SerializationError(_) => ErrorCategory::Data,
            Self::ConfigError { .. }
            | Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => ErrorCategory::Configuration,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // 單一區域失敗不會中止整個執行
            Self::Fetch { .. } => ErrorSeverity::Medium,
            Self::SerializationError(_) => ErrorSeverity::High,
            Self::Persist { .. } | Self::IoError(_) => ErrorSeverity::Critical,
            Self::ConfigError { .. }
            | Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => ErrorSeverity::High,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::Fetch { region, source } => match source {
                FetchFailure::Timeout { seconds } => {
                    format!("The query for {} did not finish within {} seconds", region, seconds)
                }
                FetchFailure::Status(code) => {
                    format!("The data source rejected the query for {} (HTTP {})", region, code)
                }
                FetchFailure::Network(_) => {
                    format!("Could not reach the data source while fetching {}", region)
                }
                FetchFailure::MalformedBody(_) => {
                    format!("The data source sent an unreadable response for {}", region)
                }
            },
            Self::Persist { artifact, .. } => format!("Could not save results to {}", artifact),
            Self::IoError(e) => format!("File system error: {}", e),
            Self::SerializationError(_) => "Could not encode the results as JSON".to_string(),
            Self::ConfigError { message } => format!("Configuration problem: {}", message),
            Self::ConfigValidationError { field, message } => {
                format!("Configuration problem in '{}': {}", field, message)
            }
            Self::InvalidConfigValueError { field, reason, .. } => {
                format!("Invalid setting '{}': {}", field, reason)
            }
            Self::MissingConfigError { field } => format!("Missing setting '{}'", field),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::Fetch { source, .. } => match source {
                FetchFailure::Timeout { .. } => "Raise source.timeout_seconds or query a smaller region",
                FetchFailure::Status(429) => "The endpoint is rate limiting; increase run.delay_seconds",
                FetchFailure::Status(_) => "Check the endpoint URL and try the region again later",
                FetchFailure::Network(_) => "Check network connectivity and the endpoint URL",
                FetchFailure::MalformedBody(_) => "Verify the endpoint speaks the Overpass JSON format",
            },
            Self::Persist { .. } | Self::IoError(_) => {
                "Check that the output directory exists, is writable and has free space"
            }
            Self::SerializationError(_) => "Inspect the fetched data for non-finite coordinates",
            Self::ConfigError { .. }
            | Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => "Fix the configuration file or command line flags",
        }
    }
}

pub type Result<T> = std::result::Result<T, HarvestError>;
