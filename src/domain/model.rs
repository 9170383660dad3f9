use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A named area the remote source can resolve, e.g. "Costa Rica".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region(String);

impl Region {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }

    /// 檔名用: 空白與路徑分隔符換成底線
    pub fn file_stem(&self) -> String {
        self.0.replace([' ', '/', '\\'], "_")
    }
}

impl std::fmt::Display for Region {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Filter applied to every region of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuerySpec {
    /// Value of the `amenity` tag, e.g. `fast_food`.
    pub category: String,
    /// Value of the `brand` tag, e.g. `Burger King`.
    pub brand: String,
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeatureKind {
    Node,
    Way,
    Relation,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

/// One element as returned by the source. Points carry `lat`/`lon`,
/// ways and relations carry `center` when `out center` was requested.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawFeature {
    #[serde(rename = "type")]
    pub kind: FeatureKind,
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lon: Option<f64>,
    #[serde(default)]
    pub center: Option<Coordinate>,
    #[serde(default)]
    pub tags: HashMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SourceResponse {
    #[serde(default)]
    pub elements: Vec<RawFeature>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationRecord {
    pub id: String,
    pub lat: f64,
    pub lon: f64,
}

/// Run-scoped state threaded through every region step.
#[derive(Debug, Clone, Default)]
pub struct RunContext {
    pub next_id: u64,
    pub aggregate: Vec<LocationRecord>,
}

impl RunContext {
    pub fn new() -> Self {
        Self::default()
    }
}

#[derive(Debug)]
pub enum RegionOutcome {
    Saved { count: usize, artifact: String },
    PersistFailed { count: usize, error: String },
    FetchFailed { error: String },
}

impl RegionOutcome {
    pub fn record_count(&self) -> usize {
        match self {
            Self::Saved { count, .. } | Self::PersistFailed { count, .. } => *count,
            Self::FetchFailed { .. } => 0,
        }
    }

    pub fn is_fetch_failure(&self) -> bool {
        matches!(self, Self::FetchFailed { .. })
    }
}

#[derive(Debug)]
pub struct RunSummary {
    pub regions_processed: usize,
    pub regions_failed: usize,
    pub total_records: usize,
    pub worldwide_artifact: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub outcomes: Vec<(Region, RegionOutcome)>,
}
