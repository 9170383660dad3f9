pub mod engine;
pub mod fetch;
pub mod normalize;
pub mod persist;
pub mod query;

#[cfg(test)]
pub(crate) mod testing;

pub use crate::domain::model::{LocationRecord, QuerySpec, Region, RunContext, RunSummary};
pub use crate::domain::ports::{FeatureSource, Storage, TokioWaiter, Waiter};
pub use crate::utils::error::Result;
