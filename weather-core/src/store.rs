use async_trait::async_trait;
use chrono::NaiveDate;
use std::fmt::Debug;

use crate::{error::Result, model::ForecastOverride};

pub mod memory;
pub mod sqlite;

pub use memory::MemoryOverrideStore;
pub use sqlite::SqliteOverrideStore;

/// Persistent forecast overrides keyed by (city, date).
///
/// Implementations must make `upsert` a single atomic write: concurrent writers
/// for the same key leave exactly one row behind.
#[async_trait]
pub trait OverrideStore: Send + Sync + Debug {
    async fn get(&self, city: &str, date: NaiveDate) -> Result<Option<ForecastOverride>>;

    /// Insert, or replace min/max for an existing (city, date). Returns the stored row.
    async fn upsert(&self, value: &ForecastOverride) -> Result<ForecastOverride>;

    /// All overrides ordered by city then date, optionally limited to one city.
    async fn list(&self, city: Option<&str>) -> Result<Vec<ForecastOverride>>;
}
