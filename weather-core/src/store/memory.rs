use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

use crate::{error::Result, model::ForecastOverride, store::OverrideStore};

type Key = (String, NaiveDate);

/// Process-local store; contents are lost on exit.
#[derive(Debug, Default)]
pub struct MemoryOverrideStore {
    rows: RwLock<BTreeMap<Key, ForecastOverride>>,
}

impl MemoryOverrideStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.rows.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.rows.read().await.is_empty()
    }
}

#[async_trait]
impl OverrideStore for MemoryOverrideStore {
    async fn get(&self, city: &str, date: NaiveDate) -> Result<Option<ForecastOverride>> {
        let rows = self.rows.read().await;
        Ok(rows.get(&(city.to_string(), date)).cloned())
    }

    async fn upsert(&self, value: &ForecastOverride) -> Result<ForecastOverride> {
        let mut rows = self.rows.write().await;
        rows.insert((value.city.clone(), value.date), value.clone());
        Ok(value.clone())
    }

    async fn list(&self, city: Option<&str>) -> Result<Vec<ForecastOverride>> {
        let rows = self.rows.read().await;
        Ok(rows
            .values()
            .filter(|row| city.is_none_or(|c| row.city == c))
            .cloned()
            .collect())
    }
}
