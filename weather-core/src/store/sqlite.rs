use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{
    Pool, Row, Sqlite,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow},
};
use std::str::FromStr;
use tracing::debug;

use crate::{error::Result, model::ForecastOverride, store::OverrideStore};

pub type SqlitePool = Pool<Sqlite>;

/// Schema for the override table. `(city, date)` is unique; `date` is stored
/// as ISO-8601 text.
pub const SQLITE_INIT: &str = r#"
CREATE TABLE IF NOT EXISTS weather_override (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    city VARCHAR(100) NOT NULL,
    date TEXT NOT NULL,
    min_temperature REAL NOT NULL,
    max_temperature REAL NOT NULL,
    CONSTRAINT unique_city_date UNIQUE (city, date)
);

CREATE INDEX IF NOT EXISTS idx_weather_override_date ON weather_override(date);
"#;

#[derive(Debug, Clone)]
pub struct SqliteOverrideStore {
    pool: SqlitePool,
}

impl SqliteOverrideStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Open (creating if missing) the database at `url` and ensure the schema.
    pub async fn connect(url: &str) -> Result<Self> {
        let opts = SqliteConnectOptions::from_str(url)?.create_if_missing(true);
        let mut pool_opts = SqlitePoolOptions::new();
        if url.contains(":memory:") {
            // Each connection to an in-memory database sees its own database.
            pool_opts = pool_opts
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None);
        }
        let pool = pool_opts.connect_with(opts).await?;

        let store = Self::new(pool);
        store.init_schema().await?;
        Ok(store)
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn init_schema(&self) -> Result<()> {
        for stmt in SQLITE_INIT.split(';') {
            let s = stmt.trim();
            if s.is_empty() {
                continue;
            }
            sqlx::query(s).execute(&self.pool).await?;
        }
        Ok(())
    }
}

fn from_row(row: &SqliteRow) -> Result<ForecastOverride> {
    Ok(ForecastOverride {
        city: row.try_get("city")?,
        date: row.try_get("date")?,
        min_temperature: row.try_get("min_temperature")?,
        max_temperature: row.try_get("max_temperature")?,
    })
}

#[async_trait]
impl OverrideStore for SqliteOverrideStore {
    async fn get(&self, city: &str, date: NaiveDate) -> Result<Option<ForecastOverride>> {
        let row = sqlx::query(
            "SELECT city, date, min_temperature, max_temperature \
             FROM weather_override WHERE city = ? AND date = ?",
        )
        .bind(city)
        .bind(date)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(from_row).transpose()
    }

    async fn upsert(&self, value: &ForecastOverride) -> Result<ForecastOverride> {
        debug!(city = %value.city, date = %value.date, "upserting forecast override");

        let row = sqlx::query(
            r#"
            INSERT INTO weather_override (city, date, min_temperature, max_temperature)
            VALUES (?, ?, ?, ?)
            ON CONFLICT(city, date) DO UPDATE SET
                min_temperature=excluded.min_temperature,
                max_temperature=excluded.max_temperature
            RETURNING city, date, min_temperature, max_temperature
            "#,
        )
        .bind(&value.city)
        .bind(value.date)
        .bind(value.min_temperature)
        .bind(value.max_temperature)
        .fetch_one(&self.pool)
        .await?;

        from_row(&row)
    }

    async fn list(&self, city: Option<&str>) -> Result<Vec<ForecastOverride>> {
        let rows = sqlx::query(
            "SELECT city, date, min_temperature, max_temperature \
             FROM weather_override WHERE (?1 IS NULL OR city = ?1) \
             ORDER BY city, date",
        )
        .bind(city)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(from_row).collect()
    }
}
