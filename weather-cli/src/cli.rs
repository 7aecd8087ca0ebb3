use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use inquire::Password;
use weather_core::{
    Config, ForecastOverride, ForecastResolver, OverridePayload, SqliteOverrideStore, Validator,
    model::DATE_FORMAT, provider_from_config, validate::validate_city,
};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "Weather CLI")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key in the config file.
    Configure,

    /// Show current temperature and local time for a city.
    Current {
        city: String,
    },

    /// Show the min/max forecast for a city on a date.
    Forecast {
        city: String,

        /// Date as DD.MM.YYYY, at most 10 days ahead.
        #[arg(long)]
        date: String,
    },

    /// Override the forecast for a city on a date.
    Override {
        city: String,

        /// Date as DD.MM.YYYY, at most 10 days ahead.
        #[arg(long)]
        date: String,

        #[arg(long, allow_negative_numbers = true)]
        min: f64,

        #[arg(long, allow_negative_numbers = true)]
        max: f64,
    },

    /// List stored overrides.
    Overrides {
        /// Only show overrides for this city.
        #[arg(long)]
        city: Option<String>,
    },
}

impl Cli {
    pub async fn run(self, mut cfg: Config) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => {
                let key = Password::new("OpenWeather API key:")
                    .without_confirmation()
                    .prompt()
                    .context("Failed to read API key")?;
                cfg.set_api_key(key.trim().to_string());
                cfg.save()?;
                println!("Saved configuration to {}", Config::config_file_path()?.display());
            }
            Command::Current { city } => {
                let city = validate_city(Some(&city))?;
                let current = resolver(&cfg).await?.get_current(&city).await?;
                println!(
                    "{city}: {:.1} °C, local time {}",
                    current.temperature, current.local_time
                );
            }
            Command::Forecast { city, date } => {
                let resolver = resolver(&cfg).await?;
                let city = validate_city(Some(&city))?;
                let date = resolver.validator().validate_forecast_date(Some(&date))?;
                let range = resolver.get_forecast(&city, date).await?;
                println!(
                    "{city} on {}: min {:.1} °C, max {:.1} °C",
                    date.format(DATE_FORMAT),
                    range.min_temperature,
                    range.max_temperature
                );
            }
            Command::Override {
                city,
                date,
                min,
                max,
            } => {
                let payload = OverridePayload {
                    city: Some(city),
                    date: Some(date),
                    min_temperature: Some(min),
                    max_temperature: Some(max),
                };
                let stored = resolver(&cfg).await?.upsert_override(&payload).await?;
                println!("Stored override: {}", describe(&stored));
            }
            Command::Overrides { city } => {
                let rows = resolver(&cfg).await?.list_overrides(city.as_deref()).await?;
                if rows.is_empty() {
                    println!("No overrides stored.");
                }
                for row in &rows {
                    println!("{}", describe(row));
                }
            }
        }

        Ok(())
    }
}

async fn resolver(cfg: &Config) -> anyhow::Result<ForecastResolver> {
    let provider = provider_from_config(cfg)?;
    let url = cfg.database_url()?;
    let store = SqliteOverrideStore::connect(&url)
        .await
        .with_context(|| format!("Failed to open override store at {url}"))?;

    Ok(ForecastResolver::new(
        Arc::new(provider),
        Arc::new(store),
        Validator::default(),
    ))
}

fn describe(ov: &ForecastOverride) -> String {
    format!(
        "{} {}  min {:.1} °C  max {:.1} °C",
        ov.city,
        ov.date.format(DATE_FORMAT),
        ov.min_temperature,
        ov.max_temperature
    )
}
