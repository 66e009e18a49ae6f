//! Configuration loading.
//!
//! Settings come from an optional TOML file. `DATABASE_URL` in the
//! environment takes precedence over the file's `database_url`.

use std::path::Path;

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::metrics::TierScale;

/// Longest trailing windows a dashboard will chart.
const MAX_TREND_DAYS: u32 = 3660;
const MAX_TREND_MONTHS: u32 = 1200;

#[derive(Debug, Deserialize, Default)]
pub struct Config {
    /// Postgres connection string for the record source
    #[serde(default)]
    pub database_url: Option<String>,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub metrics: MetricsConfig,

    /// Performance tiers, strictest first
    #[serde(default)]
    pub tiers: TierScale,
}

#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Display conventions and trend window sizes.
#[derive(Debug, Deserialize)]
pub struct MetricsConfig {
    #[serde(default = "default_rate_decimals")]
    pub rate_decimals: u32,

    #[serde(default)]
    pub amount_decimals: u32,

    #[serde(default = "default_trend_days")]
    pub trend_days: u32,

    #[serde(default = "default_trend_months")]
    pub trend_months: u32,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            rate_decimals: default_rate_decimals(),
            amount_decimals: 0,
            trend_days: default_trend_days(),
            trend_months: default_trend_months(),
        }
    }
}

fn default_rate_decimals() -> u32 {
    1
}

fn default_trend_days() -> u32 {
    7
}

fn default_trend_months() -> u32 {
    6
}

impl Config {
    /// Loads `path` if given, otherwise the built-in defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::load_from(path)?,
            None => Self::default(),
        };
        if let Ok(url) = std::env::var("DATABASE_URL") {
            config.database_url = Some(url);
        }
        config.validate()?;
        Ok(config)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    fn validate(&self) -> Result<()> {
        if self.metrics.rate_decimals > 6 || self.metrics.amount_decimals > 6 {
            return Err(Error::Config(
                "rate_decimals and amount_decimals must be at most 6".to_string(),
            ));
        }
        if self.metrics.trend_days > MAX_TREND_DAYS {
            return Err(Error::Config(format!("trend_days must be at most {MAX_TREND_DAYS}")));
        }
        if self.metrics.trend_months > MAX_TREND_MONTHS {
            return Err(Error::Config(format!("trend_months must be at most {MAX_TREND_MONTHS}")));
        }
        if self
            .tiers
            .rules
            .iter()
            .any(|rule| !rule.min_primary.is_finite() || !rule.min_secondary.is_finite())
        {
            return Err(Error::Config(
                "tier minimums must be finite numbers".to_string(),
            ));
        }
        Ok(())
    }

    pub fn database_url(&self) -> Result<&str> {
        self.database_url.as_deref().ok_or_else(|| {
            Error::Config("DATABASE_URL must be set to a production Postgres instance".to_string())
        })
    }
}
