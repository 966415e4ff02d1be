use std::time::Duration;

use anyhow::Context;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, File};
use serde::Deserialize;

use libraryfront_catalog::client::{DEFAULT_API_URL, DEFAULT_TIMEOUT};
use libraryfront_catalog::projection::{ProjectionConfig, SortKey, ALL};

const CONFIG_FILE: &str = "libraryfront";
const ENV_PREFIX: &str = "LIBRARYFRONT";

/// Settings read from `libraryfront.toml` and `LIBRARYFRONT_*` variables
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AppConfig {
    pub api_url: String,
    pub timeout_seconds: u64,
    pub search: String,
    pub status: String,
    pub type_filter: String,
    pub sort: String,
}

impl AppConfig {
    pub fn load() -> anyhow::Result<Self> {
        let builder = with_defaults(Config::builder())?
            .add_source(File::with_name(CONFIG_FILE).required(false))
            .add_source(Environment::with_prefix(ENV_PREFIX));
        from_builder(builder)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    /// Initial filters of the books list
    pub fn projection(&self) -> ProjectionConfig {
        ProjectionConfig {
            query: self.search.clone(),
            status_filter: self.status.clone(),
            type_filter: self.type_filter.clone(),
            sort_key: SortKey::parse(&self.sort),
        }
    }
}

fn with_defaults(
    builder: ConfigBuilder<DefaultState>,
) -> anyhow::Result<ConfigBuilder<DefaultState>> {
    let builder = builder
        .set_default("api_url", DEFAULT_API_URL)?
        .set_default("timeout_seconds", DEFAULT_TIMEOUT.as_secs())?
        .set_default("search", "")?
        .set_default("status", ALL)?
        .set_default("type_filter", ALL)?
        .set_default("sort", SortKey::default().as_str())?;
    Ok(builder)
}

fn from_builder(builder: ConfigBuilder<DefaultState>) -> anyhow::Result<AppConfig> {
    builder
        .build()
        .context("Failed to read configuration")?
        .try_deserialize()
        .context("Invalid configuration")
}
