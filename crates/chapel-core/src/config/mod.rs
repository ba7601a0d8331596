use std::path::PathBuf;

use anyhow::Result;
use chrono_tz::Tz;
use config::{Config, Environment, File};
use serde::Deserialize;

use crate::error::{CoreError, CoreResult};

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub schedule: ScheduleConfig,
    #[serde(default)]
    pub events: EventsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub serve_origin: Option<String>,
}

impl ServerConfig {
    /// ## Summary
    /// Returns the server address as a string in the format "host:port".
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// ## Summary
    /// Returns the public origin URL, falling back to the bind address.
    #[must_use]
    pub fn origin(&self) -> String {
        self.serve_origin
            .clone()
            .unwrap_or_else(|| format!("http://{}", self.bind_addr()))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScheduleConfig {
    /// IANA zone name all occurrence arithmetic is pinned to.
    pub timezone: String,
    /// Skip events with an unknown frequency tag instead of failing the listing.
    pub skip_invalid_rules: bool,
    pub preview_limit: usize,
}

impl ScheduleConfig {
    /// ## Summary
    /// Resolves the configured zone name.
    ///
    /// ## Errors
    /// Returns `CoreError::ConfigError` if the name is not a known IANA zone.
    pub fn time_zone(&self) -> CoreResult<Tz> {
        self.timezone.parse::<Tz>().map_err(|err| {
            CoreError::ConfigError(format!("schedule.timezone {:?}: {err}", self.timezone))
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventsConfig {
    /// JSON file of event records loaded at startup.
    pub seed_path: Option<PathBuf>,
}

/// Environment prefix; keys look like `CHAPEL_SCHEDULE__TIMEZONE`.
const ENV_PREFIX: &str = "CHAPEL";
const CONFIG_FILE: &str = "config.toml";

/// Environment source read by [`Settings::load`].
fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
        .ignore_empty(true)
        .try_parsing(true)
}

impl Settings {
    /// ## Summary
    /// Loads configuration from environment variables and an optional `config.toml`.
    /// Environment variables take precedence over file values.
    ///
    /// Environment keys use the `CHAPEL_` prefix and `__` between sections,
    /// e.g. `CHAPEL_SCHEDULE__TIMEZONE`.
    ///
    /// ## Errors
    /// Returns an error if building the configuration, deserializing it, or
    /// resolving the schedule time zone fails.
    pub fn load() -> Result<Self> {
        Self::load_from(CONFIG_FILE, environment())
    }

    /// Layers defaults, the optional file at `config_file`, then `env`.
    fn load_from(config_file: &str, env: Environment) -> Result<Self> {
        let settings = Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8698)?
            .set_default("logging.level", "debug")?
            .set_default("schedule.timezone", "UTC")?
            .set_default("schedule.skip_invalid_rules", false)?
            .set_default("schedule.preview_limit", 8)?
            // TOML file
            .add_source(File::with_name(config_file).required(false))
            // Env
            .add_source(env)
            .build()?
            .try_deserialize::<Settings>()?;

        settings.validate()?;
        Ok(settings)
    }

    /// ## Summary
    /// Checks values that deserialize fine but cannot be used.
    ///
    /// ## Errors
    /// Returns `CoreError::ConfigError` for an unknown time zone or a zero preview limit.
    pub fn validate(&self) -> CoreResult<()> {
        let tz = self.schedule.time_zone()?;
        if self.schedule.preview_limit == 0 {
            return Err(CoreError::ConfigError(
                "schedule.preview_limit must be at least 1".to_string(),
            ));
        }
        tracing::debug!(
            %tz,
            preview_limit = self.schedule.preview_limit,
            skip_invalid_rules = self.schedule.skip_invalid_rules,
            "Schedule settings validated"
        );
        Ok(())
    }
}

/// ## Summary
/// Loads configuration from environment variables and `.env` file.
///
/// ## Errors
/// Returns an error if loading or deserializing the configuration fails.
pub fn load_config() -> Result<Settings> {
    dotenvy::dotenv().ok();

    Settings::load()
}
