use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

use crate::core::{PreferenceStrategy, RejectionPolicy};
use crate::models::Group;

/// Driver configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub pool: PoolSettings,
    #[serde(default)]
    pub matching: MatchingSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PoolSettings {
    #[serde(default = "default_pool_size")]
    pub size: usize,
    #[serde(default = "default_strategy")]
    pub strategy: PreferenceStrategy,
    /// Seed for the randomized strategy; fresh entropy when unset
    pub seed: Option<u64>,
    /// TOML file with explicit lists for the custom strategy
    pub custom_file: Option<String>,
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            size: default_pool_size(),
            strategy: default_strategy(),
            seed: None,
            custom_file: None,
        }
    }
}

fn default_pool_size() -> usize { 4 }
fn default_strategy() -> PreferenceStrategy { PreferenceStrategy::WorstCase }

/// What the driver does with the pool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Run Gale-Shapley and report the result
    Match,
    /// Brute-force count the stable matchings
    Count,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MatchingSettings {
    #[serde(default = "default_mode")]
    pub mode: Mode,
    #[serde(default = "default_proposing_group")]
    pub proposing_group: Group,
    #[serde(default)]
    pub rejection_policy: RejectionPolicy,
    /// Largest pool the driver will brute-force
    #[serde(default = "default_max_brute_force_size")]
    pub max_brute_force_size: usize,
}

impl Default for MatchingSettings {
    fn default() -> Self {
        Self {
            mode: default_mode(),
            proposing_group: default_proposing_group(),
            rejection_policy: RejectionPolicy::default(),
            max_brute_force_size: default_max_brute_force_size(),
        }
    }
}

fn default_mode() -> Mode { Mode::Match }
fn default_proposing_group() -> Group { Group::A }
fn default_max_brute_force_size() -> usize { 9 }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
    /// `text` or `json` for the final report
    #[serde(default = "default_report_format")]
    pub report: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            report: default_report_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "pretty".to_string() }
fn default_report_format() -> String { "text".to_string() }

impl Settings {
    /// Load configuration from files, environment variables and explicit overrides
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (`path`, or config/default.toml then config/local.toml)
    /// 3. Environment variables (prefixed with STABLE_MATCH)
    /// 4. `overrides` as `(key, value)` pairs, e.g. from command line flags
    /// 5. `LOG_LEVEL` and `LOG_FORMAT`
    pub fn load_with(path: Option<&Path>, overrides: &[(&str, String)]) -> Result<Self, ConfigError> {
        let builder = match path {
            Some(path) => Config::builder().add_source(File::from(path)),
            None => Config::builder()
                .add_source(File::with_name("config/default").required(false))
                .add_source(File::with_name("config/local").required(false)),
        };

        // e.g., STABLE_MATCH__POOL__SIZE -> pool.size
        let mut builder = builder.add_source(environment());
        for (key, value) in overrides {
            builder = builder.set_override(*key, value.as_str())?;
        }

        apply_log_overrides(builder.build()?)?.try_deserialize()
    }
}

fn environment() -> Environment {
    Environment::with_prefix("STABLE_MATCH")
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}

/// `LOG_LEVEL` and `LOG_FORMAT` win over every other source
fn apply_log_overrides(settings: Config) -> Result<Config, ConfigError> {
    use std::env;

    let mut builder = Config::builder().add_source(settings);

    if let Ok(level) = env::var("LOG_LEVEL") {
        builder = builder.set_override("logging.level", level)?;
    }
    if let Ok(format) = env::var("LOG_FORMAT") {
        builder = builder.set_override("logging.format", format)?;
    }

    builder.build()
}
