//! Defines the configuration file of the quorum prover.

use std::{path::Path, str::FromStr};

use anyhow::Context;
use tracing::Level;

/// The top level configuration for the quorum prover.
#[derive(Clone, Debug, Default, serde::Deserialize, serde::Serialize)]
#[serde(deny_unknown_fields)]
#[allow(clippy::module_name_repetitions)]
pub struct ProverConfig {
    /// CometBFT RPC endpoint used when no url is passed on the command line.
    #[serde(default)]
    pub rpc_url: Option<String>,
    /// Recover votes on the rayon thread pool.
    #[serde(default)]
    pub parallel: bool,
    /// Logging configuration.
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

/// Logging configuration.
#[derive(Clone, Debug, serde::Deserialize, serde::Serialize)]
#[allow(clippy::module_name_repetitions)]
pub struct ObservabilityConfig {
    /// The log level, one of `trace`, `debug`, `info`, `warn` or `error`.
    #[serde(default = "default_level")]
    pub level: String,
}

fn default_level() -> String {
    "info".to_string()
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
        }
    }
}

impl ObservabilityConfig {
    /// Returns the configured log level, falling back to `INFO`.
    #[must_use]
    pub fn level(&self) -> Level {
        Level::from_str(&self.level).unwrap_or(Level::INFO)
    }
}

impl ProverConfig {
    /// Reads the configuration at `path`, or the defaults if no path is given.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or is not a valid
    /// configuration. Parse errors name the offending JSON path.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::parse(&contents)
    }

    /// Parses a JSON configuration.
    ///
    /// # Errors
    /// Returns an error with the JSON path of the first invalid field.
    pub fn parse(json: &str) -> anyhow::Result<Self> {
        let mut deserializer = serde_json::Deserializer::from_str(json);
        serde_path_to_error::deserialize(&mut deserializer)
            .map_err(|e| anyhow::anyhow!("config error at {}: {}", e.path(), e))
    }
}
