use crate::error::Result;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::Path;

/// Environment variables the lookup API credentials arrive through. The
/// run assumes they are present; their absence is a startup precondition
/// failure, not a pipeline error.
pub const REQUIRED_ENV_VARS: [&str; 3] = [
    "SODA_AUTH_USERNAME",
    "SODA_AUTH_PASSWORD",
    "SODA_AUTH_TOKEN",
];

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub http: HttpConfig,
    pub probe: ProbeConfig,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Finite per-request timeout for every HTTP call the run makes.
    pub timeout_seconds: u64,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ProbeConfig {
    /// How many reachability probes may be in flight at once.
    pub workers: usize,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self { timeout_seconds: 10 }
    }
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self { workers: 8 }
    }
}

impl Config {
    /// Load `config.toml` from the working directory, falling back to
    /// defaults when the file does not exist.
    pub fn load() -> Result<Self> {
        Self::load_from(Path::new("config.toml"))
    }

    fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }
}

/// Names of required environment variables that are unset or blank,
/// checked once at startup before any business logic runs.
pub fn missing_env_vars() -> Vec<String> {
    REQUIRED_ENV_VARS
        .iter()
        .copied()
        .filter(|name| env::var(name).map(|v| v.trim().is_empty()).unwrap_or(true))
        .map(str::to_string)
        .collect()
}
