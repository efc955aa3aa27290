//! Server configuration, read from environment variables.

use std::env;
use thiserror::Error;
use tiltbec::render::RenderConfig;

/// Default bind address.
pub const DEF_BIND_ADDRESS: &str = "127.0.0.1:8000";

/// Returned when an environment variable holds an unusable value.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {var}: {value:?}")]
    Invalid { var: &'static str, value: String },
}

/// Server configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// Address the server listens on (`BIND_ADDRESS`).
    pub bind_address: String,
    /// Canvas size of the rendered figure (`PLOT_WIDTH`, `PLOT_HEIGHT`).
    pub render: RenderConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_address: DEF_BIND_ADDRESS.to_string(),
            render: RenderConfig::default(),
        }
    }
}

fn parse_dim<F>(lookup: &mut F, var: &'static str, default: u32)
    -> Result<u32, ConfigError>
where F: FnMut(&str) -> Option<String>
{
    match lookup(var) {
        None => Ok(default),
        Some(value) => {
            let parsed: Result<u32, _> = value.trim().parse();
            parsed.map_err(|_| ConfigError::Invalid { var, value })
        },
    }
}

impl Config {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| env::var(var).ok())
    }

    /// Load configuration from an arbitrary variable lookup; unset variables
    /// take their defaults.
    pub fn from_lookup<F>(mut lookup: F) -> Result<Self, ConfigError>
    where F: FnMut(&str) -> Option<String>
    {
        let def = Self::default();
        let bind_address
            = lookup("BIND_ADDRESS")
            .filter(|addr| !addr.trim().is_empty())
            .unwrap_or(def.bind_address);
        let width = parse_dim(&mut lookup, "PLOT_WIDTH", def.render.width)?;
        let height = parse_dim(&mut lookup, "PLOT_HEIGHT", def.render.height)?;
        Ok(Self { bind_address, render: RenderConfig { width, height } })
    }
}
