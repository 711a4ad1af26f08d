//! CLI argument definitions for the Scribe router.
//!
//! Priority resolution: CLI args > env vars > config file > defaults.

use clap::Parser;
use std::path::PathBuf;

use scribe_core::ScribeConfig;

pub const CONFIG_ENV: &str = "SCRIBE_CONFIG";
pub const PORT_ENV: &str = "SCRIBE_PORT";

/// Scribe - routes writing-assistant requests to the matching model backend.
#[derive(Parser, Debug)]
#[command(name = "scribe", version, about)]
pub struct CliArgs {
    /// Path to the configuration file.
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,

    /// Address the API server binds to.
    #[arg(long = "host")]
    pub host: Option<String>,

    /// API server port.
    #[arg(short = 'p', long = "port")]
    pub port: Option<u16>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short = 'l', long = "log-level")]
    pub log_level: Option<String>,
}

impl CliArgs {
    /// Resolve the configuration file path.
    ///
    /// Priority: --config flag > SCRIBE_CONFIG env var > ~/.scribe/config.toml.
    pub fn resolve_config_path(&self) -> PathBuf {
        self.config_path_with(std::env::var(CONFIG_ENV).ok())
    }

    fn config_path_with(&self, env: Option<String>) -> PathBuf {
        if let Some(ref p) = self.config {
            return p.clone();
        }
        if let Some(p) = env.filter(|p| !p.is_empty()) {
            return PathBuf::from(p);
        }
        default_config_path()
    }

    /// Apply CLI and env overrides on top of a loaded config.
    pub fn apply(&self, config: &mut ScribeConfig) {
        self.apply_with(config, std::env::var(PORT_ENV).ok());
    }

    fn apply_with(&self, config: &mut ScribeConfig, port_env: Option<String>) {
        if let Some(ref host) = self.host {
            config.general.host = host.clone();
        }

        if let Some(port) = self.port {
            config.general.port = port;
        } else if let Some(port) = port_env.and_then(|v| v.parse::<u16>().ok()) {
            config.general.port = port;
        }

        if let Some(ref level) = self.log_level {
            config.general.log_level = level.clone();
        }
    }
}

/// Default config file path for the current platform.
fn default_config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    if let Ok(home) = std::env::var("USERPROFILE") {
        return PathBuf::from(home).join(".scribe").join("config.toml");
    }
    #[cfg(not(target_os = "windows"))]
    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(".scribe").join("config.toml");
    }
    PathBuf::from("config.toml")
}
