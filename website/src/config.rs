use clap::Parser;
use serde::Deserialize;
use snafu::{ResultExt, ensure};
use std::fs;
use std::path::PathBuf;

use crate::Result;
use crate::error::{ConfigFileSnafu, ConfigParseSnafu, ConfigSnafu};

#[derive(Clone, Debug, Deserialize)]
pub struct Config {
    pub port: u16,

    #[serde(default)]
    pub ssl: bool,

    #[serde(default = "default_api_url")]
    pub api_url: String,

    #[serde(default = "default_session_max_age")]
    pub session_max_age_minutes: i64,
}

fn default_api_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_session_max_age() -> i64 {
    60 * 24
}

impl Config {
    pub fn build(filename: &PathBuf) -> Result<Config> {
        let toml_string = fs::read_to_string(filename).context(ConfigFileSnafu)?;
        Self::parse(&toml_string)
    }

    pub fn parse(toml_string: &str) -> Result<Config> {
        let mut config: Config = toml::from_str(toml_string).context(ConfigParseSnafu)?;

        // Validate config values
        ensure!(
            config.port > 0,
            ConfigSnafu {
                msg: "Server port is required.".to_string()
            }
        );
        ensure!(
            !config.api_url.trim().is_empty(),
            ConfigSnafu {
                msg: "API URL is required.".to_string()
            }
        );
        ensure!(
            config.session_max_age_minutes > 0,
            ConfigSnafu {
                msg: "Session max age must be positive.".to_string()
            }
        );

        config.api_url = config.api_url.trim().trim_end_matches('/').to_string();
        Ok(config)
    }
}

/// Pet Society web tier
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[arg(short, long, value_name = "config.toml")]
    pub config: PathBuf,
}
