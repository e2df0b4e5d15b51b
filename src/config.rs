use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use directories::ProjectDirs;
use log::debug;
use thiserror::Error;

use crate::youtube::{DEFAULT_API_URL, DEFAULT_COMMENT_DELAY};

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("No API key given (use --api-key, set YTDUMP_API_KEY, or add \"api_key\" to {0})")]
    MissingApiKey(String),
}

/// Contents of the optional `config.json`
#[derive(Deserialize, Debug, Default)]
pub struct ConfigFile {
    pub api_key: Option<String>,
    pub api_url: Option<String>,
    pub comment_delay_ms: Option<u64>,
    pub video_id: Option<String>,
    pub channel_id: Option<String>,
}

impl ConfigFile {
    /// Read config file, treating a missing file as empty
    pub fn read(path: &Path) -> Result<ConfigFile> {
        if !path.exists() {
            debug!("No config file at {}", path.display());
            return Ok(ConfigFile::default());
        }
        debug!("Loading config from {}", path.display());
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let cf = serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        Ok(cf)
    }
}

/// Settings which can come from the command line or environment
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub api_key: Option<String>,
    pub api_url: Option<String>,
}

impl Overrides {
    fn from_env() -> Overrides {
        let var = |name: &str| std::env::var(name).ok().filter(|v| !v.is_empty());
        Overrides {
            api_key: var("YTDUMP_API_KEY"),
            api_url: var("YTDUMP_API_URL"),
        }
    }
}

#[derive(Debug)]
pub struct Config {
    pub api_key: String,
    pub api_url: String,
    pub comment_page_delay: Duration,
    pub video_id: Option<String>,
    pub channel_id: Option<String>,
}

impl Config {
    /// Combine command line arguments, environment and config file, in that order of precedence
    pub fn load(args: &Overrides) -> Result<Config> {
        let path = config_filepath();
        let file = match &path {
            Some(p) => ConfigFile::read(p)?,
            None => ConfigFile::default(),
        };
        let location = path
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "config.json".into());

        let cfg = Config::merge(args, &Overrides::from_env(), file, &location)?;
        Ok(cfg)
    }

    fn merge(
        args: &Overrides,
        env: &Overrides,
        file: ConfigFile,
        location: &str,
    ) -> Result<Config, ConfigError> {
        let api_key = args
            .api_key
            .clone()
            .or_else(|| env.api_key.clone())
            .or(file.api_key)
            .ok_or_else(|| ConfigError::MissingApiKey(location.into()))?;
        let api_url = args
            .api_url
            .clone()
            .or_else(|| env.api_url.clone())
            .or(file.api_url)
            .unwrap_or_else(|| DEFAULT_API_URL.into());
        let comment_page_delay = file
            .comment_delay_ms
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_COMMENT_DELAY);

        Ok(Config {
            api_key,
            api_url,
            comment_page_delay,
            video_id: file.video_id,
            channel_id: file.channel_id,
        })
    }
}

/// Directory holding `config.json`, overridable with `YTDUMP_CONFIG_DIR`
pub fn config_dir() -> Option<PathBuf> {
    if let Ok(dir) = std::env::var("YTDUMP_CONFIG_DIR") {
        return Some(dir.into());
    }
    ProjectDirs::from("", "", "ytdump").map(|pd| pd.config_dir().to_path_buf())
}

pub fn config_filepath() -> Option<PathBuf> {
    config_dir().map(|d| d.join("config.json"))
}
