use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Value reported for a recognized key that is missing from the
/// config file.
pub const NOT_SET: &str = "Not set";

/// Where things live for the running process. Resolved from the
/// environment once at startup.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub config_path: PathBuf,
    pub history_dir: PathBuf,
    pub api_hostname: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        let storage_path = env::var("KAI_STORAGE_PATH").unwrap_or("./".to_string());
        let storage_path = PathBuf::from(storage_path);
        let config_path = storage_path.join("config.yml");
        let history_dir = storage_path.join("history");
        let api_hostname =
            env::var("KAI_LLM_HOST").unwrap_or_else(|_| "https://api.openai.com".to_string());

        Self {
            config_path,
            history_dir,
            api_hostname,
        }
    }
}

/// Flat `key: value` settings read from the config file. Loaded once
/// when a session starts and never changed afterwards.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Config {
    values: HashMap<String, String>,
}

impl Config {
    /// Splits each line at the first colon. Lines without one are
    /// skipped. Keys that aren't recognized are kept anyway.
    pub fn parse(text: &str) -> Self {
        let values = text
            .lines()
            .filter_map(|line| line.split_once(':'))
            .map(|(key, value)| (key.trim().to_string(), value.trim().to_string()))
            .collect();

        Self { values }
    }

    /// A missing file is not an error, it just means nothing is
    /// configured yet.
    pub fn load(path: &Path) -> Result<Self> {
        match read_raw(path)? {
            Some(text) => Ok(Self::parse(&text)),
            None => {
                tracing::warn!("Config file not found at {}", path.display());
                Ok(Self::default())
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn api_key(&self) -> &str {
        self.get("api_key").unwrap_or(NOT_SET)
    }

    pub fn model_name(&self) -> &str {
        self.get("model_name").unwrap_or(NOT_SET)
    }

    /// `null` is what an empty YAML value reads as, so it counts as
    /// unset too.
    pub fn has_api_key(&self) -> bool {
        let key = self.api_key();
        key != NOT_SET && key != "null"
    }

    pub fn status(&self) -> String {
        let api_key_status = if self.has_api_key() {
            "API Key: Configured"
        } else {
            "API Key: Not Configured"
        };
        format!("{}\nModel Name: {}", api_key_status, self.model_name())
    }
}

/// Raw text of the config file for viewing, or `None` if it doesn't
/// exist.
pub fn read_raw(path: &Path) -> Result<Option<String>> {
    if !path.exists() {
        return Ok(None);
    }
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    Ok(Some(text))
}
