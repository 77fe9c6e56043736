//! Twinkle configuration file handling

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use twinkle_widgets::StarRatingStyle;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse configuration")]
    Parse(#[from] toml::de::Error),
}

/// Top-level Twinkle configuration (twinkle.toml)
#[derive(Debug, Default, Clone, PartialEq, Deserialize, Serialize)]
pub struct TwinkleConfig {
    #[serde(default)]
    pub page: PageConfig,
    #[serde(default)]
    pub rating: StarRatingStyle,
}

/// Chat page text
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PageConfig {
    #[serde(default = "default_title")]
    pub title: String,
    /// First bot message shown on the page
    #[serde(default = "default_greeting")]
    pub greeting: String,
    /// Bot message placed above each rating request
    #[serde(default = "default_rating_prompt")]
    pub rating_prompt: String,
}

fn default_title() -> String {
    "Support chat".to_string()
}

fn default_greeting() -> String {
    "Hi! How can I help you today?".to_string()
}

fn default_rating_prompt() -> String {
    "How would you rate this conversation?".to_string()
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            greeting: default_greeting(),
            rating_prompt: default_rating_prompt(),
        }
    }
}

impl TwinkleConfig {
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(input)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&raw)?;
        tracing::debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }
}
