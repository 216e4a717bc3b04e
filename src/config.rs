use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use ytved_core::deps::Libraries;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Could not read config file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Malformed config file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Settings of the service, read from `config.toml` and overridden from the command line.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub host: String,
    pub port: u16,
    pub download_dir: PathBuf,
    pub yt_dlp_path: PathBuf,
    pub ffmpeg_path: PathBuf,
    /// Kills yt-dlp after this many seconds, unset to let it run.
    pub timeout_secs: Option<u64>,
    /// Gives every download its own subdirectory.
    pub isolate_downloads: bool,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            download_dir: PathBuf::from("./downloads"),
            yt_dlp_path: PathBuf::from("yt-dlp"),
            ffmpeg_path: PathBuf::from("ffmpeg"),
            timeout_secs: None,
            isolate_downloads: false,
        }
    }
}

impl ServiceConfig {
    /// `<config dir>/ytved/config.toml`, if the platform has a config directory.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("ytved").join("config.toml"))
    }

    /// Reads the config file, a missing or empty file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.is_file() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// The settings handed to the downloader.
    pub fn core_config(&self) -> ytved_core::Config {
        let libraries = Libraries::new(self.yt_dlp_path.clone(), self.ffmpeg_path.clone());

        let mut config = ytved_core::Config::new(self.download_dir.clone(), libraries);
        config.timeout = self.timeout_secs.map(Duration::from_secs);
        config.isolate_downloads = self.isolate_downloads;
        config
    }
}
