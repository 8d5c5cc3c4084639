use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

use crate::error::AlbumupError;
use crate::models::directive::UploadDirective;

/// Top-level albumup configuration, stored at `~/.albumup/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlbumupConfig {
    /// Base URL of the photo library API.
    #[serde(default = "default_api_url")]
    pub api_url: Url,

    /// Whether to extend albums that already exist. Unset means ask.
    #[serde(default)]
    pub add_if_exists: Option<bool>,

    /// Maximum number of upload tokens attached to an album per call.
    #[serde(default = "default_attach_batch_size")]
    pub attach_batch_size: usize,

    /// Page size used when listing albums.
    #[serde(default = "default_album_page_size")]
    pub album_page_size: u32,

    /// Pause between two file uploads, in milliseconds.
    #[serde(default)]
    pub upload_delay_ms: u64,

    /// Show a progress bar per album.
    #[serde(default = "default_show_progress")]
    pub show_progress: bool,

    /// Extra file extensions (without the dot) treated as photos.
    #[serde(default)]
    pub extra_extensions: Vec<String>,
}

fn default_api_url() -> Url {
    Url::parse("https://photoslibrary.googleapis.com/v1").unwrap()
}

fn default_attach_batch_size() -> usize {
    50
}

fn default_album_page_size() -> u32 {
    50
}

fn default_show_progress() -> bool {
    true
}

impl Default for AlbumupConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            add_if_exists: None,
            attach_batch_size: 50,
            album_page_size: 50,
            upload_delay_ms: 0,
            show_progress: true,
            extra_extensions: Vec::new(),
        }
    }
}

impl AlbumupConfig {
    /// Returns the albumup home directory (`~/.albumup/`).
    pub fn home_dir() -> Result<PathBuf, AlbumupError> {
        let base = dirs::home_dir().ok_or_else(|| AlbumupError::Config {
            message: "could not determine home directory".into(),
        })?;
        Ok(base.join(".albumup"))
    }

    /// Returns the path to the config file.
    pub fn config_path() -> Result<PathBuf, AlbumupError> {
        Ok(Self::home_dir()?.join("config.toml"))
    }

    /// Load config from the default location, or return defaults if not found.
    pub fn load() -> Result<Self, AlbumupError> {
        let path = Self::config_path()?;
        if path.exists() {
            Self::load_from(&path)
        } else {
            tracing::debug!("no config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Load config from a specific path.
    pub fn load_from(path: &Path) -> Result<Self, AlbumupError> {
        let content = std::fs::read_to_string(path)?;
        let config: Self =
            toml::from_str(&content).map_err(|e| AlbumupError::Serialization(e.to_string()))?;
        if config.attach_batch_size == 0 {
            return Err(AlbumupError::Config {
                message: "attach_batch_size must be at least 1".into(),
            });
        }
        Ok(config)
    }

    /// Save config to the default location.
    pub fn save(&self) -> Result<(), AlbumupError> {
        let path = Self::config_path()?;
        self.save_to(&path)
    }

    /// Save config to a specific path.
    pub fn save_to(&self, path: &Path) -> Result<(), AlbumupError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| AlbumupError::Serialization(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Initialize the albumup home directory with default config.
    pub fn init() -> Result<PathBuf, AlbumupError> {
        let home = Self::home_dir()?;
        std::fs::create_dir_all(&home)?;

        let config_path = Self::config_path()?;
        if !config_path.exists() {
            Self::default().save_to(&config_path)?;
        }

        Ok(home)
    }

    /// The directive to use when none is given on the command line.
    pub fn default_directive(&self) -> UploadDirective {
        UploadDirective::from(self.add_if_exists)
    }
}
