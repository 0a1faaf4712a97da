//! Image server configuration
//!
//! Read from an optional TOML file next to the binary; every field has a
//! default so a missing file just means "serve ./images on localhost:8080".

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{Error, Result};

/// Default config filename looked up in the working directory.
pub const CONFIG_FILE: &str = "image_server.toml";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Loopback address the listener binds to.
    pub bind_host: String,
    pub port: u16,
    /// Directory whose files are served.
    pub images_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_host: "127.0.0.1".to_string(),
            port: 8080,
            images_dir: PathBuf::from("images"),
        }
    }
}

impl ServerConfig {
    /// Load from `path`, falling back to defaults when the file is absent.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)?;
        toml::from_str(&text).map_err(|e| Error::ParseFormat(e.to_string()))
    }

    pub fn local_url(&self) -> String {
        format!("http://{}:{}", self.bind_host, self.port)
    }
}
