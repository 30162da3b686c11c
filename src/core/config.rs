//! Snapshot build configuration
//!
//! ```toml
//! root = "/"
//!
//! [compression]
//! method = "zstd"
//! level = 19
//! ```

use crate::compression::CompressionConfig;
use crate::error::{EmbedError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Options for [`crate::builder::SnapshotBuilder`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BuildConfig {
    /// Source directory captured as the snapshot's `/`
    pub root: String,

    /// Compression used for the per-file attempt
    pub compression: CompressionConfig,
}

impl Default for BuildConfig {
    fn default() -> Self {
        BuildConfig {
            root: String::from("/"),
            compression: CompressionConfig::default(),
        }
    }
}

impl BuildConfig {
    /// Parse a TOML document
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: BuildConfig =
            toml::from_str(text).map_err(|e| EmbedError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a TOML file from disk
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Render as TOML
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string(self).map_err(|e| EmbedError::Config(e.to_string()))
    }

    pub fn with_compression(mut self, compression: CompressionConfig) -> Self {
        self.compression = compression;
        self
    }

    pub fn with_root<S: Into<String>>(mut self, root: S) -> Self {
        self.root = root.into();
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !self.root.starts_with('/') {
            return Err(EmbedError::Config(format!(
                "root must be an absolute path, got {:?}",
                self.root
            )));
        }
        self.compression.validate()
    }
}
