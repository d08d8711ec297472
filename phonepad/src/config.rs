//! Phone-keypad configuration that extends the base `Config` from core.
//!
//! This configuration includes:
//! - All generic options from `multitap_core::Config` (flattened via serde)
//! - Where the word list lives
//! - The default log filter for the binary
//!
//! # Example
//!
//! ```rust
//! use phonepad::PhoneConfig;
//!
//! let config = PhoneConfig::default();
//! let base_config = config.into_base();
//! assert_eq!(base_config.commit_timeout_ms, 1000);
//! ```

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct PhoneConfig {
    /// Base configuration fields (layout, control keys, costs, etc.)
    #[serde(flatten)]
    pub base: multitap_core::Config,

    /// Word list: newline-delimited text, or a `.bin` snapshot
    pub dictionary: PathBuf,

    /// `tracing` filter used when `RUST_LOG` is unset
    pub log_filter: String,
}

impl Default for PhoneConfig {
    fn default() -> Self {
        Self {
            base: multitap_core::Config::default(),
            dictionary: PathBuf::from("dictionary.txt"),
            log_filter: "phonepad=info,multitap_core=warn".to_string(),
        }
    }
}

impl PhoneConfig {
    /// Convert this phone config into the base config for `MultiTapEngine::new()`
    pub fn into_base(self) -> multitap_core::Config {
        self.base
    }

    /// Get a reference to the base config
    pub fn base(&self) -> &multitap_core::Config {
        &self.base
    }

    /// Get a mutable reference to the base config
    pub fn base_mut(&mut self) -> &mut multitap_core::Config {
        &mut self.base
    }

    /// Load from a TOML file. Missing fields take their defaults.
    pub fn load_toml<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("invalid config {}", path.display()))
    }

    pub fn from_toml_str(content: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn to_toml_string(&self) -> anyhow::Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}
