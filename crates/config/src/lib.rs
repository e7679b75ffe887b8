//! Configuration for the HTML entry plugin.
//!
//! Values are layered with [`figment`]: built-in defaults first, then an
//! optional configuration file whose format is picked from its extension
//! (`.toml`, `.json`, `.yaml`/`.yml`). Every key is optional.
//!
//! ```toml
//! # Module identities matching this pattern are treated as HTML entries.
//! entry_pattern = '\.html?$'
//! # Whether the bundle script stays in the cached document after rendering.
//! injection = "restore"
//! ```

pub mod error;

use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use figment::Figment;
use figment::providers::{Format, Json, Serialized, Toml, Yaml};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::instrument;

/// Matches module identities that name an HTML file.
pub const DEFAULT_ENTRY_PATTERN: &str = r"\.html$";

/// What happens to the bundle `<script>` once an entry document is rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Injection {
    /// Detach the script again, so the cached document can be rendered for
    /// another output without accumulating scripts.
    #[default]
    Restore,
    /// Leave the script in the cached document.
    Retain,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Regular expression matched against module identities to decide whether
    /// they are HTML entries.
    pub entry_pattern: String,
    pub injection: Injection,
}
impl Default for Config {
    fn default() -> Self {
        Self {
            entry_pattern: DEFAULT_ENTRY_PATTERN.to_string(),
            injection: Injection::default(),
        }
    }
}

impl Config {
    /// Builds the layered configuration sources without extracting them.
    ///
    /// Hosts can merge further providers on top before extracting.
    pub fn figment(path: Option<&Path>) -> Result<Figment> {
        let figment = Figment::from(Serialized::defaults(Config::default()));
        let Some(path) = path else {
            return Ok(figment);
        };
        let extension = path.extension().and_then(|ext| ext.to_str()).map(str::to_ascii_lowercase);
        Ok(match extension.as_deref() {
            Some("toml") => figment.merge(Toml::file_exact(path)),
            Some("json") => figment.merge(Json::file_exact(path)),
            Some("yaml" | "yml") => figment.merge(Yaml::file_exact(path)),
            _ => exn::bail!(ErrorKind::UnsupportedFormat(path.to_path_buf())),
        })
    }

    /// Loads and validates the configuration.
    #[instrument]
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::figment(path)?.extract::<Self>().or_raise(|| ErrorKind::Load)?.validated()
    }

    /// Checks values that deserialize fine but cannot be used.
    pub fn validated(self) -> Result<Self> {
        self.entry_regex()?;
        tracing::debug!(config = ?self, "configuration loaded");
        Ok(self)
    }

    /// Compiles [`entry_pattern`](Self::entry_pattern).
    pub fn entry_regex(&self) -> Result<Regex> {
        Regex::new(&self.entry_pattern).or_raise(|| ErrorKind::InvalidPattern(self.entry_pattern.clone()))
    }
}
