//! `lc-checker.toml` settings.
//!
//! ```toml
//! standards_dir = "standards"
//!
//! [comparison]
//! strip_punctuation = false
//! equivalents = [["CORPORATION", "CORP"], ["LIMITED", "LTD"]]
//!
//! [classification]
//! use_standards_table = true
//! ```
//!
//! Command-line flags override the file.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use lc_compare::{ComparisonConfig, RuleTable};
use lc_standards::{SchemaRegistry, standards_root};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Looked up in the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "lc-checker.toml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub standards_dir: Option<PathBuf>,
    pub comparison: ComparisonConfig,
    pub classification: ClassificationSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClassificationSettings {
    /// Take the UCP 600 table from the standards `ucp_rules` file when it has one.
    pub use_standards_table: bool,
}

impl Default for ClassificationSettings {
    fn default() -> Self {
        Self {
            use_standards_table: true,
        }
    }
}

impl AppConfig {
    /// Load `explicit`, or the default file when present, or defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => {
                let default = PathBuf::from(DEFAULT_CONFIG_FILE);
                if !default.is_file() {
                    debug!("no {DEFAULT_CONFIG_FILE} found, using defaults");
                    return Ok(Self::default());
                }
                default
            }
        };
        let text = fs::read_to_string(&path)
            .with_context(|| format!("read config {}", path.display()))?;
        let config = Self::from_toml_str(&text)
            .with_context(|| format!("parse config {}", path.display()))?;
        debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// The standards directory: flag, then config, then the built-in default.
    pub fn standards_dir(&self, flag: Option<&Path>) -> PathBuf {
        flag.map(Path::to_path_buf)
            .or_else(|| self.standards_dir.clone())
            .unwrap_or_else(standards_root)
    }

    /// The rule table comparison results are classified with.
    pub fn rule_table(&self, registry: &SchemaRegistry) -> RuleTable {
        let rules = registry.ucp_rules();
        if self.classification.use_standards_table && !rules.is_empty() {
            RuleTable::from_rules(rules.iter().cloned())
        } else {
            RuleTable::ucp600()
        }
    }
}
