//! Configuration file schema.
//!
//! A configuration file tunes directory scans and extends the built-in
//! heuristic tables:
//!
//! ```yaml
//! excluded_paths:
//!   - "**/target/**"
//! extensions:
//!   mv: move
//! include_unknown: false
//! rules:
//!   rust:
//!     insights:
//!       - pattern: 'invoke_signed\('
//!         label: "PDA-signed CPI - verify seeds"
//! ```

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::analysis::{Language, RuleSpec, RuleTable};

/// Default configuration file names to search for.
pub const DEFAULT_CONFIG_NAMES: &[&str] = &["contractscope.yaml", ".contractscope.yaml"];

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    /// Glob patterns for paths to skip during directory scans.
    #[serde(default)]
    pub excluded_paths: Vec<String>,
    /// Extra extension (without dot) to language mappings.
    #[serde(default)]
    pub extensions: HashMap<String, Language>,
    /// Whether directory scans include files in unknown languages.
    #[serde(default)]
    pub include_unknown: bool,
    /// Additional heuristics per language.
    #[serde(default)]
    pub rules: HashMap<Language, LanguageRules>,
}

/// User-supplied rule tables for one language.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct LanguageRules {
    #[serde(default)]
    pub features: Vec<RuleSpec>,
    #[serde(default)]
    pub insights: Vec<RuleSpec>,
}

impl Config {
    /// Parse a configuration from a YAML file.
    pub fn parse_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::parse_str(&content).with_context(|| format!("parsing config {}", path.display()))
    }

    /// Parse a configuration from YAML text.
    pub fn parse_str(content: &str) -> anyhow::Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Config = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Look for a default configuration file in `dir`.
    pub fn discover(dir: &Path) -> Option<PathBuf> {
        DEFAULT_CONFIG_NAMES
            .iter()
            .map(|name| dir.join(name))
            .find(|path| path.is_file())
    }

    /// Compile globs and rule patterns so a bad config fails at load time.
    pub fn validate(&self) -> anyhow::Result<()> {
        for pattern in &self.excluded_paths {
            globset::Glob::new(pattern)
                .with_context(|| format!("invalid excluded path pattern {:?}", pattern))?;
        }
        for (language, rules) in &self.rules {
            RuleTable::from_specs(&rules.features)
                .with_context(|| format!("{} feature rules", language))?;
            RuleTable::from_specs(&rules.insights)
                .with_context(|| format!("{} insight rules", language))?;
        }
        Ok(())
    }

    /// Check if a path should be excluded based on `excluded_paths` patterns.
    /// Uses globset for matching, which supports `**` for recursive directory matching.
    pub fn is_path_excluded(&self, path: &Path) -> bool {
        if self.excluded_paths.is_empty() {
            return false;
        }

        let path_str = path.to_string_lossy();

        self.excluded_paths.iter().any(|pattern| {
            globset::Glob::new(pattern)
                .map(|glob| glob.compile_matcher().is_match(&*path_str))
                .unwrap_or(false)
        })
    }
}
