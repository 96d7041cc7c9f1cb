//! Configuration management with layered hierarchy

use log::warn;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Workbook looked for in the current directory when nothing is configured
pub const DEFAULT_WORKBOOK: &str = "Mechatronics Project Parts_Data.xlsx";

/// Name of the per-directory config file
pub const LOCAL_CONFIG_FILE: &str = ".mbi.yaml";

/// MBI configuration with layered hierarchy
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Workbook to load
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workbook: Option<PathBuf>,

    /// Default output format
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_format: Option<String>,

    /// Extra manufacturer synonyms (title-cased spelling -> canonical name)
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub brand_synonyms: BTreeMap<String, String>,

    /// Extra placeholder tokens replaced with "Unknown"
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub placeholders: Vec<String>,

    /// Header candidates per logical field (replaces the built-in list)
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub columns: BTreeMap<String, Vec<String>>,
}

impl Config {
    /// Load configuration from all sources, merging in priority order
    pub fn load() -> Self {
        let mut config = Config::default();

        // 1. Built-in defaults (already in Default impl)

        // 2. Global user config (~/.config/mbi/config.yaml)
        if let Some(global_path) = Self::global_config_path() {
            if let Some(global) = Self::read_file(&global_path) {
                config.merge(global);
            }
        }

        // 3. Local config (./.mbi.yaml)
        if let Some(local) = Self::read_file(&Self::local_config_path()) {
            config.merge(local);
        }

        // 4. Environment variables
        if let Ok(workbook) = std::env::var("MBI_WORKBOOK") {
            if !workbook.is_empty() {
                config.workbook = Some(PathBuf::from(workbook));
            }
        }
        if let Ok(format) = std::env::var("MBI_FORMAT") {
            if !format.is_empty() {
                config.default_format = Some(format);
            }
        }

        config
    }

    /// Get the path to the global config file
    pub fn global_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "mbi")
            .map(|dirs| dirs.config_dir().join("config.yaml"))
    }

    /// Get the path to the local config file
    pub fn local_config_path() -> PathBuf {
        PathBuf::from(LOCAL_CONFIG_FILE)
    }

    fn read_file(path: &Path) -> Option<Config> {
        if !path.exists() {
            return None;
        }
        let contents = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) => {
                warn!("skipping unreadable config {}: {}", path.display(), e);
                return None;
            }
        };
        match serde_yml::from_str::<Config>(&contents) {
            Ok(config) => Some(config),
            Err(e) => {
                warn!("skipping malformed config {}: {}", path.display(), e);
                None
            }
        }
    }

    /// Merge another config into this one (other takes precedence)
    pub fn merge(&mut self, other: Config) {
        if other.workbook.is_some() {
            self.workbook = other.workbook;
        }
        if other.default_format.is_some() {
            self.default_format = other.default_format;
        }
        self.brand_synonyms.extend(other.brand_synonyms);
        for token in other.placeholders {
            if !self.placeholders.contains(&token) {
                self.placeholders.push(token);
            }
        }
        self.columns.extend(other.columns);
    }

    /// The workbook path, falling back to the default file name
    pub fn workbook(&self) -> PathBuf {
        self.workbook
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_WORKBOOK))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_workbook() {
        let config = Config::default();
        assert_eq!(config.workbook(), PathBuf::from(DEFAULT_WORKBOOK));
    }

    #[test]
    fn test_merge_precedence() {
        let mut base: Config = serde_yml::from_str(
            "workbook: a.xlsx\nbrand_synonyms:\n  Ti: TI\nplaceholders: ['-']\n",
        )
        .unwrap();
        let local: Config = serde_yml::from_str(
            "workbook: b.xlsx\nbrand_synonyms:\n  Nxp: NXP\nplaceholders: ['-', 'N/A']\ncolumns:\n  status: [State]\n",
        )
        .unwrap();

        base.merge(local);
        assert_eq!(base.workbook(), PathBuf::from("b.xlsx"));
        assert_eq!(base.brand_synonyms.len(), 2);
        assert_eq!(base.placeholders, vec!["-", "N/A"]);
        assert_eq!(base.columns["status"], vec!["State"]);
    }

    #[test]
    fn test_merge_keeps_unset_fields() {
        let mut base = Config {
            default_format: Some("json".into()),
            ..Default::default()
        };
        base.merge(Config::default());
        assert_eq!(base.default_format.as_deref(), Some("json"));
    }

    #[test]
    fn test_read_malformed_file_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "workbook: [unterminated").unwrap();
        assert!(Config::read_file(&path).is_none());
    }
}
