use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{NamesakeError, Result};
use crate::loader::DatasetKind;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_data_dir_string")]
    pub data_dir: String,
    #[serde(default = "default_reimbursements_file")]
    pub reimbursements_file: String,
    #[serde(default = "default_companies_file")]
    pub companies_file: String,
    #[serde(default = "default_deputies_file")]
    pub deputies_file: String,
}

fn default_reimbursements_file() -> String {
    "2016-12-06-reimbursements.xz".to_string()
}

fn default_companies_file() -> String {
    "2016-09-03-companies.xz".to_string()
}

fn default_deputies_file() -> String {
    "2016-12-21-deputies.xz".to_string()
}

fn default_data_dir_string() -> String {
    default_data_dir().to_string_lossy().to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir_string(),
            reimbursements_file: default_reimbursements_file(),
            companies_file: default_companies_file(),
            deputies_file: default_deputies_file(),
        }
    }
}

impl Settings {
    /// Resolve the dataset locations, optionally overriding the data directory.
    pub fn dataset_paths(&self, data_dir_override: Option<&str>) -> DatasetPaths {
        let data_dir = match data_dir_override {
            Some(dir) => PathBuf::from(shellexpand_path(dir)),
            None => PathBuf::from(&self.data_dir),
        };
        DatasetPaths {
            reimbursements: data_dir.join(&self.reimbursements_file),
            companies: data_dir.join(&self.companies_file),
            deputies: data_dir.join(&self.deputies_file),
            data_dir,
        }
    }
}

/// Where each dataset lives on disk for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetPaths {
    pub data_dir: PathBuf,
    pub reimbursements: PathBuf,
    pub companies: PathBuf,
    pub deputies: PathBuf,
}

impl DatasetPaths {
    pub fn path_for(&self, kind: DatasetKind) -> &Path {
        match kind {
            DatasetKind::Reimbursements => &self.reimbursements,
            DatasetKind::Companies => &self.companies,
            DatasetKind::Deputies => &self.deputies,
        }
    }
}

fn config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("namesake")
}

fn settings_path() -> PathBuf {
    config_dir().join("settings.json")
}

fn default_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("Documents")
        .join("namesake")
}

pub fn load_settings() -> Settings {
    let path = settings_path();
    if path.exists() {
        let content = std::fs::read_to_string(&path).unwrap_or_default();
        serde_json::from_str(&content).unwrap_or_else(|e| {
            tracing::warn!("ignoring unreadable settings at {}: {e}", path.display());
            Settings::default()
        })
    } else {
        Settings::default()
    }
}

pub fn save_settings(settings: &Settings) -> Result<()> {
    let dir = config_dir();
    std::fs::create_dir_all(&dir)?;
    let json = serde_json::to_string_pretty(settings)
        .map_err(|e| NamesakeError::Settings(e.to_string()))?;
    std::fs::write(settings_path(), format!("{json}\n"))?;
    Ok(())
}

pub fn shellexpand_path(path: &str) -> String {
    if path.starts_with('~') {
        if let Some(home) = dirs::home_dir() {
            return path.replacen('~', &home.to_string_lossy(), 1);
        }
    }
    std::fs::canonicalize(path)
        .unwrap_or_else(|_| PathBuf::from(path))
        .to_string_lossy()
        .to_string()
}
