//! Dataset configuration from TOML (`[dataset]` section)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileDatasetConfig {
    /// Directory holding the per-domain CSV files
    pub dir: PathBuf,
    /// Import empty domains automatically before `run`
    pub auto_import: bool,
}

impl Default for FileDatasetConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("data"),
            auto_import: true,
        }
    }
}
