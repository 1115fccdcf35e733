//! Configuration file loading for quizbench
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `QUIZBENCH_*` environment variables (`__` separates sections)
//! 2. `--config <path>` specified file
//! 3. Project root: `./quizbench.toml` or `./.quizbench.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/quizbench/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    FileConfig, FileDatasetConfig, FileEvaluationConfig, FileLoggingConfig, FileOutputConfig,
    FileProviderConfig, FileStoreConfig,
};
pub use loader::ConfigLoader;
