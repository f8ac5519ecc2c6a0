use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Local;
use thiserror::Error;

use crate::calendar::ErrorSink;
use crate::model::{Config, TaskStore};

const CONFIG_FILE: &str = "config.json";
const ERROR_LOG: &str = "error.log";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("no user config directory available")]
    NoConfigDir,
    #[error("reading {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("parsing {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Serialize(#[from] serde_json::Error),
}

/// Owns the on-disk layout: a config directory holding config.json,
/// the data file, and error.log.
///
/// Saves overwrite the whole data file; the store is small enough that
/// incremental writes would buy nothing.
pub struct Storage {
    config_dir: PathBuf,
    data_path: PathBuf,
    config: Config,
}

impl Storage {
    /// Open (creating if needed) the config directory and load or create
    /// config.json. `override_dir` replaces the platform default, mainly
    /// for tests and the `--data-dir` flag.
    pub fn new(override_dir: Option<&Path>) -> Result<Self, StorageError> {
        let config_dir = match override_dir {
            Some(dir) => dir.to_path_buf(),
            None => dirs::config_dir()
                .ok_or(StorageError::NoConfigDir)?
                .join("daymark"),
        };
        fs::create_dir_all(&config_dir)?;

        let config_path = config_dir.join(CONFIG_FILE);
        let config = if config_path.exists() {
            let data = fs::read_to_string(&config_path).map_err(|source| StorageError::Read {
                path: config_path.clone(),
                source,
            })?;
            serde_json::from_str(&data).map_err(|source| StorageError::Parse {
                path: config_path.clone(),
                source,
            })?
        } else {
            let config = Config::default();
            fs::write(&config_path, serde_json::to_string_pretty(&config)?)?;
            config
        };

        let data_path = config_dir.join(&config.data_file);
        Ok(Storage {
            config_dir,
            data_path,
            config,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    /// Load the task store. A missing data file is a fresh start, not an
    /// error.
    pub fn load_data(&self) -> Result<TaskStore, StorageError> {
        if !self.data_path.exists() {
            return Ok(TaskStore::default());
        }
        let data = fs::read_to_string(&self.data_path).map_err(|source| StorageError::Read {
            path: self.data_path.clone(),
            source,
        })?;
        serde_json::from_str(&data).map_err(|source| StorageError::Parse {
            path: self.data_path.clone(),
            source,
        })
    }

    pub fn save_data(&self, store: &TaskStore) -> Result<(), StorageError> {
        let json = serde_json::to_string_pretty(store)?;
        fs::write(&self.data_path, json)?;
        Ok(())
    }

    /// Append a timestamped line to error.log. Logging failures are
    /// swallowed; a broken log must not take the shell down.
    pub fn log_error(&self, message: &str) {
        let line = format!(
            "[{}] ERROR: {}\n",
            Local::now().format("%Y-%m-%d %H:%M:%S"),
            message
        );
        if let Ok(mut file) = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.config_dir.join(ERROR_LOG))
        {
            let _ = file.write_all(line.as_bytes());
        }
    }

    /// Delete the whole config directory: config, data, and log.
    pub fn purge(&self) -> Result<(), StorageError> {
        fs::remove_dir_all(&self.config_dir)?;
        Ok(())
    }
}

impl ErrorSink for Storage {
    fn record_error(&self, message: &str) {
        self.log_error(message);
    }
}
