pub mod pqf;

use std::path::{Path, PathBuf};

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    pub text: String,
    #[serde(default)]
    pub author: String,
}

#[derive(Debug, Error)]
pub enum QuoteError {
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
}

/// Loads quote files once at startup and hands out random quotes.
///
/// Files ending in `.json` hold a quote array; everything else is treated
/// as plain-quote format. A file that fails to load is skipped so one bad
/// path does not cost the rest.
pub struct Manager {
    quotes: Vec<Quote>,
}

impl Manager {
    /// Load every configured quote file. Relative paths resolve against
    /// `base_dir`. Per-file failures are returned alongside the manager.
    pub fn new(base_dir: &Path, files: &[String]) -> (Self, Vec<QuoteError>) {
        let mut quotes = Vec::new();
        let mut errors = Vec::new();
        for file in files {
            let path = resolve(base_dir, file);
            match load_file(&path) {
                Ok(mut loaded) => quotes.append(&mut loaded),
                Err(err) => errors.push(err),
            }
        }
        (Manager { quotes }, errors)
    }

    pub fn has_quotes(&self) -> bool {
        !self.quotes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }

    pub fn get(&self, idx: usize) -> Option<&Quote> {
        self.quotes.get(idx)
    }

    /// A uniformly random quote, or `None` when no files loaded.
    pub fn random_quote(&self) -> Option<&Quote> {
        if self.quotes.is_empty() {
            return None;
        }
        let idx = rand::rng().random_range(0..self.quotes.len());
        self.quotes.get(idx)
    }
}

fn resolve(base_dir: &Path, file: &str) -> PathBuf {
    let path = Path::new(file);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base_dir.join(path)
    }
}

fn load_file(path: &Path) -> Result<Vec<Quote>, QuoteError> {
    let data = std::fs::read_to_string(path).map_err(|source| QuoteError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    if path.extension().is_some_and(|ext| ext == "json") {
        serde_json::from_str(&data).map_err(|source| QuoteError::Parse {
            path: path.to_path_buf(),
            source,
        })
    } else {
        Ok(pqf::parse_pqf(&data))
    }
}
