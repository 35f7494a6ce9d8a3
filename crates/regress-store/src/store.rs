//! Use-case store backed by a fixtures file and a results file
//!
//! Fixtures are read-only input. Results are overlaid onto the fixtures at
//! load time and the whole store is rewritten to the results file after every
//! update, so the file on disk always reflects the latest recorded state.

use crate::use_case::UseCase;
use indexmap::IndexMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;
use tracing::{debug, warn};

/// Store errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid use-case JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to serialize use cases: {0}")]
    Serialize(#[source] serde_json::Error),
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Named use cases, in fixture file order
#[derive(Debug, Clone)]
pub struct UseCaseStore {
    results_path: PathBuf,
    use_cases: IndexMap<String, UseCase>,
}

impl UseCaseStore {
    /// Create an in-memory store that will be written to `results_path`
    pub fn new(results_path: impl Into<PathBuf>, use_cases: IndexMap<String, UseCase>) -> Self {
        Self {
            results_path: results_path.into(),
            use_cases,
        }
    }

    /// Load fixtures, then overlay previously recorded results if any
    ///
    /// A missing or malformed fixtures file is an error. A missing results
    /// file simply means nothing has been recorded yet.
    pub async fn load(
        fixtures_path: impl AsRef<Path>,
        results_path: impl AsRef<Path>,
    ) -> StoreResult<Self> {
        let fixtures_path = fixtures_path.as_ref();
        let results_path = results_path.as_ref();

        let mut use_cases = read_use_cases(fixtures_path).await?;
        debug!(
            "Loaded {} use cases from {:?}",
            use_cases.len(),
            fixtures_path
        );

        if results_path != fixtures_path && results_path.exists() {
            let recorded = read_use_cases(results_path).await?;
            let mut overlaid = 0;
            for (name, record) in recorded {
                match use_cases.get_mut(&name) {
                    Some(use_case) => {
                        if record.result.is_some() {
                            use_case.result = record.result;
                        }
                        if record.http_code.is_some() {
                            use_case.http_code = record.http_code;
                        }
                        overlaid += 1;
                    }
                    None => warn!(
                        "Dropping recorded result for {}: no longer in {:?}",
                        name, fixtures_path
                    ),
                }
            }
            debug!("Overlaid {} recorded results from {:?}", overlaid, results_path);
        }

        Ok(Self::new(results_path, use_cases))
    }

    /// Use-case names in processing order
    pub fn names(&self) -> Vec<String> {
        self.use_cases.keys().cloned().collect()
    }

    pub fn get(&self, name: &str) -> Option<&UseCase> {
        self.use_cases.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut UseCase> {
        self.use_cases.get_mut(name)
    }

    pub fn len(&self) -> usize {
        self.use_cases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.use_cases.is_empty()
    }

    /// Rewrite the whole store to the results file
    ///
    /// Writes atomically by first writing to a temp file, then renaming.
    pub async fn save(&self) -> StoreResult<()> {
        let content =
            serde_json::to_string_pretty(&self.use_cases).map_err(StoreError::Serialize)?;

        if let Some(parent) = self
            .results_path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
        {
            if !parent.exists() {
                fs::create_dir_all(parent).await.map_err(|e| StoreError::Io {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
            }
        }

        let temp_path = temp_path_for(&self.results_path);
        fs::write(&temp_path, &content)
            .await
            .map_err(|e| StoreError::Io {
                path: temp_path.clone(),
                source: e,
            })?;
        fs::rename(&temp_path, &self.results_path)
            .await
            .map_err(|e| StoreError::Io {
                path: self.results_path.clone(),
                source: e,
            })?;

        debug!(
            "Saved {} use cases to {:?}",
            self.use_cases.len(),
            self.results_path
        );
        Ok(())
    }
}

async fn read_use_cases(path: &Path) -> StoreResult<IndexMap<String, UseCase>> {
    let content = fs::read_to_string(path)
        .await
        .map_err(|e| StoreError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

    serde_json::from_str(&content).map_err(|e| StoreError::Json {
        path: path.to_path_buf(),
        source: e,
    })
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
