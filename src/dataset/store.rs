use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::info;

use super::{Dataset, DatasetError};
use crate::storage::write_atomic;

/// Holds the live booking dataset and the file backing it.
///
/// Readers clone an `Arc<Dataset>` once per request, so a concurrent upload never
/// changes the rows a request is already aggregating.
pub struct DatasetStore {
    path: PathBuf,
    current: RwLock<Option<Arc<Dataset>>>,
}

impl DatasetStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            current: RwLock::new(None),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current dataset, loading it from disk on first use.
    ///
    /// A missing file is reported as [`DatasetError::NotFound`] and retried on the next call.
    pub async fn snapshot(&self) -> Result<Arc<Dataset>, DatasetError> {
        // Fast path: try read lock
        {
            let current = self.current.read().await;
            if let Some(dataset) = current.as_ref() {
                return Ok(dataset.clone());
            }
        }

        let mut current = self.current.write().await;
        if let Some(dataset) = current.as_ref() {
            return Ok(dataset.clone());
        }

        let dataset = Arc::new(load_file(&self.path).await?);
        info!(
            "Loaded booking dataset {}: {} rows, {} malformed, sha256 {}",
            self.path.display(),
            dataset.records.len(),
            dataset.malformed_rows,
            dataset.fingerprint
        );
        *current = Some(dataset.clone());
        Ok(dataset)
    }

    /// Validate uploaded workbook bytes, persist them over the backing file and swap them in.
    ///
    /// Nothing on disk or in memory changes unless the bytes parse into a dataset.
    pub async fn replace(&self, bytes: Vec<u8>) -> Result<Arc<Dataset>, DatasetError> {
        let (dataset, bytes) = tokio::task::spawn_blocking(move || {
            Dataset::from_bytes(&bytes).map(|dataset| (dataset, bytes))
        })
        .await
        .map_err(|e| DatasetError::Task(e.to_string()))??;

        let mut current = self.current.write().await;
        write_atomic(&self.path, &bytes).await?;

        let dataset = Arc::new(dataset);
        info!(
            "Replaced booking dataset {}: {} rows, {} malformed, sha256 {}",
            self.path.display(),
            dataset.records.len(),
            dataset.malformed_rows,
            dataset.fingerprint
        );
        *current = Some(dataset.clone());
        Ok(dataset)
    }

    /// Swap an already-built dataset in without touching disk.
    pub async fn install(&self, dataset: Dataset) -> Arc<Dataset> {
        let dataset = Arc::new(dataset);
        *self.current.write().await = Some(dataset.clone());
        dataset
    }
}

async fn load_file(path: &Path) -> Result<Dataset, DatasetError> {
    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(DatasetError::NotFound(path.to_path_buf()));
        }
        Err(e) => return Err(e.into()),
    };

    tokio::task::spawn_blocking(move || Dataset::from_bytes(&bytes))
        .await
        .map_err(|e| DatasetError::Task(e.to_string()))?
}
