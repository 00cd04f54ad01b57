pub mod compute;
pub mod inspect;
pub mod settings;

use std::path::Path;

use anyhow::Context;

use crate::dataset::Dataset;

/// Read and normalize a workbook from disk.
pub(crate) async fn load_dataset(file: &Path) -> anyhow::Result<Dataset> {
    let bytes = tokio::fs::read(file)
        .await
        .with_context(|| format!("failed to read {}", file.display()))?;
    Dataset::from_bytes(&bytes).with_context(|| format!("failed to load {}", file.display()))
}
