use std::path::{Path, PathBuf};

/// Write to a sibling temp file, then rename over `dest` so readers never see a partial file.
pub async fn write_atomic(dest: &Path, bytes: &[u8]) -> std::io::Result<()> {
    if let Some(parent) = dest.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }

    let tmp_dest = temp_path(dest);

    let result = async {
        tokio::fs::write(&tmp_dest, bytes).await?;
        tokio::fs::rename(&tmp_dest, dest).await
    }
    .await;

    if result.is_err() {
        // Clean up partial temp file on any error
        let _ = tokio::fs::remove_file(&tmp_dest).await;
    }

    result
}

/// Sibling of `dest` with `.tmp` appended to the full file name.
fn temp_path(dest: &Path) -> PathBuf {
    let mut name = dest.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    dest.with_file_name(name)
}
