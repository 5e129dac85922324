//! Scratch directories for audio conversion, removed when the run ends.

use std::path::Path;
use tempfile::TempDir;
use tracing::warn;

/// Creates a uniquely named directory under `work_dir`. It is deleted on drop as well, so an
/// early return or a panic cannot leak it.
pub(crate) async fn create(work_dir: &Path, prefix: &str) -> std::io::Result<TempDir> {
    tokio::fs::create_dir_all(work_dir).await?;
    tempfile::Builder::new().prefix(prefix).tempdir_in(work_dir)
}

/// Removes the directory now, logging instead of failing.
pub(crate) fn close(dir: TempDir) {
    let path = dir.path().to_path_buf();
    if let Err(e) = dir.close() {
        warn!(path = %path.display(), error = %e, "Failed to remove scratch directory");
    }
}
