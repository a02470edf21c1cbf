//! Local destination path derivation and the no-overwrite check.

use std::path::{Path, PathBuf};

use super::error::DownloadError;

/// Final component of the remote path, used as the local file name.
///
/// Returns `None` for paths without a usable final component (empty, `.`,
/// `..`, or only slashes).
#[must_use]
pub fn destination_file_name(remote_path: &str) -> Option<&str> {
    Path::new(remote_path).file_name()?.to_str()
}

/// Destination for `remote_path` inside `output_dir`.
///
/// # Errors
///
/// Returns [`DownloadError::Internal`] when `remote_path` has no file name;
/// callers are expected to have rejected such paths already.
pub fn destination_path(output_dir: &Path, remote_path: &str) -> Result<PathBuf, DownloadError> {
    destination_file_name(remote_path)
        .map(|name| output_dir.join(name))
        .ok_or_else(|| DownloadError::internal(format!("no file name in path '{remote_path}'")))
}

/// Fails if something already exists at `path`.
///
/// # Errors
///
/// Returns [`DownloadError::FileExists`] when the path exists, including
/// dangling symlinks.
pub fn ensure_absent(path: &Path) -> Result<(), DownloadError> {
    if path.symlink_metadata().is_ok() {
        return Err(DownloadError::FileExists {
            path: path.to_path_buf(),
        });
    }
    Ok(())
}
