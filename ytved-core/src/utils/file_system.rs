//! Tools for working with the file system.

use crate::error::Result;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use uuid::Uuid;

/// Creates a new directory at the given destination.
/// If the directory already exists, nothing is done.
///
/// # Arguments
///
/// * `destination` - The path to create the directory at.
pub fn create_dir(destination: impl AsRef<Path>) -> Result<()> {
    std::fs::create_dir_all(destination)?;
    Ok(())
}

/// Creates a uniquely named subdirectory of `parent`.
///
/// # Arguments
///
/// * `parent` - The directory to create the subdirectory in.
pub async fn create_unique_dir(parent: impl AsRef<Path>) -> Result<PathBuf> {
    let directory = parent.as_ref().join(Uuid::new_v4().simple().to_string());
    tokio::fs::create_dir_all(&directory).await?;

    Ok(directory)
}

/// Returns the most recently modified regular file directly inside `directory`.
///
/// Subdirectories are not descended into. When two files share the same
/// modification time, either may be returned.
///
/// # Arguments
///
/// * `directory` - The directory to scan.
pub async fn latest_file(directory: impl AsRef<Path>) -> Result<Option<PathBuf>> {
    let mut entries = tokio::fs::read_dir(directory.as_ref()).await?;
    let mut latest: Option<(SystemTime, PathBuf)> = None;

    while let Some(entry) = entries.next_entry().await? {
        let metadata = entry.metadata().await?;
        if !metadata.is_file() {
            continue;
        }

        let modified = metadata.modified()?;
        let is_newer = latest
            .as_ref()
            .is_none_or(|(current, _)| modified > *current);
        if is_newer {
            latest = Some((modified, entry.path()));
        }
    }

    Ok(latest.map(|(_, path)| path))
}
