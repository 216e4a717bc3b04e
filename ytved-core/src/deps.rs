//! Locations of the external tools.

use derive_more::Constructor;
use std::path::{Path, PathBuf};

/// The command name used when the configured yt-dlp path does not exist.
pub const YOUTUBE_COMMAND: &str = "yt-dlp";

/// The external tools used by the downloader.
///
/// # Examples
///
/// ```rust
/// # use ytved_core::deps::Libraries;
/// # use std::path::PathBuf;
/// let libraries = Libraries::new(PathBuf::from("/nonexistent/yt-dlp"), PathBuf::from("ffmpeg"));
///
/// // A missing configured path falls back to the search path.
/// assert_eq!(libraries.youtube_executable(), PathBuf::from("yt-dlp"));
/// ```
#[derive(Constructor, Clone, Debug, PartialEq, Eq)]
pub struct Libraries {
    /// The configured path to the yt-dlp binary.
    pub youtube: PathBuf,
    /// The path to the ffmpeg binary (or its directory), handed to yt-dlp as is.
    pub ffmpeg: PathBuf,
}

impl Libraries {
    /// Resolves the yt-dlp executable to launch.
    ///
    /// The configured path is used when it exists on disk, otherwise the bare
    /// command name is returned and resolved through the search path at spawn time.
    pub fn youtube_executable(&self) -> PathBuf {
        resolve_executable(&self.youtube, YOUTUBE_COMMAND)
    }
}

fn resolve_executable(configured: &Path, command: &str) -> PathBuf {
    if !configured.as_os_str().is_empty() && configured.exists() {
        return configured.to_path_buf();
    }

    #[cfg(feature = "tracing")]
    tracing::debug!(
        "Configured executable {:?} not found, falling back to {}",
        configured,
        command
    );

    PathBuf::from(command)
}

impl Default for Libraries {
    fn default() -> Self {
        Self::new(PathBuf::from(YOUTUBE_COMMAND), PathBuf::from("ffmpeg"))
    }
}
