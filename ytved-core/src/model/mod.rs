//! The models exchanged with the callers of the [`Downloader`](crate::Downloader).
//!
//! The represented data is the download request, the video metadata and the downloaded file.

use crate::error::{Error, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::ffi::OsStr;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

pub mod format_selector;

// Re-export format selectors for easier access
pub use format_selector::{Format, Quality};

/// The placeholder used when the view count is unavailable.
pub const VIEWS_UNAVAILABLE: &str = "N/A";

static YOUTUBE_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(https?://)?(www\.)?(youtube\.com/(watch\?v=|shorts/)|youtu\.be/).+")
        .expect("valid YouTube URL pattern")
});

/// Returns whether the URL points to a YouTube video, short or short-link.
pub fn is_valid_youtube_url(url: &str) -> bool {
    YOUTUBE_URL.is_match(url)
}

/// A validated download request.
///
/// # Examples
///
/// ```rust
/// # use ytved_core::model::{DownloadRequest, Format, Quality};
/// let request = DownloadRequest::new("https://youtu.be/dQw4w9WgXcQ", Format::Mp3, Quality::Best)?;
/// assert_eq!(request.format, Format::Mp3);
///
/// assert!(DownloadRequest::new("https://example.com/video", Format::Mp4, Quality::Best).is_err());
/// # Ok::<(), ytved_core::error::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadRequest {
    /// The YouTube watch, shorts or short-link URL.
    pub url: String,
    /// The requested container.
    #[serde(default)]
    pub format: Format,
    /// The requested quality tier, ignored for audio.
    #[serde(default)]
    pub quality: Quality,
}

impl DownloadRequest {
    /// Creates a request after checking the URL.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if the URL is blank or is not a YouTube video URL.
    pub fn new(url: impl Into<String>, format: Format, quality: Quality) -> Result<Self> {
        let url = url.into();
        validate_url(&url)?;

        Ok(Self {
            url,
            format,
            quality,
        })
    }
}

/// Checks that the URL is present and points to YouTube.
pub fn validate_url(url: &str) -> Result<()> {
    if url.trim().is_empty() {
        return Err(Error::Validation("URL is required".to_string()));
    }
    if !is_valid_youtube_url(url) {
        return Err(Error::Validation("Invalid YouTube URL".to_string()));
    }

    Ok(())
}

/// The metadata of a video, in the order it is presented to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoMetadata {
    /// The title of the video.
    pub title: String,
    /// The human readable duration, e.g. `10:32`.
    pub duration: String,
    /// The thumbnail URL.
    pub thumbnail: String,
    /// The channel display name.
    pub uploader: String,
    /// The formatted view count, or [`VIEWS_UNAVAILABLE`].
    pub views: String,
}

/// A file produced by a download, known to exist when handed out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedArtifact {
    /// The absolute path of the file.
    pub absolute_path: PathBuf,
}

impl ResolvedArtifact {
    /// The path of the file.
    pub fn path(&self) -> &Path {
        &self.absolute_path
    }

    /// The final component of the path, invalid UTF-8 replaced.
    pub fn file_name(&self) -> Cow<'_, str> {
        self.absolute_path
            .file_name()
            .map(OsStr::to_string_lossy)
            .unwrap_or_default()
    }
}

impl fmt::Display for ResolvedArtifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.absolute_path.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_youtube_urls() {
        assert!(is_valid_youtube_url("https://www.youtube.com/watch?v=dQw4w9WgXcQ"));
        assert!(is_valid_youtube_url("http://youtube.com/shorts/abc123"));
        assert!(is_valid_youtube_url("youtu.be/dQw4w9WgXcQ"));
    }

    #[test]
    fn rejects_other_urls() {
        assert!(!is_valid_youtube_url("https://vimeo.com/123"));
        assert!(!is_valid_youtube_url("https://www.youtube.com/channel/xyz"));
        assert!(!is_valid_youtube_url("https://youtu.be/"));
    }

    #[test]
    fn blank_url_is_required() {
        let err = DownloadRequest::new("  ", Format::Mp4, Quality::Best).unwrap_err();
        assert_eq!(err.to_string(), "URL is required");
    }

    #[test]
    fn request_defaults() {
        let request: DownloadRequest =
            serde_json::from_str(r#"{"url":"https://youtu.be/abc"}"#).unwrap();
        assert_eq!(request.format, Format::Mp4);
        assert_eq!(request.quality, Quality::Best);
    }

    #[test]
    fn metadata_serializes_in_field_order() {
        let metadata = VideoMetadata {
            title: "t".to_string(),
            duration: "d".to_string(),
            thumbnail: "th".to_string(),
            uploader: "u".to_string(),
            views: VIEWS_UNAVAILABLE.to_string(),
        };
        let json = serde_json::to_string(&metadata).unwrap();
        assert_eq!(
            json,
            r#"{"title":"t","duration":"d","thumbnail":"th","uploader":"u","views":"N/A"}"#
        );
    }

    #[test]
    fn artifact_file_name_keeps_case() {
        let artifact = ResolvedArtifact {
            absolute_path: PathBuf::from("/tmp/Clip.MP4"),
        };
        assert_eq!(artifact.file_name(), "Clip.MP4");
    }

    #[cfg(unix)]
    #[test]
    fn artifact_file_name_is_lossy() {
        use std::os::unix::ffi::OsStrExt;

        let artifact = ResolvedArtifact {
            absolute_path: PathBuf::from("/tmp").join(OsStr::from_bytes(b"Caf\xe9.webm")),
        };
        assert_eq!(artifact.file_name(), "Caf\u{fffd}.webm");
    }
}
