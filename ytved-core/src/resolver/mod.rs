//! Locates the file produced by a download from the tool's transcript.
//!
//! yt-dlp announces where it writes with a handful of tagged lines. A download
//! may announce several paths (one per stream, then the merged or extracted
//! result), so the last announcement wins. The textual format is not a stable
//! contract between yt-dlp versions: when no announced path exists on disk,
//! the most recently modified file of the output directory is used instead.

use crate::error::{Error, Result};
use crate::model::ResolvedArtifact;
use crate::utils::file_system;
use std::path::{Path, PathBuf};

/// A rule extracting a path from a single transcript line.
#[derive(Debug, Clone, Copy)]
pub struct LineRule {
    /// The tag the rule looks for.
    pub marker: &'static str,
    /// Where the marker may appear in the line.
    pub position: MarkerPosition,
    /// Whether double quotes are stripped from the extracted value.
    pub strip_quotes: bool,
}

/// Where a [`LineRule`] marker has to appear.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerPosition {
    /// The line starts with the marker.
    Prefix,
    /// The marker appears anywhere in the line.
    Anywhere,
}

impl LineRule {
    /// Whether the line carries the marker.
    pub fn matches(&self, line: &str) -> bool {
        match self.position {
            MarkerPosition::Prefix => line.starts_with(self.marker),
            MarkerPosition::Anywhere => line.contains(self.marker),
        }
    }

    /// Extracts the value following the marker, `None` when the line does not match.
    pub fn extract(&self, line: &str) -> Option<String> {
        if !self.matches(line) {
            return None;
        }

        let value = line.replacen(self.marker, "", 1);
        let value = if self.strip_quotes {
            value.replace('"', "")
        } else {
            value
        };

        Some(value.trim().to_string())
    }
}

/// The lines announcing an output path, in no particular priority.
pub const DESTINATION_RULES: [LineRule; 3] = [
    // Initial target of a single stream download
    LineRule {
        marker: "[download] Destination:",
        position: MarkerPosition::Prefix,
        strip_quotes: false,
    },
    // Container produced by merging the video and audio streams
    LineRule {
        marker: "[Merger] Merging formats into",
        position: MarkerPosition::Anywhere,
        strip_quotes: true,
    },
    // File produced by the audio extraction post-processor
    LineRule {
        marker: "[ExtractAudio] Destination:",
        position: MarkerPosition::Anywhere,
        strip_quotes: false,
    },
];

/// Returns the value of the last line matched by any rule.
pub fn last_match<'a, I>(lines: I, rules: &[LineRule]) -> Option<String>
where
    I: IntoIterator<Item = &'a String>,
{
    lines
        .into_iter()
        .filter_map(|line| rules.iter().find_map(|rule| rule.extract(line)))
        .last()
}

/// Resolves the produced file from the transcript of a download.
///
/// # Arguments
///
/// * `lines` - The transcript of the download, in emission order.
/// * `download_dir` - The directory the download wrote to, also used to anchor relative paths.
///
/// # Errors
///
/// Returns [`Error::ArtifactNotFound`] if no announced path exists and the directory holds no file.
pub async fn resolve(lines: &[String], download_dir: impl AsRef<Path>) -> Result<ResolvedArtifact> {
    let download_dir = download_dir.as_ref();

    if let Some(candidate) = last_match(lines, &DESTINATION_RULES) {
        let candidate = anchor(download_dir, &candidate);
        if tokio::fs::try_exists(&candidate).await.unwrap_or(false) {
            return artifact(candidate).await;
        }

        #[cfg(feature = "tracing")]
        tracing::warn!(
            "Announced output {:?} does not exist, scanning {:?}",
            candidate,
            download_dir
        );
    } else {
        #[cfg(feature = "tracing")]
        tracing::warn!("No output path announced, scanning {:?}", download_dir);
    }

    match file_system::latest_file(download_dir).await? {
        Some(latest) => artifact(latest).await,
        None => Err(Error::ArtifactNotFound(download_dir.to_path_buf())),
    }
}

fn anchor(download_dir: &Path, candidate: &str) -> PathBuf {
    let candidate = Path::new(candidate);
    if candidate.is_absolute() {
        candidate.to_path_buf()
    } else {
        download_dir.join(candidate)
    }
}

async fn artifact(path: PathBuf) -> Result<ResolvedArtifact> {
    let absolute_path = tokio::fs::canonicalize(&path).await?;
    Ok(ResolvedArtifact { absolute_path })
}
