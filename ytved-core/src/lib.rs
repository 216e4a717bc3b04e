//! Orchestration of the `yt-dlp` command line tool.
//!
//! The [`Downloader`] turns a URL and the caller's format and quality
//! preferences into a `yt-dlp` invocation, supervises the process and reads
//! its transcript back, either as [`VideoMetadata`] or as the path of the
//! file it produced.
//!
//! Every call maps to exactly one process. Calls share no mutable state and
//! may run concurrently; each one suspends the calling task until its process
//! has exited.

use crate::command::{CommandBuilder, ProcessInvocation};
use crate::deps::Libraries;
use crate::error::Result;
use crate::executor::{Executor, ProcessOutcome};
use crate::model::{DownloadRequest, Format, Quality, ResolvedArtifact, VideoMetadata};
use crate::utils::file_system;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub mod command;
pub mod deps;
pub mod error;
pub mod executor;
pub mod metadata;
pub mod model;
pub mod resolver;
pub mod utils;

pub use error::Error;

/// The settings of a [`Downloader`], built once at startup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// The directory downloads are written to.
    pub download_dir: PathBuf,
    /// The external tools.
    pub libraries: Libraries,
    /// The deadline of each process, `None` to wait until it exits.
    pub timeout: Option<Duration>,
    /// Whether each download gets its own subdirectory of `download_dir`.
    ///
    /// Two concurrent downloads of videos with the same title write the same
    /// file name. Isolating them trades a flat directory for safety.
    pub isolate_downloads: bool,
}

impl Config {
    /// Creates a configuration with no timeout and a shared download directory.
    pub fn new(download_dir: impl Into<PathBuf>, libraries: Libraries) -> Self {
        Self {
            download_dir: download_dir.into(),
            libraries,
            timeout: None,
            isolate_downloads: false,
        }
    }
}

/// A video fetcher that uses yt-dlp to fetch video information and download it.
///
/// # Examples
///
/// ```rust,no_run
/// # use ytved_core::{Config, Downloader};
/// # use ytved_core::deps::Libraries;
/// # use ytved_core::model::{Format, Quality};
/// # use std::path::PathBuf;
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let libraries = Libraries::new(PathBuf::from("/usr/local/bin/yt-dlp"), PathBuf::from("ffmpeg"));
/// let downloader = Downloader::new(Config::new("downloads", libraries))?;
///
/// let url = "https://www.youtube.com/watch?v=dQw4w9WgXcQ";
/// let info = downloader.fetch_video_info(url).await?;
/// println!("Video title: {}", info.title);
///
/// let artifact = downloader.download_video(url, Format::Mp3, Quality::Best).await?;
/// println!("Saved to {}", artifact);
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct Downloader {
    config: Config,
    commands: CommandBuilder,
}

impl fmt::Display for Downloader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Downloader: download_dir={:?}, libraries={:?}",
            self.config.download_dir, self.config.libraries
        )
    }
}

impl Downloader {
    /// Creates a downloader, creating the download directory and its parents if needed.
    ///
    /// The download directory is made absolute, as yt-dlp runs inside it.
    ///
    /// # Errors
    ///
    /// This function will return an error if the download directory could not be created.
    pub fn new(mut config: Config) -> Result<Self> {
        #[cfg(feature = "tracing")]
        tracing::debug!("Creating a new downloader with {:?}", config);

        file_system::create_dir(&config.download_dir)?;
        config.download_dir = std::fs::canonicalize(&config.download_dir)?;
        let commands = CommandBuilder::from_libraries(&config.libraries);

        Ok(Self { config, commands })
    }

    /// The directory downloads are written to.
    pub fn download_dir(&self) -> &Path {
        &self.config.download_dir
    }

    /// Fetches the title, duration, thumbnail, uploader and view count of a video.
    ///
    /// # Errors
    ///
    /// This function will return an error if yt-dlp could not be started, failed,
    /// or printed fewer than four fields.
    pub async fn fetch_video_info(&self, url: impl AsRef<str>) -> Result<VideoMetadata> {
        let url = url.as_ref();

        #[cfg(feature = "tracing")]
        tracing::info!("Fetching video info for {}", url);

        let invocation = ProcessInvocation {
            argv: self.commands.info_command(url),
            working_directory: None,
        };
        let outcome = self.run(&invocation).await?;

        metadata::extract(&outcome.lines)
    }

    /// Downloads a validated request.
    ///
    /// # Errors
    ///
    /// See [`Downloader::download_video`].
    pub async fn download(&self, request: &DownloadRequest) -> Result<ResolvedArtifact> {
        self.download_video(&request.url, request.format, request.quality)
            .await
    }

    /// Downloads a video, or its audio track, and returns the produced file.
    ///
    /// The file is looked up from the lines yt-dlp prints, then from the most
    /// recently modified file of the output directory.
    ///
    /// With isolated downloads, the directory of a failed download is removed.
    ///
    /// # Errors
    ///
    /// This function will return an error if yt-dlp could not be started, failed,
    /// or if the produced file could not be located.
    pub async fn download_video(
        &self,
        url: impl AsRef<str>,
        format: Format,
        quality: Quality,
    ) -> Result<ResolvedArtifact> {
        let url = url.as_ref();

        #[cfg(feature = "tracing")]
        tracing::info!("Downloading {} as {} ({})", url, format, quality);

        let output_dir = self.output_dir().await?;
        let result = self.download_into(url, format, quality, &output_dir).await;

        // A failed download leaves nothing worth keeping in its own directory
        if result.is_err() && self.config.isolate_downloads {
            if let Err(_e) = tokio::fs::remove_dir_all(&output_dir).await {
                #[cfg(feature = "tracing")]
                tracing::warn!("Failed to remove {}: {}", output_dir.display(), _e);
            }
        }

        result
    }

    async fn download_into(
        &self,
        url: &str,
        format: Format,
        quality: Quality,
        output_dir: &Path,
    ) -> Result<ResolvedArtifact> {
        let invocation = ProcessInvocation {
            argv: self
                .commands
                .download_command(url, format, quality, output_dir),
            working_directory: Some(output_dir.to_path_buf()),
        };
        let outcome = self.run(&invocation).await?;

        let artifact = resolver::resolve(&outcome.lines, output_dir).await?;

        #[cfg(feature = "tracing")]
        tracing::info!("Downloaded {}", artifact);

        Ok(artifact)
    }

    async fn output_dir(&self) -> Result<PathBuf> {
        if self.config.isolate_downloads {
            return file_system::create_unique_dir(&self.config.download_dir).await;
        }

        Ok(self.config.download_dir.clone())
    }

    async fn run(&self, invocation: &ProcessInvocation) -> Result<ProcessOutcome> {
        Executor::from_invocation(invocation, self.config.timeout)
            .execute()
            .await
    }
}
