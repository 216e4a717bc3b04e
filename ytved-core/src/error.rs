//! The errors that can occur.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// A type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;

/// The possible errors that can occur.
#[derive(Debug, Error)]
pub enum Error {
    /// An error occurred while running the runtime.
    #[error("An error occurred while running the runtime: {0}")]
    Runtime(#[from] tokio::task::JoinError),
    /// An error occurred while interacting with the file system.
    #[error("An IO error occurred: {0}")]
    IO(#[from] std::io::Error),

    /// The request was rejected before any process was launched.
    #[error("{0}")]
    Validation(String),
    /// The executable could not be found or started.
    #[error("Failed to launch {}: {source}", .program.display())]
    Launch {
        /// The program that was requested.
        program: PathBuf,
        /// The underlying spawn error.
        #[source]
        source: std::io::Error,
    },
    /// The process terminated with a non-zero status.
    #[error("yt-dlp failed with code {code}:\n{}", .lines.join("\n"))]
    Execution {
        /// The exit code, `-1` when the process was terminated by a signal.
        code: i32,
        /// Every line the process emitted, in emission order.
        lines: Vec<String>,
    },
    /// The process succeeded but the produced file could not be located.
    #[error("Download completed but file could not be located in {}", .0.display())]
    ArtifactNotFound(PathBuf),
    /// The process succeeded but printed too few metadata fields.
    #[error("Could not fetch video info. Please check the URL. ({found} fields received)")]
    InsufficientMetadata {
        /// The number of usable lines that were received.
        found: usize,
    },
    /// The process exceeded the configured deadline and was killed.
    #[error("Operation timed out after {0:?}")]
    Timeout(Duration),
}

impl Error {
    /// Whether the error was raised before the external tool was started.
    pub fn is_validation(&self) -> bool {
        matches!(self, Error::Validation(_))
    }

    /// The captured transcript, for errors which carry one.
    pub fn transcript(&self) -> Option<&[String]> {
        match self {
            Error::Execution { lines, .. } => Some(lines),
            _ => None,
        }
    }
}
