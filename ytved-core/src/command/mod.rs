//! Builds the yt-dlp command lines.
//!
//! Everything in here is pure: no process is launched and the file system is not touched.

use crate::deps::Libraries;
use crate::model::format_selector::video_format_filter;
use crate::model::{Format, Quality};
use std::path::{Path, PathBuf};

/// The fields printed by an info invocation, in the order they are read back.
pub const INFO_FIELDS: [&str; 5] = [
    "title",
    "duration_string",
    "thumbnail",
    "uploader",
    "view_count",
];

/// The file name template of downloads, relative to the output directory.
pub const OUTPUT_TEMPLATE: &str = "%(title)s.%(ext)s";

/// A fully built invocation of the external tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessInvocation {
    /// The program followed by its arguments.
    pub argv: Vec<String>,
    /// The directory the process runs in, the inherited one when `None`.
    pub working_directory: Option<PathBuf>,
}

impl ProcessInvocation {
    /// The program to launch.
    pub fn program(&self) -> &str {
        self.argv.first().map(String::as_str).unwrap_or_default()
    }

    /// The arguments following the program.
    pub fn args(&self) -> &[String] {
        self.argv.get(1..).unwrap_or_default()
    }
}

/// Builds the argument vectors handed to yt-dlp.
#[derive(Debug, Clone)]
pub struct CommandBuilder {
    program: String,
    ffmpeg: String,
}

impl CommandBuilder {
    /// Creates a builder for an already resolved program.
    pub fn new(program: impl Into<String>, ffmpeg: impl AsRef<Path>) -> Self {
        Self {
            program: program.into(),
            ffmpeg: ffmpeg.as_ref().to_string_lossy().into_owned(),
        }
    }

    /// Creates a builder from the configured libraries, resolving the yt-dlp executable.
    pub fn from_libraries(libraries: &Libraries) -> Self {
        Self::new(
            libraries.youtube_executable().to_string_lossy(),
            &libraries.ffmpeg,
        )
    }

    /// Builds the argv printing the metadata fields of a video without downloading it.
    pub fn info_command(&self, url: &str) -> Vec<String> {
        let mut argv = self.prelude();
        for field in INFO_FIELDS {
            argv.push("--print".to_string());
            argv.push(field.to_string());
        }
        argv.push("--no-download".to_string());
        argv.push(url.to_string());

        argv
    }

    /// Builds the argv downloading a video into `output_dir`.
    ///
    /// Audio requests ignore `quality` and extract the best audio stream to mp3.
    /// Video requests select streams by quality tier and remux the result to mp4.
    pub fn download_command(
        &self,
        url: &str,
        format: Format,
        quality: Quality,
        output_dir: impl AsRef<Path>,
    ) -> Vec<String> {
        let mut argv = self.prelude();

        match format {
            Format::Mp3 => {
                argv.extend(to_owned(["-x", "--audio-format", "mp3", "--audio-quality", "0"]));
            }
            Format::Mp4 => {
                let filter = video_format_filter(quality.as_str());

                #[cfg(feature = "tracing")]
                tracing::debug!("Format filter for quality {}: {}", quality, filter);

                argv.extend([
                    "-f".to_string(),
                    filter,
                    "--merge-output-format".to_string(),
                    "mp4".to_string(),
                    "--remux-video".to_string(),
                    "mp4".to_string(),
                ]);
            }
        }

        let template = output_dir.as_ref().join(OUTPUT_TEMPLATE);
        argv.extend([
            "--restrict-filenames".to_string(),
            "-o".to_string(),
            template.to_string_lossy().into_owned(),
            url.to_string(),
        ]);

        argv
    }

    fn prelude(&self) -> Vec<String> {
        vec![
            self.program.clone(),
            "--ffmpeg-location".to_string(),
            self.ffmpeg.clone(),
        ]
    }
}

fn to_owned<const N: usize>(args: [&str; N]) -> impl Iterator<Item = String> {
    args.into_iter().map(String::from)
}
