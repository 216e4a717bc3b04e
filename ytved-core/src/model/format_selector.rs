//! Output format and quality selection.

use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Represents the container requested by the caller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    /// A merged video and audio file.
    #[default]
    Mp4,
    /// An audio-only file, extracted and transcoded by ffmpeg.
    Mp3,
}

/// Represents the maximum video height requested by the caller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Quality {
    /// Best available video quality, without any height constraint.
    #[default]
    #[serde(rename = "best")]
    Best,
    /// 1080p or lower.
    #[serde(rename = "1080")]
    P1080,
    /// 720p or lower.
    #[serde(rename = "720")]
    P720,
    /// 480p or lower.
    #[serde(rename = "480")]
    P480,
    /// 360p or lower.
    #[serde(rename = "360")]
    P360,
}

impl Format {
    /// The literal accepted on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            Format::Mp4 => "mp4",
            Format::Mp3 => "mp3",
        }
    }
}

impl Quality {
    /// Every accepted quality tier.
    pub const ALL: [Quality; 5] = [
        Quality::Best,
        Quality::P1080,
        Quality::P720,
        Quality::P480,
        Quality::P360,
    ];

    /// The literal accepted on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            Quality::Best => "best",
            Quality::P1080 => "1080",
            Quality::P720 => "720",
            Quality::P480 => "480",
            Quality::P360 => "360",
        }
    }

    /// The maximum height of the tier, `None` for [`Quality::Best`].
    pub fn max_height(&self) -> Option<u32> {
        match self {
            Quality::Best => None,
            Quality::P1080 => Some(1080),
            Quality::P720 => Some(720),
            Quality::P480 => Some(480),
            Quality::P360 => Some(360),
        }
    }
}

impl FromStr for Format {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mp4" => Ok(Format::Mp4),
            "mp3" => Ok(Format::Mp3),
            _ => Err(Error::Validation("Format must be mp4 or mp3".to_string())),
        }
    }
}

impl FromStr for Quality {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Quality::ALL
            .into_iter()
            .find(|quality| quality.as_str() == s)
            .ok_or_else(|| Error::Validation("Invalid quality option".to_string()))
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The filter used when no height constraint applies.
pub const UNCONSTRAINED_FILTER: &str = "bestvideo+bestaudio/best";

/// Returns the yt-dlp `-f` filter for a quality label.
///
/// Known tiers prefer an mp4 video stream and an m4a audio stream below the
/// requested height, falling back to the best single file below that height.
/// Any other label, `best` included, yields [`UNCONSTRAINED_FILTER`].
pub fn video_format_filter(quality: &str) -> String {
    let height = match quality {
        "1080" => 1080,
        "720" => 720,
        "480" => 480,
        "360" => 360,
        _ => return UNCONSTRAINED_FILTER.to_string(),
    };

    format!("bestvideo[height<={height}][ext=mp4]+bestaudio[ext=m4a]/best[height<={height}]")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_per_tier() {
        assert_eq!(
            video_format_filter("1080"),
            "bestvideo[height<=1080][ext=mp4]+bestaudio[ext=m4a]/best[height<=1080]"
        );
        assert_eq!(
            video_format_filter("360"),
            "bestvideo[height<=360][ext=mp4]+bestaudio[ext=m4a]/best[height<=360]"
        );
        assert_eq!(video_format_filter("best"), UNCONSTRAINED_FILTER);
    }

    #[test]
    fn unknown_quality_is_unconstrained() {
        assert_eq!(video_format_filter("4k"), UNCONSTRAINED_FILTER);
        assert_eq!(video_format_filter(""), UNCONSTRAINED_FILTER);
    }

    #[test]
    fn filter_mentions_tier_height() {
        for quality in Quality::ALL {
            let filter = video_format_filter(quality.as_str());
            match quality.max_height() {
                Some(height) => assert!(filter.contains(&format!("[height<={height}]"))),
                None => assert!(!filter.contains("height")),
            }
        }
    }

    #[test]
    fn parse_literals() {
        assert_eq!("720".parse::<Quality>().unwrap(), Quality::P720);
        assert_eq!("mp3".parse::<Format>().unwrap(), Format::Mp3);
        assert!("720p".parse::<Quality>().unwrap_err().is_validation());
        assert!("wav".parse::<Format>().is_err());
    }
}
