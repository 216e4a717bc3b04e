//! Assembles [`VideoMetadata`] from the output of an info invocation.
//!
//! The info command prints one field per line, in the order of
//! [`INFO_FIELDS`](crate::command::INFO_FIELDS). yt-dlp writes its diagnostics
//! to the same stream, so those lines are dropped before the remaining ones
//! are assigned by position.

use crate::error::{Error, Result};
use crate::model::{VIEWS_UNAVAILABLE, VideoMetadata};

/// The number of fields an info transcript must provide.
pub const REQUIRED_FIELDS: usize = 4;

/// The prefixes of diagnostic lines.
const DIAGNOSTIC_PREFIXES: [&str; 2] = ["WARNING", "ERROR"];

/// Whether the line is a diagnostic rather than a printed field.
pub fn is_diagnostic(line: &str) -> bool {
    DIAGNOSTIC_PREFIXES
        .iter()
        .any(|prefix| line.starts_with(prefix))
}

/// Builds the metadata from the transcript of an info invocation.
///
/// # Errors
///
/// Returns [`Error::InsufficientMetadata`] if fewer than [`REQUIRED_FIELDS`] lines remain
/// once diagnostics are removed.
///
/// # Examples
///
/// ```rust
/// # use ytved_core::metadata::extract;
/// let lines: Vec<String> = ["WARNING: slow", "Title A", "10:32", "http://thumb", "Uploader1", "1500000"]
///     .into_iter()
///     .map(String::from)
///     .collect();
///
/// let metadata = extract(&lines)?;
/// assert_eq!(metadata.title, "Title A");
/// assert_eq!(metadata.views, "1.5M");
/// # Ok::<(), ytved_core::error::Error>(())
/// ```
pub fn extract(lines: &[String]) -> Result<VideoMetadata> {
    let fields: Vec<&str> = lines
        .iter()
        .map(String::as_str)
        .filter(|line| !is_diagnostic(line))
        .collect();

    if fields.len() < REQUIRED_FIELDS {
        return Err(Error::InsufficientMetadata {
            found: fields.len(),
        });
    }

    let views = fields
        .get(REQUIRED_FIELDS)
        .map(|raw| format_views(raw))
        .unwrap_or_else(|| VIEWS_UNAVAILABLE.to_string());

    Ok(VideoMetadata {
        title: fields[0].to_string(),
        duration: fields[1].to_string(),
        thumbnail: fields[2].to_string(),
        uploader: fields[3].to_string(),
        views,
    })
}

/// Formats a raw view count for display.
///
/// Counts from a million up use one decimal and an `M` suffix, counts from a
/// thousand up use one decimal and a `K` suffix, smaller counts are printed
/// as is. Halves round up. Anything that is not an integer is returned unchanged.
pub fn format_views(raw: &str) -> String {
    let Ok(count) = raw.trim().parse::<i64>() else {
        return raw.to_string();
    };

    match count {
        1_000_000.. => scaled(count, 1_000_000, 'M'),
        1_000.. => scaled(count, 1_000, 'K'),
        _ => count.to_string(),
    }
}

fn scaled(count: i64, unit: i64, suffix: char) -> String {
    // Tenths of a unit, rounded half up
    let tenths = (i128::from(count) * 10 + i128::from(unit) / 2) / i128::from(unit);
    format!("{}.{}{}", tenths / 10, tenths % 10, suffix)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|line| line.to_string()).collect()
    }

    #[test]
    fn drops_diagnostics_before_assigning() {
        let metadata = extract(&lines(&[
            "WARNING: x",
            "Title A",
            "10:32",
            "http://thumb",
            "Uploader1",
            "1500000",
        ]))
        .unwrap();

        assert_eq!(
            metadata,
            VideoMetadata {
                title: "Title A".to_string(),
                duration: "10:32".to_string(),
                thumbnail: "http://thumb".to_string(),
                uploader: "Uploader1".to_string(),
                views: "1.5M".to_string(),
            }
        );
    }

    #[test]
    fn interleaved_errors_are_dropped() {
        let metadata = extract(&lines(&[
            "Title",
            "ERROR: transient",
            "1:00",
            "WARNING: another",
            "thumb",
            "someone",
        ]))
        .unwrap();

        assert_eq!(metadata.duration, "1:00");
        assert_eq!(metadata.uploader, "someone");
    }

    #[test]
    fn blank_field_keeps_its_position() {
        let metadata = extract(&lines(&["Title", "3:15", "http://t", "", "2500"])).unwrap();

        assert_eq!(metadata.uploader, "");
        assert_eq!(metadata.views, "2.5K");
    }

    #[test]
    fn views_default_when_absent() {
        let metadata = extract(&lines(&["t", "d", "th", "u"])).unwrap();
        assert_eq!(metadata.views, VIEWS_UNAVAILABLE);
    }

    #[test]
    fn three_fields_are_insufficient() {
        let err = extract(&lines(&["WARNING: a", "t", "d", "th"])).unwrap_err();
        assert!(matches!(err, Error::InsufficientMetadata { found: 3 }));
    }

    #[test]
    fn view_boundaries() {
        assert_eq!(format_views("0"), "0");
        assert_eq!(format_views("999"), "999");
        assert_eq!(format_views("1000"), "1.0K");
        assert_eq!(format_views("1250"), "1.3K");
        assert_eq!(format_views("999999"), "1000.0K");
        assert_eq!(format_views("1000000"), "1.0M");
        assert_eq!(format_views("1234567890"), "1234.6M");
    }

    #[test]
    fn malformed_views_pass_through() {
        assert_eq!(format_views("NA"), "NA");
        assert_eq!(format_views("12.5"), "12.5");
        assert_eq!(format_views(""), "");
        assert_eq!(format_views(" 42 "), "42");
    }

    #[test]
    fn view_formatting_is_monotonic() {
        let samples = [0, 1, 999, 1_000, 1_049, 1_050, 99_999, 999_999, 1_000_000, 25_000_000];
        let scaled: Vec<f64> = samples
            .iter()
            .map(|count| {
                let formatted = format_views(&count.to_string());
                let (number, factor) = match formatted.chars().last() {
                    Some('M') => (&formatted[..formatted.len() - 1], 1_000_000.0),
                    Some('K') => (&formatted[..formatted.len() - 1], 1_000.0),
                    _ => (formatted.as_str(), 1.0),
                };
                number.parse::<f64>().unwrap() * factor
            })
            .collect();

        assert!(scaled.windows(2).all(|pair| pair[0] <= pair[1]));
    }
}
