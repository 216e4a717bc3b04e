use crate::response::ApiError;
use serde::Deserialize;
use std::collections::BTreeMap;
use ytved_core::model::{self, DownloadRequest, Format, Quality};

/// The body of `POST /download`, before validation.
#[derive(Debug, Default, Deserialize)]
pub struct DownloadBody {
    pub url: Option<String>,
    pub format: Option<String>,
    pub quality: Option<String>,
}

/// The query of `GET /info`.
#[derive(Debug, Default, Deserialize)]
pub struct InfoQuery {
    pub url: Option<String>,
}

impl TryFrom<DownloadBody> for DownloadRequest {
    type Error = ApiError;

    /// Validates every field, reporting all failures at once.
    fn try_from(body: DownloadBody) -> Result<Self, Self::Error> {
        let mut failures = BTreeMap::new();

        let url = body.url.unwrap_or_default();
        if let Err(e) = model::validate_url(&url) {
            failures.insert("url", e.to_string());
        }

        let format = match body.format.as_deref().map(str::parse::<Format>) {
            None => Format::default(),
            Some(Ok(format)) => format,
            Some(Err(e)) => {
                failures.insert("format", e.to_string());
                Format::default()
            }
        };

        let quality = match body.quality.as_deref().map(str::parse::<Quality>) {
            None => Quality::default(),
            Some(Ok(quality)) => quality,
            Some(Err(e)) => {
                failures.insert("quality", e.to_string());
                Quality::default()
            }
        };

        if !failures.is_empty() {
            return Err(ApiError::Validation(validation_message(&failures)));
        }

        Ok(DownloadRequest {
            url,
            format,
            quality,
        })
    }
}

impl InfoQuery {
    /// Returns the URL once it is known to be a YouTube video URL.
    pub fn into_url(self) -> Result<String, ApiError> {
        let url = self.url.unwrap_or_default();
        model::validate_url(&url).map_err(ApiError::info)?;
        Ok(url)
    }
}

fn validation_message(failures: &BTreeMap<&str, String>) -> String {
    let fields: Vec<String> = failures
        .iter()
        .map(|(field, message)| format!("{field}={message}"))
        .collect();

    format!("Validation failed: {{{}}}", fields.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(url: Option<&str>, format: Option<&str>, quality: Option<&str>) -> DownloadBody {
        DownloadBody {
            url: url.map(String::from),
            format: format.map(String::from),
            quality: quality.map(String::from),
        }
    }

    #[test]
    fn defaults_apply() {
        let request =
            DownloadRequest::try_from(body(Some("https://youtu.be/abc"), None, None)).unwrap();
        assert_eq!(request.format, Format::Mp4);
        assert_eq!(request.quality, Quality::Best);
    }

    #[test]
    fn all_failures_are_reported() {
        let err = DownloadRequest::try_from(body(
            Some("https://example.com"),
            Some("avi"),
            Some("4k"),
        ))
        .unwrap_err();

        assert_eq!(
            err.to_string(),
            "Validation failed: {format=Format must be mp4 or mp3, quality=Invalid quality option, url=Invalid YouTube URL}"
        );
    }

    #[test]
    fn missing_url_is_required() {
        let err = DownloadRequest::try_from(body(None, Some("mp3"), None)).unwrap_err();
        assert_eq!(err.to_string(), "Validation failed: {url=URL is required}");
    }

    #[test]
    fn info_rejects_option_like_urls() {
        let query = InfoQuery {
            url: Some("--exec rm".to_string()),
        };
        assert!(matches!(query.into_url(), Err(ApiError::Validation(_))));
    }
}
