use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use log::{error, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The JSON envelope of every non-binary response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: String,
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            message: "OK".to_string(),
            data: Some(data),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: None,
        }
    }
}

/// Failures of a request, rendered as an error envelope.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request was malformed, no process was launched.
    #[error("{0}")]
    Validation(String),
    /// The info lookup failed.
    #[error("{0}")]
    Info(ytved_core::Error),
    /// The download failed or its file could not be served.
    #[error("{0}")]
    Download(ytved_core::Error),
}

impl ApiError {
    /// Maps a download failure, keeping validation failures client-side.
    pub fn download(err: ytved_core::Error) -> Self {
        match err {
            ytved_core::Error::Validation(message) => Self::Validation(message),
            other => Self::Download(other),
        }
    }

    /// Maps an info failure.
    pub fn info(err: ytved_core::Error) -> Self {
        match err {
            ytved_core::Error::Validation(message) => Self::Validation(message),
            other => Self::Info(other),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::Info(_) => StatusCode::BAD_REQUEST,
            ApiError::Download(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::Validation(message) => warn!("Rejected request: {}", message),
            ApiError::Info(e) => warn!("Info lookup failed: {}", e),
            ApiError::Download(e) => error!("Download failed: {}", e),
        }

        let body = ApiResponse::<()>::error(self.to_string());
        (self.status(), Json(body)).into_response()
    }
}
