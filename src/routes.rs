use crate::media::{content_disposition, content_type, extension_of};
use crate::request::{DownloadBody, InfoQuery};
use crate::response::{ApiError, ApiResponse};
use axum::{
    Json, Router,
    body::Body,
    extract::{Query, State, rejection::JsonRejection},
    http::{HeaderValue, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use log::info;
use serde::Serialize;
use std::sync::Arc;
use tokio_util::io::ReaderStream;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use ytved_core::Downloader;
use ytved_core::model::{DownloadRequest, VideoMetadata};

#[derive(Clone)]
pub struct AppState {
    pub downloader: Arc<Downloader>,
}

impl AppState {
    pub fn new(downloader: Downloader) -> Self {
        Self {
            downloader: Arc::new(downloader),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    status: &'static str,
    service: &'static str,
}

/// Creates the router, every route lives under `/api/v1`.
pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .route("/info", get(video_info))
        .route("/download", post(download_video))
        .route("/health", get(health));

    Router::new()
        .nest("/api/v1", api)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn video_info(
    State(state): State<AppState>,
    Query(query): Query<InfoQuery>,
) -> Result<Json<ApiResponse<VideoMetadata>>, ApiError> {
    let url = query.into_url()?;
    let metadata = state
        .downloader
        .fetch_video_info(&url)
        .await
        .map_err(ApiError::info)?;

    Ok(Json(ApiResponse::success(metadata)))
}

async fn download_video(
    State(state): State<AppState>,
    body: Result<Json<DownloadBody>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(body) = body.map_err(|rejection| ApiError::Validation(rejection.body_text()))?;
    let request = DownloadRequest::try_from(body)?;

    let artifact = state
        .downloader
        .download(&request)
        .await
        .map_err(ApiError::download)?;

    let file_name = artifact.file_name().into_owned();
    let content_type = content_type(&extension_of(&file_name));
    info!("Sending {} as {}", artifact, content_type);

    let file = tokio::fs::File::open(artifact.path())
        .await
        .map_err(|e| ApiError::Download(e.into()))?;
    let length = file
        .metadata()
        .await
        .map_err(|e| ApiError::Download(e.into()))?
        .len();

    let header_value = |value: &str| {
        HeaderValue::from_str(value)
            .map_err(|e| ApiError::Download(ytved_core::Error::IO(std::io::Error::other(e))))
    };

    let headers = [
        (header::CONTENT_TYPE, header_value(&content_type)?),
        (
            header::CONTENT_DISPOSITION,
            header_value(&content_disposition(&file_name))?,
        ),
        (header::CONTENT_LENGTH, HeaderValue::from(length)),
    ];

    Ok((headers, Body::from_stream(ReaderStream::new(file))).into_response())
}

async fn health() -> Json<ApiResponse<HealthStatus>> {
    Json(ApiResponse::success(HealthStatus {
        status: "UP",
        service: "YT Downloader API",
    }))
}
