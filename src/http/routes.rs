use std::io::Write;
use std::net::SocketAddr;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use axum::extract::multipart::MultipartError;
use axum::extract::{DefaultBodyLimit, Multipart, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::get;
use axum::Router;
use serde::{Deserialize, Serialize};

use crate::analysis::{AnalysisResult, BatchEntry, SampleAnalyzer};
use crate::error::{log_analysis_error, ErrorCode};

/// Usage hint returned when `/analyze` is called without a target.
pub const USAGE: &str = "POST multipart file=... or GET ?path=... or ?folder=...";

const UPLOAD_FIELD: &str = "file";

/// Shared application state for HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    pub analyzer: Arc<SampleAnalyzer>,
    project_root: Arc<PathBuf>,
}

impl AppState {
    pub fn new(analyzer: SampleAnalyzer, project_root: PathBuf) -> Self {
        Self {
            analyzer: Arc::new(analyzer),
            project_root: Arc::new(project_root),
        }
    }

    pub fn project_root(&self) -> &Path {
        &self.project_root
    }
}

/// Query parameters of `GET /analyze`.
#[derive(Debug, Default, Deserialize)]
pub struct AnalyzeQuery {
    pub path: Option<String>,
    pub folder: Option<String>,
}

/// HTTP error variants mapped to JSON responses.
#[derive(Debug)]
pub enum HttpServerError {
    BadRequest(String),
    NotFound(String),
    Usage,
    Upload(MultipartError),
    Internal(String),
}

impl IntoResponse for HttpServerError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::Usage => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(serde_json::json!({ "usage": USAGE })),
                )
                    .into_response();
            }
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            Self::Upload(err) => (err.status(), err.body_text()),
            Self::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

/// Health endpoint response payload.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Folder analysis response payload.
#[derive(Debug, Serialize)]
pub struct FolderResponse {
    pub samples: Vec<BatchEntry>,
    pub count: usize,
}

/// Build the Axum router with all handlers.
pub fn build_router(state: AppState, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/analyze", get(analyze_lookup).post(analyze_upload))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .with_state(state)
}

/// Run the HTTP server loop until Ctrl-C.
pub async fn run_http_server(
    state: AppState,
    addr: SocketAddr,
    max_upload_bytes: usize,
) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding HTTP listener on {addr}"))?;
    tracing::info!(
        "[HTTP] Listening on {} (project root {})",
        addr,
        state.project_root().display()
    );

    let router = build_router(state, max_upload_bytes);
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving HTTP router")?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!("[HTTP] Failed to listen for shutdown signal: {}", err);
        std::future::pending::<()>().await;
    }
    tracing::info!("[HTTP] Shutdown requested");
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

/// `GET /analyze?path=...` or `GET /analyze?folder=...`
pub async fn analyze_lookup(
    State(state): State<AppState>,
    Query(query): Query<AnalyzeQuery>,
) -> Result<Response, HttpServerError> {
    if let Some(rel) = query.path {
        let path = resolve_project_path(state.project_root(), &rel)?;
        if !path.is_file() {
            return Err(HttpServerError::NotFound(format!("File not found: {rel}")));
        }

        let analyzer = Arc::clone(&state.analyzer);
        let result = run_blocking(move || analyzer.analyze_one(&path)).await??;
        return Ok(Json(result).into_response());
    }

    if let Some(rel) = query.folder {
        let folder = resolve_project_path(state.project_root(), &rel)?;
        if !folder.is_dir() {
            return Err(HttpServerError::NotFound(format!("Folder not found: {rel}")));
        }

        let analyzer = Arc::clone(&state.analyzer);
        let samples = run_blocking(move || analyzer.analyze_many(&folder)).await??;
        let count = samples.len();
        return Ok(Json(FolderResponse { samples, count }).into_response());
    }

    Err(HttpServerError::Usage)
}

/// `POST /analyze` with a multipart `file` field
pub async fn analyze_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<AnalysisResult>, HttpServerError> {
    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(HttpServerError::Upload)?
    {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }
        let file_name = field.file_name().map(str::to_string);
        let data = field.bytes().await.map_err(HttpServerError::Upload)?;
        upload = Some((file_name, data));
        break;
    }

    let Some((file_name, data)) = upload else {
        return Err(HttpServerError::BadRequest(
            "No file in form (use key 'file')".to_string(),
        ));
    };

    let display_name = file_name.unwrap_or_else(|| "upload".to_string());
    tracing::info!("[HTTP] Upload {} ({} bytes)", display_name, data.len());

    let analyzer = Arc::clone(&state.analyzer);
    let result = run_blocking(move || {
        let staged = stage_upload(&display_name, &data)?;
        let mut result = analyzer
            .analyze_one(staged.path())
            .map_err(HttpServerError::from)?;
        result.file = display_name;
        Ok::<_, HttpServerError>(result)
    })
    .await??;

    Ok(Json(result))
}

/// Resolve a client-supplied relative path under the project root
///
/// Absolute paths and `..` components are rejected so lookups cannot leave
/// the project root.
pub fn resolve_project_path(root: &Path, rel: &str) -> Result<PathBuf, HttpServerError> {
    let candidate = Path::new(rel);
    let escapes = candidate.is_absolute()
        || candidate.components().any(|component| {
            matches!(
                component,
                Component::ParentDir | Component::RootDir | Component::Prefix(_)
            )
        });

    if escapes {
        tracing::warn!("[HTTP] Rejected path outside project root: {}", rel);
        return Err(HttpServerError::BadRequest(format!(
            "Path must be relative to the project root: {rel}"
        )));
    }
    Ok(root.join(candidate))
}

/// Write upload bytes to a temporary file keeping the original extension,
/// so the decoder picks the right format. The file is removed on drop.
fn stage_upload(
    file_name: &str,
    data: &[u8],
) -> Result<tempfile::NamedTempFile, HttpServerError> {
    let suffix = Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| format!(".{ext}"))
        .unwrap_or_default();

    let mut staged = tempfile::Builder::new()
        .prefix("drum-upload-")
        .suffix(&suffix)
        .tempfile()
        .map_err(|err| HttpServerError::Internal(format!("staging upload: {err}")))?;
    staged
        .write_all(data)
        .and_then(|_| staged.flush())
        .map_err(|err| HttpServerError::Internal(format!("staging upload: {err}")))?;
    Ok(staged)
}

async fn run_blocking<T, F>(job: F) -> Result<T, HttpServerError>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(job)
        .await
        .map_err(|err| HttpServerError::Internal(format!("analysis task failed: {err}")))
}

impl From<crate::error::AnalysisError> for HttpServerError {
    fn from(err: crate::error::AnalysisError) -> Self {
        log_analysis_error(&err, "http");
        tracing::debug!("[HTTP] Analysis failed with code {}", err.code());
        HttpServerError::Internal(err.message())
    }
}
