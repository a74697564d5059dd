//! HTTP front-end for sample analysis.
//!
//! A small Axum service exposing the analyzer over multipart upload and
//! project-relative file/folder lookups. Analysis runs on tokio's blocking
//! pool; uploads are staged in temporary files that are removed on drop.

mod routes;

pub use routes::{
    build_router, resolve_project_path, run_http_server, AnalyzeQuery, AppState,
    FolderResponse, HealthResponse, HttpServerError, USAGE,
};
