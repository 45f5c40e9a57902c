use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::any::Any;

use crate::error::ErrorBody;

#[derive(Serialize)]
pub struct ApiStatus {
    pub status: &'static str,
    pub version: &'static str,
}

#[derive(Serialize)]
pub struct Home {
    pub name: &'static str,
    pub links: Vec<&'static str>,
}

/// GET /
pub async fn home() -> Json<Home> {
    Json(Home {
        name: "Fyyur",
        links: vec!["/venues", "/artists", "/shows"],
    })
}

/// GET /healthz
pub async fn healthz() -> Json<ApiStatus> {
    Json(ApiStatus {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Fallback for unknown routes.
pub async fn not_found() -> (StatusCode, Json<ErrorBody>) {
    (StatusCode::NOT_FOUND, Json(ErrorBody::not_found()))
}

/// Response for a handler that panicked.
pub fn server_error(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = panic
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| panic.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic payload");
    tracing::error!(%detail, "handler panicked");

    (StatusCode::INTERNAL_SERVER_ERROR, Json(ErrorBody::internal())).into_response()
}
