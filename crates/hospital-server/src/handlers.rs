use axum::{
    Json,
    http::{StatusCode, header},
    response::IntoResponse,
};
use serde::Serialize;
use serde_json::json;

/// OpenAPI description of the `/api` routes.
pub const OPENAPI_YAML: &str = include_str!("../api/hospital-mgmt.openapi.yaml");

#[derive(Serialize)]
pub struct HealthResponse<'a> {
    status: &'a str,
}

pub async fn root() -> impl IntoResponse {
    let body = json!({
        "service": "Hospital Management API",
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "commit": env!("GIT_COMMIT"),
    });
    (StatusCode::OK, Json(body))
}

pub async fn healthz() -> impl IntoResponse {
    (StatusCode::OK, Json(HealthResponse { status: "ok" }))
}

pub async fn openapi() -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/yaml")],
        OPENAPI_YAML,
    )
}
