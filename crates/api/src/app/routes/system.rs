use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

pub async fn health() -> StatusCode {
    StatusCode::OK
}

pub async fn version() -> impl IntoResponse {
    Json(serde_json::json!({
        "name": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
