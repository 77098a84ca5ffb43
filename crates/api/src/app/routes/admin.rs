use std::sync::Arc;

use axum::extract::Extension;
use axum::http::StatusCode;

use crate::app::{seed, AppState};

/// Wipe every store and reload the reference data. Idempotent.
pub async fn reset(Extension(state): Extension<Arc<AppState>>) -> StatusCode {
    seed::seed_all(&state);
    StatusCode::NO_CONTENT
}
