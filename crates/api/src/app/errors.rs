use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use orderflow_core::DomainError;

/// Map a domain failure to its HTTP shape.
///
/// Absent entities map to a bare 404; validation-class failures carry their
/// messages in the envelope's `errors` list.
pub fn domain_error_to_response(err: DomainError) -> Response {
    match err {
        DomainError::NotFound { .. } => StatusCode::NOT_FOUND.into_response(),
        DomainError::Conflict(_) => error_response(StatusCode::CONFLICT, vec![err.to_string()]),
        DomainError::InvalidArgument(_)
        | DomainError::InvalidTransition { .. }
        | DomainError::InsufficientStock { .. } => {
            error_response(StatusCode::BAD_REQUEST, vec![err.to_string()])
        }
    }
}

pub fn error_response(status: StatusCode, messages: Vec<String>) -> Response {
    (
        status,
        axum::Json(json!({ "data": null, "errors": messages })),
    )
        .into_response()
}

pub fn bad_request(message: impl Into<String>) -> Response {
    error_response(StatusCode::BAD_REQUEST, vec![message.into()])
}

/// Parse a prefixed path id (`PRD-1001`, `ORD-1001`, ...), rejecting
/// malformed ids before any store lookup.
pub fn parse_id<T>(raw: &str) -> Result<T, Response>
where
    T: std::str::FromStr<Err = DomainError>,
{
    raw.parse::<T>().map_err(domain_error_to_response)
}
