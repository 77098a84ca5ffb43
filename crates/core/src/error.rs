//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on deterministic business failures (absent references,
/// malformed input, illegal state changes, uniqueness violations). All
/// variants are recoverable by the caller; engines never abort the process
/// on them.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A referenced entity does not exist.
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: String },

    /// Malformed or out-of-range input.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// An illegal state-machine transition was attempted.
    #[error("invalid status transition from {from} to {to}")]
    InvalidTransition { from: String, to: String },

    /// An outbound movement would drive stock negative.
    #[error("insufficient stock for {product_id}: current stock {current}")]
    InsufficientStock { product_id: String, current: i64 },

    /// A uniqueness violation (duplicate SKU, duplicate invoice-per-order).
    #[error("conflict: {0}")]
    Conflict(String),
}

impl DomainError {
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    pub fn invalid_transition(from: impl ToString, to: impl ToString) -> Self {
        Self::InvalidTransition {
            from: from.to_string(),
            to: to.to_string(),
        }
    }

    pub fn insufficient_stock(product_id: impl ToString, current: i64) -> Self {
        Self::InsufficientStock {
            product_id: product_id.to_string(),
            current,
        }
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }
}
