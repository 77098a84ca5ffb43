use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::NaiveDate;
use serde::Deserialize;

use orderflow_core::id::{MovementId, ProductId};
use orderflow_inventory::{MovementKind, StockMovement};
use orderflow_store::EntityStore;

use crate::app::pagination::PageQuery;
use crate::app::{dto, errors, AppState};

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_movements).post(create_movement))
        .route("/:id", get(get_movement))
}

#[derive(Debug, Deserialize)]
pub struct MovementFilter {
    product_id: Option<ProductId>,
    kind: Option<MovementKind>,
    date_from: Option<NaiveDate>,
    date_to: Option<NaiveDate>,
}

impl MovementFilter {
    fn matches(&self, m: &StockMovement) -> bool {
        self.product_id.is_none_or(|p| m.product_id == p)
            && self.kind.is_none_or(|k| m.kind == k)
            && self.date_from.is_none_or(|d| m.date >= d)
            && self.date_to.is_none_or(|d| m.date <= d)
    }
}

pub async fn list_movements(
    Extension(state): Extension<Arc<AppState>>,
    Query(filter): Query<MovementFilter>,
    Query(page): Query<PageQuery>,
) -> Response {
    let mut items: Vec<StockMovement> = state
        .movements
        .list_all()
        .into_iter()
        .filter(|m| filter.matches(m))
        .collect();
    items.sort_by_key(|m| m.id);

    if let Some(sort) = page.sort() {
        if sort.field == "date" {
            items.sort_by_key(|m| m.date);
            if sort.descending {
                items.reverse();
            }
        }
    }

    let (items, meta) = page.paginate(items);
    dto::page(items, meta)
}

/// Every write goes through the stock ledger so the product's stock field
/// stays consistent with the movement history.
pub async fn create_movement(
    Extension(state): Extension<Arc<AppState>>,
    Json(body): Json<dto::MovementRequest>,
) -> Response {
    match state.ledger.apply_movement(
        body.product_id,
        body.kind,
        body.quantity,
        body.date,
        body.remark,
    ) {
        Ok(movement) => dto::data(StatusCode::CREATED, movement),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn get_movement(
    Extension(state): Extension<Arc<AppState>>,
    Path(id): Path<String>,
) -> Response {
    let id: MovementId = match errors::parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match state.movements.get(id) {
        Some(movement) => dto::data(StatusCode::OK, movement),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}
