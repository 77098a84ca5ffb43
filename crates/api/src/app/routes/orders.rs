use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;

use orderflow_core::id::{CustomerId, OrderId};
use orderflow_orders::{Order, OrderStatus};
use orderflow_store::EntityStore;

use crate::app::pagination::PageQuery;
use crate::app::{dto, errors, AppState};

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_orders).post(create_order))
        .route("/:id", get(get_order))
        .route("/:id/status", put(update_status))
        .route("/:id/recalculate", post(recalculate))
}

#[derive(Debug, Deserialize)]
pub struct OrderFilter {
    customer_id: Option<CustomerId>,
    status: Option<OrderStatus>,
    date_from: Option<NaiveDate>,
    date_to: Option<NaiveDate>,
    total_min: Option<Decimal>,
    total_max: Option<Decimal>,
}

impl OrderFilter {
    fn matches(&self, o: &Order) -> bool {
        self.customer_id.is_none_or(|c| o.customer_id == c)
            && self.status.is_none_or(|s| o.status == s)
            && self.date_from.is_none_or(|d| o.order_date >= d)
            && self.date_to.is_none_or(|d| o.order_date <= d)
            && self.total_min.is_none_or(|t| o.totals.inc_vat >= t)
            && self.total_max.is_none_or(|t| o.totals.inc_vat <= t)
    }
}

pub async fn list_orders(
    Extension(state): Extension<Arc<AppState>>,
    Query(filter): Query<OrderFilter>,
    Query(page): Query<PageQuery>,
) -> Response {
    let mut items: Vec<Order> = state
        .orders
        .list_all()
        .into_iter()
        .filter(|o| filter.matches(o))
        .collect();
    items.sort_by_key(|o| o.id);

    if let Some(sort) = page.sort() {
        let cmp: Option<fn(&Order, &Order) -> std::cmp::Ordering> = match sort.field.as_str() {
            "order_date" => Some(|a, b| a.order_date.cmp(&b.order_date)),
            "inc_vat" => Some(|a, b| a.totals.inc_vat.cmp(&b.totals.inc_vat)),
            _ => None,
        };
        if let Some(cmp) = cmp {
            items.sort_by(cmp);
            if sort.descending {
                items.reverse();
            }
        }
    }

    let (items, meta) = page.paginate(items);
    dto::page(items, meta)
}

pub async fn create_order(
    Extension(state): Extension<Arc<AppState>>,
    Json(body): Json<dto::CreateOrderRequest>,
) -> Response {
    match state
        .order_engine
        .create_order(body.customer_id, body.order_date, body.lines)
    {
        Ok(order) => dto::data(StatusCode::CREATED, order),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn get_order(
    Extension(state): Extension<Arc<AppState>>,
    Path(id): Path<String>,
) -> Response {
    let id: OrderId = match errors::parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match state.orders.get(id) {
        Some(order) => dto::data(StatusCode::OK, order),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

/// Transition an order. Delivery deducts stock per line best-effort; any
/// per-line failures ride along in the envelope's `errors` list while the
/// status change itself stands.
pub async fn update_status(
    Extension(state): Extension<Arc<AppState>>,
    Path(id): Path<String>,
    Json(body): Json<dto::OrderStatusRequest>,
) -> Response {
    let id: OrderId = match errors::parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match state.order_engine.update_status(id, body.status) {
        Ok(outcome) => {
            if outcome.stock_failures.is_empty() {
                dto::data(StatusCode::OK, outcome.order)
            } else {
                let messages: Vec<String> = outcome
                    .stock_failures
                    .iter()
                    .map(|e| e.to_string())
                    .collect();
                (
                    StatusCode::OK,
                    Json(json!({ "data": outcome.order, "errors": messages })),
                )
                    .into_response()
            }
        }
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn recalculate(
    Extension(state): Extension<Arc<AppState>>,
    Path(id): Path<String>,
) -> Response {
    let id: OrderId = match errors::parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match state.order_engine.recalculate(id) {
        Ok(order) => dto::data(StatusCode::OK, order),
        Err(e) => errors::domain_error_to_response(e),
    }
}
