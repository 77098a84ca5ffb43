use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, put},
    Json, Router,
};
use chrono::NaiveDate;
use serde::Deserialize;

use orderflow_core::id::{InvoiceId, OrderId};
use orderflow_invoicing::{Invoice, InvoiceStatus};
use orderflow_store::EntityStore;

use crate::app::pagination::PageQuery;
use crate::app::{dto, errors, AppState};

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_invoices).post(create_invoice))
        .route("/:id", get(get_invoice))
        .route("/:id/status", put(update_status))
}

#[derive(Debug, Deserialize)]
pub struct InvoiceFilter {
    status: Option<InvoiceStatus>,
    order_id: Option<OrderId>,
    date_from: Option<NaiveDate>,
    date_to: Option<NaiveDate>,
}

impl InvoiceFilter {
    fn matches(&self, i: &Invoice) -> bool {
        self.status.is_none_or(|s| i.status == s)
            && self.order_id.is_none_or(|o| i.order_id == o)
            && self.date_from.is_none_or(|d| i.invoice_date >= d)
            && self.date_to.is_none_or(|d| i.invoice_date <= d)
    }
}

pub async fn list_invoices(
    Extension(state): Extension<Arc<AppState>>,
    Query(filter): Query<InvoiceFilter>,
    Query(page): Query<PageQuery>,
) -> Response {
    let mut items: Vec<Invoice> = state
        .invoices
        .list_all()
        .into_iter()
        .filter(|i| filter.matches(i))
        .collect();
    items.sort_by_key(|i| i.id);

    if let Some(sort) = page.sort() {
        let cmp: Option<fn(&Invoice, &Invoice) -> std::cmp::Ordering> =
            match sort.field.as_str() {
                "invoice_date" => Some(|a, b| a.invoice_date.cmp(&b.invoice_date)),
                "due_date" => Some(|a, b| a.due_date.cmp(&b.due_date)),
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

pub async fn create_invoice(
    Extension(state): Extension<Arc<AppState>>,
    Json(body): Json<dto::CreateInvoiceRequest>,
) -> Response {
    match state
        .invoice_engine
        .create_invoice(body.order_id, body.invoice_date)
    {
        Ok(invoice) => dto::data(StatusCode::CREATED, invoice),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn get_invoice(
    Extension(state): Extension<Arc<AppState>>,
    Path(id): Path<String>,
) -> Response {
    let id: InvoiceId = match errors::parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match state.invoices.get(id) {
        Some(invoice) => dto::data(StatusCode::OK, invoice),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

pub async fn update_status(
    Extension(state): Extension<Arc<AppState>>,
    Path(id): Path<String>,
    Json(body): Json<dto::InvoiceStatusRequest>,
) -> Response {
    let id: InvoiceId = match errors::parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match state.invoice_engine.update_status(id, body.status) {
        Ok(invoice) => dto::data(StatusCode::OK, invoice),
        Err(e) => errors::domain_error_to_response(e),
    }
}
