//! Request DTOs and the JSON response envelope.
//!
//! Every successful JSON body is `{ "data": ..., "meta": ...? }`; error
//! bodies carry `{ "data": null, "errors": [..] }` (see `errors.rs`).

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::json;

use orderflow_core::id::{CustomerId, OrderId, ProductId};
use orderflow_inventory::MovementKind;
use orderflow_invoicing::InvoiceStatus;
use orderflow_orders::{NewOrderLine, OrderStatus};

use crate::app::pagination::Meta;

pub fn data<T: Serialize>(status: StatusCode, value: T) -> Response {
    (status, Json(json!({ "data": value }))).into_response()
}

pub fn page<T: Serialize>(items: Vec<T>, meta: Meta) -> Response {
    (
        StatusCode::OK,
        Json(json!({ "data": items, "meta": meta })),
    )
        .into_response()
}

#[derive(Debug, Deserialize)]
pub struct CustomerDraft {
    pub company_name: String,
    pub vat_number: Option<String>,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub billing_address: String,
}

#[derive(Debug, Deserialize)]
pub struct SupplierDraft {
    pub name: String,
    pub vat_number: String,
    pub email: String,
    pub phone: String,
    pub address: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateOrderRequest {
    pub customer_id: CustomerId,
    pub order_date: NaiveDate,
    pub lines: Vec<NewOrderLine>,
}

#[derive(Debug, Deserialize)]
pub struct OrderStatusRequest {
    pub status: OrderStatus,
}

#[derive(Debug, Deserialize)]
pub struct CreateInvoiceRequest {
    pub order_id: OrderId,
    pub invoice_date: NaiveDate,
}

#[derive(Debug, Deserialize)]
pub struct InvoiceStatusRequest {
    pub status: InvoiceStatus,
}

#[derive(Debug, Deserialize)]
pub struct MovementRequest {
    pub product_id: ProductId,
    pub kind: MovementKind,
    pub quantity: i64,
    pub date: NaiveDate,
    pub remark: Option<String>,
}
