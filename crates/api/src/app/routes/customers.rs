use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use orderflow_core::id::CustomerId;
use orderflow_parties::Customer;
use orderflow_store::EntityStore;

use crate::app::pagination::PageQuery;
use crate::app::{dto, errors, AppState};

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_customers).post(create_customer))
        .route(
            "/:id",
            get(get_customer)
                .put(update_customer)
                .delete(delete_customer),
        )
}

#[derive(Debug, Deserialize)]
pub struct CustomerFilter {
    company_name: Option<String>,
    vat_number: Option<String>,
}

impl CustomerFilter {
    fn matches(&self, c: &Customer) -> bool {
        self.company_name
            .as_ref()
            .is_none_or(|n| c.company_name.to_lowercase().contains(&n.to_lowercase()))
            && self
                .vat_number
                .as_ref()
                .is_none_or(|v| c.vat_number.as_ref() == Some(v))
    }
}

fn validate(draft: &dto::CustomerDraft) -> Result<(), Response> {
    if draft.company_name.trim().is_empty() {
        return Err(errors::bad_request("company_name cannot be empty"));
    }
    Ok(())
}

pub async fn list_customers(
    Extension(state): Extension<Arc<AppState>>,
    Query(filter): Query<CustomerFilter>,
    Query(page): Query<PageQuery>,
) -> Response {
    let mut items: Vec<Customer> = state
        .customers
        .list_all()
        .into_iter()
        .filter(|c| filter.matches(c))
        .collect();
    items.sort_by_key(|c| c.id);

    if let Some(sort) = page.sort() {
        if sort.field == "company_name" {
            items.sort_by(|a, b| a.company_name.cmp(&b.company_name));
            if sort.descending {
                items.reverse();
            }
        }
    }

    let (items, meta) = page.paginate(items);
    dto::page(items, meta)
}

pub async fn create_customer(
    Extension(state): Extension<Arc<AppState>>,
    Json(draft): Json<dto::CustomerDraft>,
) -> Response {
    if let Err(resp) = validate(&draft) {
        return resp;
    }
    let customer = state.customers.create(|id| Customer {
        id,
        company_name: draft.company_name,
        vat_number: draft.vat_number,
        email: draft.email,
        phone: draft.phone,
        address: draft.address,
        billing_address: draft.billing_address,
    });
    dto::data(StatusCode::CREATED, customer)
}

pub async fn get_customer(
    Extension(state): Extension<Arc<AppState>>,
    Path(id): Path<String>,
) -> Response {
    let id: CustomerId = match errors::parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match state.customers.get(id) {
        Some(customer) => dto::data(StatusCode::OK, customer),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

pub async fn update_customer(
    Extension(state): Extension<Arc<AppState>>,
    Path(id): Path<String>,
    Json(draft): Json<dto::CustomerDraft>,
) -> Response {
    let id: CustomerId = match errors::parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    if let Err(resp) = validate(&draft) {
        return resp;
    }
    if state.customers.get(id).is_none() {
        return StatusCode::NOT_FOUND.into_response();
    }
    let customer = Customer {
        id,
        company_name: draft.company_name,
        vat_number: draft.vat_number,
        email: draft.email,
        phone: draft.phone,
        address: draft.address,
        billing_address: draft.billing_address,
    };
    state.customers.put(customer.clone());
    dto::data(StatusCode::OK, customer)
}

pub async fn delete_customer(
    Extension(state): Extension<Arc<AppState>>,
    Path(id): Path<String>,
) -> Response {
    let id: CustomerId = match errors::parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    if state.customers.delete(id) {
        StatusCode::NO_CONTENT.into_response()
    } else {
        StatusCode::NOT_FOUND.into_response()
    }
}
