use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use orderflow_core::id::SupplierId;
use orderflow_parties::Supplier;
use orderflow_store::EntityStore;

use crate::app::pagination::PageQuery;
use crate::app::{dto, errors, AppState};

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_suppliers).post(create_supplier))
        .route(
            "/:id",
            get(get_supplier)
                .put(update_supplier)
                .delete(delete_supplier),
        )
}

#[derive(Debug, Deserialize)]
pub struct SupplierFilter {
    name: Option<String>,
}

fn validate(draft: &dto::SupplierDraft) -> Result<(), Response> {
    if draft.name.trim().is_empty() {
        return Err(errors::bad_request("name cannot be empty"));
    }
    Ok(())
}

pub async fn list_suppliers(
    Extension(state): Extension<Arc<AppState>>,
    Query(filter): Query<SupplierFilter>,
    Query(page): Query<PageQuery>,
) -> Response {
    let mut items: Vec<Supplier> = state
        .suppliers
        .list_all()
        .into_iter()
        .filter(|s| {
            filter
                .name
                .as_ref()
                .is_none_or(|n| s.name.to_lowercase().contains(&n.to_lowercase()))
        })
        .collect();
    items.sort_by_key(|s| s.id);

    if let Some(sort) = page.sort() {
        if sort.field == "name" {
            items.sort_by(|a, b| a.name.cmp(&b.name));
            if sort.descending {
                items.reverse();
            }
        }
    }

    let (items, meta) = page.paginate(items);
    dto::page(items, meta)
}

pub async fn create_supplier(
    Extension(state): Extension<Arc<AppState>>,
    Json(draft): Json<dto::SupplierDraft>,
) -> Response {
    if let Err(resp) = validate(&draft) {
        return resp;
    }
    let supplier = state.suppliers.create(|id| Supplier {
        id,
        name: draft.name,
        vat_number: draft.vat_number,
        email: draft.email,
        phone: draft.phone,
        address: draft.address,
    });
    dto::data(StatusCode::CREATED, supplier)
}

pub async fn get_supplier(
    Extension(state): Extension<Arc<AppState>>,
    Path(id): Path<String>,
) -> Response {
    let id: SupplierId = match errors::parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match state.suppliers.get(id) {
        Some(supplier) => dto::data(StatusCode::OK, supplier),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

pub async fn update_supplier(
    Extension(state): Extension<Arc<AppState>>,
    Path(id): Path<String>,
    Json(draft): Json<dto::SupplierDraft>,
) -> Response {
    let id: SupplierId = match errors::parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    if let Err(resp) = validate(&draft) {
        return resp;
    }
    if state.suppliers.get(id).is_none() {
        return StatusCode::NOT_FOUND.into_response();
    }
    let supplier = Supplier {
        id,
        name: draft.name,
        vat_number: draft.vat_number,
        email: draft.email,
        phone: draft.phone,
        address: draft.address,
    };
    state.suppliers.put(supplier.clone());
    dto::data(StatusCode::OK, supplier)
}

pub async fn delete_supplier(
    Extension(state): Extension<Arc<AppState>>,
    Path(id): Path<String>,
) -> Response {
    let id: SupplierId = match errors::parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    if state.suppliers.delete(id) {
        StatusCode::NO_CONTENT.into_response()
    } else {
        StatusCode::NOT_FOUND.into_response()
    }
}
