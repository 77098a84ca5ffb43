use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use rust_decimal::Decimal;
use serde::Deserialize;

use orderflow_core::id::{ProductId, SupplierId};
use orderflow_products::{Product, ProductDraft};
use orderflow_store::EntityStore;

use crate::app::pagination::PageQuery;
use crate::app::{dto, errors, AppState};

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_products).post(create_product))
        .route(
            "/:id",
            get(get_product).put(update_product).delete(delete_product),
        )
        .route("/:id/movements", get(recent_movements))
}

#[derive(Debug, Deserialize)]
pub struct ProductFilter {
    name: Option<String>,
    sku: Option<String>,
    category: Option<String>,
    supplier_id: Option<SupplierId>,
    sale_price_min: Option<Decimal>,
    sale_price_max: Option<Decimal>,
}

impl ProductFilter {
    fn matches(&self, p: &Product) -> bool {
        self.name
            .as_ref()
            .is_none_or(|n| p.name.to_lowercase().contains(&n.to_lowercase()))
            && self.sku.as_ref().is_none_or(|s| &p.sku == s)
            && self.category.as_ref().is_none_or(|c| &p.category == c)
            && self.supplier_id.is_none_or(|s| p.supplier_id == s)
            && self.sale_price_min.is_none_or(|min| p.sale_price >= min)
            && self.sale_price_max.is_none_or(|max| p.sale_price <= max)
    }
}

pub async fn list_products(
    Extension(state): Extension<Arc<AppState>>,
    Query(filter): Query<ProductFilter>,
    Query(page): Query<PageQuery>,
) -> Response {
    let mut items: Vec<Product> = state
        .products
        .list_all()
        .into_iter()
        .filter(|p| filter.matches(p))
        .collect();
    items.sort_by_key(|p| p.id);

    if let Some(sort) = page.sort() {
        // Unknown sort fields are ignored, keeping id order.
        let cmp: Option<fn(&Product, &Product) -> std::cmp::Ordering> =
            match sort.field.as_str() {
                "name" => Some(|a, b| a.name.cmp(&b.name)),
                "sku" => Some(|a, b| a.sku.cmp(&b.sku)),
                "sale_price" => Some(|a, b| a.sale_price.cmp(&b.sale_price)),
                "stock" => Some(|a, b| a.stock.cmp(&b.stock)),
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

pub async fn create_product(
    Extension(state): Extension<Arc<AppState>>,
    Json(draft): Json<ProductDraft>,
) -> Response {
    match state.catalog.create_product(draft) {
        Ok(product) => dto::data(StatusCode::CREATED, product),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn get_product(
    Extension(state): Extension<Arc<AppState>>,
    Path(id): Path<String>,
) -> Response {
    let id: ProductId = match errors::parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match state.products.get(id) {
        Some(product) => dto::data(StatusCode::OK, product),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

pub async fn update_product(
    Extension(state): Extension<Arc<AppState>>,
    Path(id): Path<String>,
    Json(draft): Json<ProductDraft>,
) -> Response {
    let id: ProductId = match errors::parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match state.catalog.update_product(id, draft) {
        Ok(product) => dto::data(StatusCode::OK, product),
        Err(e) => errors::domain_error_to_response(e),
    }
}

/// Delete refuses while any order line still references the product.
pub async fn delete_product(
    Extension(state): Extension<Arc<AppState>>,
    Path(id): Path<String>,
) -> Response {
    let id: ProductId = match errors::parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    if state.products.get(id).is_none() {
        return StatusCode::NOT_FOUND.into_response();
    }

    let referenced = state
        .orders
        .list_all()
        .iter()
        .any(|o| o.lines.iter().any(|l| l.product_id == id));
    if referenced {
        return errors::domain_error_to_response(orderflow_core::DomainError::conflict(format!(
            "product {id} is referenced by existing orders"
        )));
    }

    state.products.delete(id);
    StatusCode::NO_CONTENT.into_response()
}

#[derive(Debug, Deserialize)]
pub struct MovementsQuery {
    limit: Option<usize>,
}

pub async fn recent_movements(
    Extension(state): Extension<Arc<AppState>>,
    Path(id): Path<String>,
    Query(q): Query<MovementsQuery>,
) -> Response {
    let id: ProductId = match errors::parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    if state.products.get(id).is_none() {
        return StatusCode::NOT_FOUND.into_response();
    }
    let movements = state.ledger.recent_movements(id, q.limit.unwrap_or(10));
    dto::data(StatusCode::OK, movements)
}
