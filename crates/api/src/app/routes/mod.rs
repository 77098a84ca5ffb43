use axum::Router;

pub mod admin;
pub mod customers;
pub mod invoices;
pub mod mcp;
pub mod orders;
pub mod products;
pub mod stock_movements;
pub mod suppliers;
pub mod system;

/// Router for the versioned business API.
pub fn router() -> Router {
    Router::new()
        .nest("/products", products::router())
        .nest("/customers", customers::router())
        .nest("/suppliers", suppliers::router())
        .nest("/orders", orders::router())
        .nest("/stock-movements", stock_movements::router())
        .nest("/invoices", invoices::router())
}
