//! HTTP API application wiring (Axum router + engine wiring).
//!
//! This folder is structured like:
//! - `routes/`: HTTP routes + handlers (one file per domain area)
//! - `dto.rs`: request/response DTOs and the JSON envelope
//! - `errors.rs`: consistent error responses
//! - `pagination.rs`: page/size/sort query handling
//! - `seed.rs`: reference data loaded at startup and on admin reset

use std::sync::Arc;

use axum::{routing::get, routing::post, Extension, Router};
use tower::ServiceBuilder;

use orderflow_inventory::{StockLedger, StockMovement};
use orderflow_invoicing::{Invoice, InvoiceEngine};
use orderflow_orders::{Order, OrderEngine};
use orderflow_parties::{Customer, Supplier};
use orderflow_products::{Catalog, Product};
use orderflow_store::InMemoryStore;

pub mod dto;
pub mod errors;
pub mod pagination;
pub mod routes;
pub mod seed;

pub type CustomerStore = InMemoryStore<Customer>;
pub type SupplierStore = InMemoryStore<Supplier>;
pub type ProductStore = InMemoryStore<Product>;
pub type MovementStore = InMemoryStore<StockMovement>;
pub type OrderStore = InMemoryStore<Order>;
pub type InvoiceStore = InMemoryStore<Invoice>;

/// Shared stores and engines behind one `Arc`, injected as an extension.
pub struct AppState {
    pub customers: Arc<CustomerStore>,
    pub suppliers: Arc<SupplierStore>,
    pub products: Arc<ProductStore>,
    pub movements: Arc<MovementStore>,
    pub orders: Arc<OrderStore>,
    pub invoices: Arc<InvoiceStore>,
    pub catalog: Catalog<ProductStore, SupplierStore>,
    pub ledger: StockLedger<ProductStore, MovementStore>,
    pub order_engine: OrderEngine<CustomerStore, ProductStore, OrderStore, MovementStore>,
    pub invoice_engine: InvoiceEngine<OrderStore, InvoiceStore>,
    pub mcp: routes::mcp::McpSessions,
}

impl AppState {
    pub fn new() -> Self {
        let customers = CustomerStore::shared();
        let suppliers = SupplierStore::shared();
        let products = ProductStore::shared();
        let movements = MovementStore::shared();
        let orders = OrderStore::shared();
        let invoices = InvoiceStore::shared();

        Self {
            catalog: Catalog::new(products.clone(), suppliers.clone()),
            ledger: StockLedger::new(products.clone(), movements.clone()),
            order_engine: OrderEngine::new(
                customers.clone(),
                products.clone(),
                orders.clone(),
                movements.clone(),
            ),
            invoice_engine: InvoiceEngine::new(orders.clone(), invoices.clone()),
            mcp: routes::mcp::McpSessions::default(),
            customers,
            suppliers,
            products,
            movements,
            orders,
            invoices,
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

/// Build the full HTTP router (public entrypoint used by `main.rs`).
///
/// Seeds the stores with reference data before serving.
pub fn build_app() -> Router {
    let state = Arc::new(AppState::new());
    seed::seed_all(&state);

    Router::new()
        .route("/health", get(routes::system::health))
        .route("/version", get(routes::system::version))
        .route("/_admin/reset", post(routes::admin::reset))
        .nest("/api/v1", routes::router())
        .nest("/mcp", routes::mcp::router())
        .layer(ServiceBuilder::new().layer(Extension(state)))
}
