//! Catalog engine: product creation and edits.

use std::sync::Arc;

use rust_decimal::Decimal;

use orderflow_core::id::ProductId;
use orderflow_core::{DomainError, DomainResult};
use orderflow_parties::Supplier;
use orderflow_store::EntityStore;

use crate::product::{Product, ProductDraft};

/// Owns product writes: SKU uniqueness, supplier existence, field validation.
pub struct Catalog<P, S> {
    products: Arc<P>,
    suppliers: Arc<S>,
}

impl<P, S> Catalog<P, S>
where
    P: EntityStore<Product>,
    S: EntityStore<Supplier>,
{
    pub fn new(products: Arc<P>, suppliers: Arc<S>) -> Self {
        Self {
            products,
            suppliers,
        }
    }

    pub fn create_product(&self, draft: ProductDraft) -> DomainResult<Product> {
        self.validate(&draft)?;
        self.ensure_sku_free(&draft.sku, None)?;
        Ok(self.products.create(|id| draft.into_product(id)))
    }

    pub fn update_product(&self, id: ProductId, draft: ProductDraft) -> DomainResult<Product> {
        if self.products.get(id).is_none() {
            return Err(DomainError::not_found("product", id));
        }
        self.validate(&draft)?;
        self.ensure_sku_free(&draft.sku, Some(id))?;
        let product = draft.into_product(id);
        self.products.put(product.clone());
        Ok(product)
    }

    fn validate(&self, draft: &ProductDraft) -> DomainResult<()> {
        if draft.sku.trim().is_empty() {
            return Err(DomainError::invalid_argument("sku cannot be empty"));
        }
        if draft.name.trim().is_empty() {
            return Err(DomainError::invalid_argument("name cannot be empty"));
        }
        if draft.purchase_price <= Decimal::ZERO || draft.sale_price <= Decimal::ZERO {
            return Err(DomainError::invalid_argument("prices must be positive"));
        }
        if draft.stock < 0 {
            return Err(DomainError::invalid_argument("stock cannot be negative"));
        }
        if self.suppliers.get(draft.supplier_id).is_none() {
            return Err(DomainError::not_found("supplier", draft.supplier_id));
        }
        Ok(())
    }

    /// SKU uniqueness is a store-wide invariant; `except` excludes the
    /// product being updated from the check.
    fn ensure_sku_free(&self, sku: &str, except: Option<ProductId>) -> DomainResult<()> {
        let taken = self
            .products
            .list_all()
            .into_iter()
            .any(|p| p.sku == sku && Some(p.id) != except);
        if taken {
            return Err(DomainError::conflict(format!("SKU '{sku}' already exists")));
        }
        Ok(())
    }
}
