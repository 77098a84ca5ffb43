//! Stock ledger: translates movement requests into a new stock quantity and
//! a durable ledger entry, atomically per product.

use std::sync::Arc;

use chrono::NaiveDate;

use orderflow_core::id::ProductId;
use orderflow_core::{DomainError, DomainResult};
use orderflow_products::Product;
use orderflow_store::EntityStore;

use crate::movement::{MovementKind, StockMovement};

pub struct StockLedger<P, M> {
    products: Arc<P>,
    movements: Arc<M>,
}

impl<P, M> StockLedger<P, M>
where
    P: EntityStore<Product>,
    M: EntityStore<StockMovement>,
{
    pub fn new(products: Arc<P>, movements: Arc<M>) -> Self {
        Self {
            products,
            movements,
        }
    }

    /// Apply a movement and update the product's stock field.
    ///
    /// Runs under the product store's write lock: the read-compute-append-
    /// write sequence is atomic relative to other movements on the same
    /// product, and a reader never observes the movement without the stock
    /// update. On failure neither the stock nor the ledger changes.
    pub fn apply_movement(
        &self,
        product_id: ProductId,
        kind: MovementKind,
        quantity: i64,
        date: NaiveDate,
        remark: Option<String>,
    ) -> DomainResult<StockMovement> {
        if quantity <= 0 {
            return Err(DomainError::invalid_argument(format!(
                "movement quantity must be positive, got {quantity}"
            )));
        }

        self.products
            .update(product_id, |product| {
                let current = product.stock;
                let new_stock = match kind {
                    MovementKind::In => current + quantity,
                    MovementKind::Out => {
                        let remaining = current - quantity;
                        if remaining < 0 {
                            return Err(DomainError::insufficient_stock(product_id, current));
                        }
                        remaining
                    }
                    MovementKind::Correction => quantity,
                };

                let movement = self.movements.create(|id| StockMovement {
                    id,
                    product_id,
                    kind,
                    quantity,
                    date,
                    remark,
                });
                product.stock = new_stock;
                Ok(movement)
            })
            .ok_or_else(|| DomainError::not_found("product", product_id))?
    }

    /// The N most recent movements for a product, date descending; ties go to
    /// the later-created movement (ids are monotonic, so id order is
    /// insertion order).
    pub fn recent_movements(&self, product_id: ProductId, limit: usize) -> Vec<StockMovement> {
        let mut movements: Vec<StockMovement> = self
            .movements
            .list_all()
            .into_iter()
            .filter(|m| m.product_id == product_id)
            .collect();
        movements.sort_by(|a, b| b.date.cmp(&a.date).then(b.id.cmp(&a.id)));
        movements.truncate(limit);
        movements
    }

    /// Replay all accepted movements for a product in creation order.
    ///
    /// The result always equals the product's stored stock field; the ledger
    /// is the source of truth, the field is the cache.
    pub fn derived_stock(&self, product_id: ProductId) -> i64 {
        let mut movements: Vec<StockMovement> = self
            .movements
            .list_all()
            .into_iter()
            .filter(|m| m.product_id == product_id)
            .collect();
        movements.sort_by_key(|m| m.id);

        movements.into_iter().fold(0, |stock, m| match m.kind {
            MovementKind::In => stock + m.quantity,
            MovementKind::Out => stock - m.quantity,
            MovementKind::Correction => m.quantity,
        })
    }
}
