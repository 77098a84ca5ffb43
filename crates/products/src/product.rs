use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use orderflow_core::id::{ProductId, SupplierId};
use orderflow_core::Entity;

/// A catalog product.
///
/// `stock` is derived state: it always equals the replay of all accepted
/// stock movements for this product (see `orderflow-inventory`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub sku: String,
    pub name: String,
    pub description: String,
    pub category: String,
    pub purchase_price: Decimal,
    pub sale_price: Decimal,
    pub stock: i64,
    pub supplier_id: SupplierId,
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> ProductId {
        self.id
    }
}

/// Incoming product fields for create/update, before an id is assigned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductDraft {
    pub sku: String,
    pub name: String,
    pub description: String,
    pub category: String,
    pub purchase_price: Decimal,
    pub sale_price: Decimal,
    pub stock: i64,
    pub supplier_id: SupplierId,
}

impl ProductDraft {
    pub fn into_product(self, id: ProductId) -> Product {
        Product {
            id,
            sku: self.sku,
            name: self.name,
            description: self.description,
            category: self.category,
            purchase_price: self.purchase_price,
            sale_price: self.sale_price,
            stock: self.stock,
            supplier_id: self.supplier_id,
        }
    }
}
