use serde::{Deserialize, Serialize};

use orderflow_core::id::{CustomerId, SupplierId};
use orderflow_core::Entity;

/// A buying party. Flat reference data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub id: CustomerId,
    pub company_name: String,
    pub vat_number: Option<String>,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub billing_address: String,
}

impl Entity for Customer {
    type Id = CustomerId;

    fn id(&self) -> CustomerId {
        self.id
    }
}

/// A supplying party. Flat reference data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Supplier {
    pub id: SupplierId,
    pub name: String,
    pub vat_number: String,
    pub email: String,
    pub phone: String,
    pub address: String,
}

impl Entity for Supplier {
    type Id = SupplierId;

    fn id(&self) -> SupplierId {
        self.id
    }
}
