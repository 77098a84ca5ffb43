use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use orderflow_core::id::{MovementId, ProductId};
use orderflow_core::Entity;

/// Movement kind.
///
/// The set is closed: anything else is rejected at the deserialization
/// boundary before it reaches the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MovementKind {
    /// Stock increase by `quantity`.
    In,
    /// Stock decrease by `quantity`.
    Out,
    /// Absolute overwrite: `quantity` is the new stock value, not a delta.
    Correction,
}

impl core::fmt::Display for MovementKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let s = match self {
            MovementKind::In => "IN",
            MovementKind::Out => "OUT",
            MovementKind::Correction => "CORRECTION",
        };
        f.write_str(s)
    }
}

/// Append-only ledger entry. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockMovement {
    pub id: MovementId,
    pub product_id: ProductId,
    pub kind: MovementKind,
    pub quantity: i64,
    pub date: NaiveDate,
    pub remark: Option<String>,
}

impl Entity for StockMovement {
    type Id = MovementId;

    fn id(&self) -> MovementId {
        self.id
    }
}
