use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use orderflow_core::id::{CustomerId, OrderId, ProductId};
use orderflow_core::money::OrderTotals;
use orderflow_core::Entity;

/// Order status lifecycle.
///
/// NEW → PROCESSING → DELIVERED, with CANCELLED reachable from NEW and
/// PROCESSING. DELIVERED and CANCELLED are terminal. The set is closed so
/// the transition table below stays exhaustively checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderStatus {
    New,
    Processing,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    /// Transition table. Self-transitions are always permitted as no-ops.
    pub fn can_transition_to(self, to: OrderStatus) -> bool {
        use OrderStatus::*;
        self == to
            || matches!(
                (self, to),
                (New, Processing)
                    | (New, Cancelled)
                    | (Processing, Delivered)
                    | (Processing, Cancelled)
            )
    }
}

impl core::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let s = match self {
            OrderStatus::New => "NEW",
            OrderStatus::Processing => "PROCESSING",
            OrderStatus::Delivered => "DELIVERED",
            OrderStatus::Cancelled => "CANCELLED",
        };
        f.write_str(s)
    }
}

/// Order line: non-owning product reference plus the priced quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    pub product_id: ProductId,
    pub quantity: i64,
    pub unit_price: Decimal,
    /// Cached `quantity × unit_price`; kept in sync by the engine.
    pub line_total: Decimal,
}

/// A customer order with cached totals.
///
/// `totals` is derived state: it must always equal
/// `OrderTotals::from_line_totals` over the lines, and the engine re-derives
/// it after every mutation that touches them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub customer_id: CustomerId,
    pub order_date: NaiveDate,
    pub status: OrderStatus,
    pub lines: Vec<OrderLine>,
    #[serde(flatten)]
    pub totals: OrderTotals,
}

impl Entity for Order {
    type Id = OrderId;

    fn id(&self) -> OrderId {
        self.id
    }
}
