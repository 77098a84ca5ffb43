use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use orderflow_core::id::{InvoiceId, OrderId};
use orderflow_core::Entity;

/// Payment term applied to every invoice.
pub const PAYMENT_TERM_DAYS: i64 = 30;

/// Invoice status lifecycle. OPEN is the only non-terminal state; both PAID
/// and LATE are final.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum InvoiceStatus {
    Open,
    Paid,
    Late,
}

impl InvoiceStatus {
    /// Self-transitions are permitted as no-ops.
    pub fn can_transition_to(self, to: InvoiceStatus) -> bool {
        use InvoiceStatus::*;
        self == to || matches!((self, to), (Open, Paid) | (Open, Late))
    }
}

impl core::fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let s = match self {
            InvoiceStatus::Open => "OPEN",
            InvoiceStatus::Paid => "PAID",
            InvoiceStatus::Late => "LATE",
        };
        f.write_str(s)
    }
}

/// An invoice for exactly one order.
///
/// `inc_vat_total` is a snapshot of the order's VAT-inclusive total at the
/// moment of invoicing; later order recalculations do not touch it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invoice {
    pub id: InvoiceId,
    pub order_id: OrderId,
    pub invoice_date: NaiveDate,
    pub due_date: NaiveDate,
    pub status: InvoiceStatus,
    pub inc_vat_total: Decimal,
}

impl Entity for Invoice {
    type Id = InvoiceId;

    fn id(&self) -> InvoiceId {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use InvoiceStatus::*;

    #[test]
    fn only_open_can_move() {
        let legal = [(Open, Paid), (Open, Late)];
        for from in [Open, Paid, Late] {
            for to in [Open, Paid, Late] {
                let expected = from == to || legal.contains(&(from, to));
                assert_eq!(from.can_transition_to(to), expected, "{from} -> {to}");
            }
        }
    }

    #[test]
    fn status_serializes_uppercase() {
        assert_eq!(serde_json::to_string(&Open).unwrap(), "\"OPEN\"");
        let s: InvoiceStatus = serde_json::from_str("\"LATE\"").unwrap();
        assert_eq!(s, Late);
    }
}
