//! Invoice engine: creation from an order and the OPEN-only status moves.

use std::sync::Arc;

use chrono::{Duration, NaiveDate};

use orderflow_core::id::{InvoiceId, OrderId};
use orderflow_core::{DomainError, DomainResult};
use orderflow_orders::Order;
use orderflow_store::EntityStore;

use crate::invoice::{Invoice, InvoiceStatus, PAYMENT_TERM_DAYS};

pub struct InvoiceEngine<O, I> {
    orders: Arc<O>,
    invoices: Arc<I>,
}

impl<O, I> InvoiceEngine<O, I>
where
    O: EntityStore<Order>,
    I: EntityStore<Invoice>,
{
    pub fn new(orders: Arc<O>, invoices: Arc<I>) -> Self {
        Self { orders, invoices }
    }

    /// Create the invoice for an order.
    ///
    /// At most one invoice may exist per order; a second attempt is a
    /// conflict regardless of the first invoice's status. The due date is
    /// always `invoice_date + 30 days` and the total is snapshotted from the
    /// order.
    pub fn create_invoice(
        &self,
        order_id: OrderId,
        invoice_date: NaiveDate,
    ) -> DomainResult<Invoice> {
        let order = self
            .orders
            .get(order_id)
            .ok_or_else(|| DomainError::not_found("order", order_id))?;

        if self
            .invoices
            .list_all()
            .iter()
            .any(|inv| inv.order_id == order_id)
        {
            return Err(DomainError::conflict(format!(
                "order {order_id} already has an invoice"
            )));
        }

        Ok(self.invoices.create(|id| Invoice {
            id,
            order_id,
            invoice_date,
            due_date: invoice_date + Duration::days(PAYMENT_TERM_DAYS),
            status: InvoiceStatus::Open,
            inc_vat_total: order.totals.inc_vat,
        }))
    }

    pub fn update_status(
        &self,
        invoice_id: InvoiceId,
        new_status: InvoiceStatus,
    ) -> DomainResult<Invoice> {
        let invoice = self
            .invoices
            .get(invoice_id)
            .ok_or_else(|| DomainError::not_found("invoice", invoice_id))?;

        if !invoice.status.can_transition_to(new_status) {
            return Err(DomainError::invalid_transition(invoice.status, new_status));
        }

        self.invoices
            .update(invoice_id, |inv| {
                inv.status = new_status;
                inv.clone()
            })
            .ok_or_else(|| DomainError::not_found("invoice", invoice_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use orderflow_core::id::{CustomerId, EntityId};
    use orderflow_core::money::OrderTotals;
    use orderflow_orders::OrderStatus;
    use orderflow_store::InMemoryStore;
    use rust_decimal::Decimal;

    type Engine = InvoiceEngine<InMemoryStore<Order>, InMemoryStore<Invoice>>;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn engine_with_order(inc_vat: &str) -> (Engine, OrderId) {
        let orders = InMemoryStore::shared();
        let invoices = InMemoryStore::shared();
        let order = orders.create(|id| Order {
            id,
            customer_id: CustomerId::from_seq(1001),
            order_date: date("2024-03-01"),
            status: OrderStatus::Delivered,
            lines: vec![],
            totals: OrderTotals {
                ex_vat: Decimal::ZERO,
                vat_amount: Decimal::ZERO,
                inc_vat: inc_vat.parse().unwrap(),
            },
        });
        (InvoiceEngine::new(orders, invoices), order.id)
    }

    #[test]
    fn invoice_snapshots_total_and_adds_thirty_days() {
        let (engine, order_id) = engine_with_order("42652.50");
        let invoice = engine
            .create_invoice(order_id, date("2024-03-10"))
            .unwrap();

        assert_eq!(invoice.order_id, order_id);
        assert_eq!(invoice.status, InvoiceStatus::Open);
        assert_eq!(invoice.invoice_date, date("2024-03-10"));
        assert_eq!(invoice.due_date, date("2024-04-09"));
        assert_eq!(invoice.inc_vat_total, dec("42652.50"));
    }

    #[test]
    fn second_invoice_for_the_same_order_is_a_conflict() {
        let (engine, order_id) = engine_with_order("100.00");
        engine.create_invoice(order_id, date("2024-03-10")).unwrap();
        let err = engine
            .create_invoice(order_id, date("2024-03-11"))
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[test]
    fn conflict_applies_even_after_the_invoice_is_paid() {
        let (engine, order_id) = engine_with_order("100.00");
        let invoice = engine.create_invoice(order_id, date("2024-03-10")).unwrap();
        engine
            .update_status(invoice.id, InvoiceStatus::Paid)
            .unwrap();
        let err = engine
            .create_invoice(order_id, date("2024-03-11"))
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[test]
    fn unknown_order_is_not_found() {
        let (engine, _) = engine_with_order("100.00");
        let err = engine
            .create_invoice(OrderId::from_seq(9999), date("2024-03-10"))
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound { entity: "order", .. }));
    }

    #[test]
    fn open_moves_to_paid_or_late() {
        let (engine, order_id) = engine_with_order("100.00");
        let invoice = engine.create_invoice(order_id, date("2024-03-10")).unwrap();
        let paid = engine
            .update_status(invoice.id, InvoiceStatus::Paid)
            .unwrap();
        assert_eq!(paid.status, InvoiceStatus::Paid);
    }

    #[test]
    fn paid_is_terminal() {
        let (engine, order_id) = engine_with_order("100.00");
        let invoice = engine.create_invoice(order_id, date("2024-03-10")).unwrap();
        engine
            .update_status(invoice.id, InvoiceStatus::Paid)
            .unwrap();

        let err = engine
            .update_status(invoice.id, InvoiceStatus::Open)
            .unwrap_err();
        assert_eq!(
            err,
            DomainError::invalid_transition(InvoiceStatus::Paid, InvoiceStatus::Open)
        );
    }

    #[test]
    fn unknown_invoice_is_not_found() {
        let (engine, _) = engine_with_order("100.00");
        let err = engine
            .update_status(InvoiceId::from_seq(9999), InvoiceStatus::Paid)
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound { entity: "invoice", .. }));
    }
}
