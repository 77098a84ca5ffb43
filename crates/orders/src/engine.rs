//! Order engine: creation, status transitions, delivery stock deduction,
//! and price recalculation.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use rust_decimal::Decimal;

use orderflow_core::id::{CustomerId, OrderId, ProductId};
use orderflow_core::money::{line_total, OrderTotals};
use orderflow_core::{DomainError, DomainResult};
use orderflow_inventory::{MovementKind, StockLedger, StockMovement};
use orderflow_parties::Customer;
use orderflow_products::Product;
use orderflow_store::EntityStore;

use crate::order::{Order, OrderLine, OrderStatus};

/// Incoming order line: the unit price is taken as quoted at order time;
/// `recalculate` can refresh it from the catalog later.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewOrderLine {
    pub product_id: ProductId,
    pub quantity: i64,
    pub unit_price: Decimal,
}

/// Result of a status update.
///
/// Delivery deducts stock per line on a best-effort basis: the status change
/// is committed first, and any per-line deduction failures are collected
/// here rather than rolled back. An empty `stock_failures` means every line
/// was deducted (or no deduction was due).
#[derive(Debug)]
pub struct StatusUpdateOutcome {
    pub order: Order,
    pub stock_failures: Vec<DomainError>,
}

pub struct OrderEngine<C, P, O, M> {
    customers: Arc<C>,
    products: Arc<P>,
    orders: Arc<O>,
    ledger: StockLedger<P, M>,
}

impl<C, P, O, M> OrderEngine<C, P, O, M>
where
    C: EntityStore<Customer>,
    P: EntityStore<Product>,
    O: EntityStore<Order>,
    M: EntityStore<StockMovement>,
{
    pub fn new(customers: Arc<C>, products: Arc<P>, orders: Arc<O>, movements: Arc<M>) -> Self {
        let ledger = StockLedger::new(products.clone(), movements);
        Self {
            customers,
            products,
            orders,
            ledger,
        }
    }

    pub fn create_order(
        &self,
        customer_id: CustomerId,
        order_date: NaiveDate,
        lines: Vec<NewOrderLine>,
    ) -> DomainResult<Order> {
        if self.customers.get(customer_id).is_none() {
            return Err(DomainError::not_found("customer", customer_id));
        }

        for line in &lines {
            if line.quantity <= 0 {
                return Err(DomainError::invalid_argument(format!(
                    "quantity must be positive for product {}",
                    line.product_id
                )));
            }
            if self.products.get(line.product_id).is_none() {
                return Err(DomainError::not_found("product", line.product_id));
            }
        }

        let lines: Vec<OrderLine> = lines
            .into_iter()
            .map(|l| OrderLine {
                product_id: l.product_id,
                quantity: l.quantity,
                unit_price: l.unit_price,
                line_total: line_total(l.unit_price, l.quantity),
            })
            .collect();
        let totals = OrderTotals::from_line_totals(lines.iter().map(|l| l.line_total));

        Ok(self.orders.create(|id| Order {
            id,
            customer_id,
            order_date,
            status: OrderStatus::New,
            lines,
            totals,
        }))
    }

    /// Validate and commit a status transition.
    ///
    /// Sequencing is order-first, stock-best-effort: the new status is
    /// persisted before any stock work, and stays committed even when a
    /// deduction later fails. Deductions that fail mid-loop do not undo the
    /// movements already applied for earlier lines. Both behaviors are
    /// deliberate and covered by tests; callers see the failures in the
    /// returned outcome.
    ///
    /// The check and the write happen inside the store's per-key update, so
    /// two racing deliveries resolve to one transition plus one self-noop
    /// and stock is deducted once.
    pub fn update_status(
        &self,
        order_id: OrderId,
        new_status: OrderStatus,
    ) -> DomainResult<StatusUpdateOutcome> {
        let (updated, deduct) = self
            .orders
            .update(order_id, |o| {
                let current = o.status;
                if !current.can_transition_to(new_status) {
                    return Err(DomainError::invalid_transition(current, new_status));
                }
                // A DELIVERED -> DELIVERED no-op must not deduct twice.
                let deduct =
                    new_status == OrderStatus::Delivered && current != OrderStatus::Delivered;
                o.status = new_status;
                Ok((o.clone(), deduct))
            })
            .ok_or_else(|| DomainError::not_found("order", order_id))??;

        let mut stock_failures = Vec::new();
        if deduct {
            let today = Utc::now().date_naive();
            for line in &updated.lines {
                let result = self.ledger.apply_movement(
                    line.product_id,
                    MovementKind::Out,
                    line.quantity,
                    today,
                    Some(format!("Order {order_id} delivered")),
                );
                if let Err(err) = result {
                    tracing::warn!(
                        order_id = %order_id,
                        product_id = %line.product_id,
                        error = %err,
                        "stock deduction failed while delivering order"
                    );
                    stock_failures.push(err);
                }
            }
        }

        Ok(StatusUpdateOutcome {
            order: updated,
            stock_failures,
        })
    }

    /// Refresh each line's unit price from the catalog's current sale price
    /// and re-derive the totals. Lines whose product no longer exists keep
    /// their stale price.
    pub fn recalculate(&self, order_id: OrderId) -> DomainResult<Order> {
        self.orders
            .update(order_id, |order| {
                for line in &mut order.lines {
                    if let Some(product) = self.products.get(line.product_id) {
                        line.unit_price = product.sale_price;
                        line.line_total = line_total(line.unit_price, line.quantity);
                    }
                }
                order.totals = OrderTotals::from_line_totals(order.lines.iter().map(|l| l.line_total));
                order.clone()
            })
            .ok_or_else(|| DomainError::not_found("order", order_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use orderflow_core::id::{CustomerId, EntityId, ProductId, SupplierId};
    use orderflow_store::InMemoryStore;
    use rust_decimal::Decimal;

    type Engine = OrderEngine<
        InMemoryStore<Customer>,
        InMemoryStore<Product>,
        InMemoryStore<Order>,
        InMemoryStore<StockMovement>,
    >;

    struct Fixture {
        engine: Engine,
        products: Arc<InMemoryStore<Product>>,
        movements: Arc<InMemoryStore<StockMovement>>,
        customer_id: CustomerId,
    }

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn fixture() -> Fixture {
        let customers = InMemoryStore::shared();
        let products = InMemoryStore::shared();
        let orders = InMemoryStore::shared();
        let movements = InMemoryStore::shared();

        let customer = customers.create(|id| Customer {
            id,
            company_name: "Metaalwerken BV".to_string(),
            vat_number: Some("NL123456789B01".to_string()),
            email: "info@metaalwerken.test".to_string(),
            phone: "020-1234567".to_string(),
            address: "Industrieweg 123, Amsterdam".to_string(),
            billing_address: "Industrieweg 123, Amsterdam".to_string(),
        });

        Fixture {
            engine: OrderEngine::new(customers, products.clone(), orders, movements.clone()),
            products,
            movements,
            customer_id: customer.id,
        }
    }

    fn add_product(fx: &Fixture, sku: &str, sale_price: &str, stock: i64) -> ProductId {
        fx.products
            .create(|id| Product {
                id,
                sku: sku.to_string(),
                name: format!("Product {sku}"),
                description: String::new(),
                category: "Machines".to_string(),
                purchase_price: dec("1.00"),
                sale_price: dec(sale_price),
                stock,
                supplier_id: SupplierId::from_seq(1001),
            })
            .id
    }

    fn line(product_id: ProductId, quantity: i64, unit_price: &str) -> NewOrderLine {
        NewOrderLine {
            product_id,
            quantity,
            unit_price: dec(unit_price),
        }
    }

    #[test]
    fn create_order_computes_flat_vat_totals() {
        let fx = fixture();
        let a = add_product(&fx, "MACH-001", "35000.00", 2);
        let b = add_product(&fx, "OND-001", "25.00", 50);

        let order = fx
            .engine
            .create_order(
                fx.customer_id,
                date("2024-03-01"),
                vec![line(a, 1, "35000.00"), line(b, 10, "25.00")],
            )
            .unwrap();

        assert_eq!(order.status, OrderStatus::New);
        assert_eq!(order.totals.ex_vat, dec("35250.00"));
        assert_eq!(order.totals.vat_amount, dec("7402.50"));
        assert_eq!(order.totals.inc_vat, dec("42652.50"));
    }

    #[test]
    fn totals_stay_rederivable_from_lines() {
        let fx = fixture();
        let a = add_product(&fx, "MACH-001", "35000.00", 2);
        let order = fx
            .engine
            .create_order(fx.customer_id, date("2024-03-01"), vec![line(a, 3, "100.10")])
            .unwrap();
        let rederived = OrderTotals::from_line_totals(order.lines.iter().map(|l| l.line_total));
        assert_eq!(order.totals, rederived);
    }

    #[test]
    fn create_order_rejects_non_positive_quantity() {
        let fx = fixture();
        let a = add_product(&fx, "MACH-001", "35000.00", 2);
        let err = fx
            .engine
            .create_order(fx.customer_id, date("2024-03-01"), vec![line(a, 0, "1.00")])
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidArgument(_)));
    }

    #[test]
    fn create_order_names_the_missing_product() {
        let fx = fixture();
        let missing = ProductId::from_seq(4242);
        let err = fx
            .engine
            .create_order(
                fx.customer_id,
                date("2024-03-01"),
                vec![line(missing, 1, "1.00")],
            )
            .unwrap_err();
        assert_eq!(err, DomainError::not_found("product", missing));
    }

    #[test]
    fn create_order_requires_an_existing_customer() {
        let fx = fixture();
        let err = fx
            .engine
            .create_order(CustomerId::from_seq(4242), date("2024-03-01"), vec![])
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound { entity: "customer", .. }));
    }

    #[test]
    fn illegal_transitions_are_rejected_with_the_pair() {
        let fx = fixture();
        let a = add_product(&fx, "MACH-001", "35000.00", 2);
        let order = fx
            .engine
            .create_order(fx.customer_id, date("2024-03-01"), vec![line(a, 1, "1.00")])
            .unwrap();

        let err = fx
            .engine
            .update_status(order.id, OrderStatus::Delivered)
            .unwrap_err();
        assert_eq!(
            err,
            DomainError::invalid_transition(OrderStatus::New, OrderStatus::Delivered)
        );
    }

    #[test]
    fn self_transition_is_a_noop() {
        let fx = fixture();
        let a = add_product(&fx, "MACH-001", "35000.00", 2);
        let order = fx
            .engine
            .create_order(fx.customer_id, date("2024-03-01"), vec![line(a, 1, "1.00")])
            .unwrap();
        let outcome = fx.engine.update_status(order.id, OrderStatus::New).unwrap();
        assert_eq!(outcome.order.status, OrderStatus::New);
        assert!(outcome.stock_failures.is_empty());
    }

    #[test]
    fn delivery_deducts_stock_and_records_one_movement_per_line() {
        let fx = fixture();
        let a = add_product(&fx, "MACH-001", "35000.00", 2);
        let b = add_product(&fx, "OND-001", "25.00", 50);
        let order = fx
            .engine
            .create_order(
                fx.customer_id,
                date("2024-03-01"),
                vec![line(a, 1, "35000.00"), line(b, 10, "25.00")],
            )
            .unwrap();

        fx.engine
            .update_status(order.id, OrderStatus::Processing)
            .unwrap();
        let outcome = fx
            .engine
            .update_status(order.id, OrderStatus::Delivered)
            .unwrap();

        assert!(outcome.stock_failures.is_empty());
        assert_eq!(fx.products.get(a).unwrap().stock, 1);
        assert_eq!(fx.products.get(b).unwrap().stock, 40);

        let movements = fx.movements.list_all();
        assert_eq!(movements.len(), 2);
        assert!(movements.iter().all(|m| {
            m.kind == MovementKind::Out
                && m.remark.as_deref() == Some(&format!("Order {} delivered", order.id))
        }));
    }

    #[test]
    fn repeated_delivery_does_not_deduct_again() {
        let fx = fixture();
        let a = add_product(&fx, "MACH-001", "35000.00", 2);
        let order = fx
            .engine
            .create_order(fx.customer_id, date("2024-03-01"), vec![line(a, 1, "1.00")])
            .unwrap();

        fx.engine
            .update_status(order.id, OrderStatus::Processing)
            .unwrap();
        fx.engine
            .update_status(order.id, OrderStatus::Delivered)
            .unwrap();
        let again = fx
            .engine
            .update_status(order.id, OrderStatus::Delivered)
            .unwrap();

        assert!(again.stock_failures.is_empty());
        assert_eq!(fx.products.get(a).unwrap().stock, 1);
        assert_eq!(fx.movements.list_all().len(), 1);
    }

    #[test]
    fn racing_deliveries_deduct_stock_once() {
        let fx = fixture();
        let a = add_product(&fx, "MACH-001", "35000.00", 5);
        let order = fx
            .engine
            .create_order(fx.customer_id, date("2024-03-01"), vec![line(a, 1, "1.00")])
            .unwrap();
        fx.engine
            .update_status(order.id, OrderStatus::Processing)
            .unwrap();

        // One thread wins the transition; the other sees DELIVERED and
        // lands on the self-noop path.
        let engine = Arc::new(fx.engine);
        let mut handles = Vec::new();
        for _ in 0..2 {
            let engine = engine.clone();
            let order_id = order.id;
            handles.push(std::thread::spawn(move || {
                engine
                    .update_status(order_id, OrderStatus::Delivered)
                    .unwrap()
            }));
        }
        for h in handles {
            let outcome = h.join().unwrap();
            assert_eq!(outcome.order.status, OrderStatus::Delivered);
            assert!(outcome.stock_failures.is_empty());
        }

        assert_eq!(fx.products.get(a).unwrap().stock, 4);
        assert_eq!(fx.movements.list_all().len(), 1);
    }

    #[test]
    fn status_commits_even_when_a_deduction_fails_mid_loop() {
        let fx = fixture();
        let plenty = add_product(&fx, "OND-001", "25.00", 100);
        let scarce = add_product(&fx, "MACH-001", "35000.00", 1);
        let order = fx
            .engine
            .create_order(
                fx.customer_id,
                date("2024-03-01"),
                vec![line(plenty, 10, "25.00"), line(scarce, 5, "35000.00")],
            )
            .unwrap();

        fx.engine
            .update_status(order.id, OrderStatus::Processing)
            .unwrap();
        let outcome = fx
            .engine
            .update_status(order.id, OrderStatus::Delivered)
            .unwrap();

        // The status change is committed and the first line's deduction
        // stands; the failed line is reported, not rolled back.
        assert_eq!(outcome.order.status, OrderStatus::Delivered);
        assert_eq!(outcome.stock_failures.len(), 1);
        assert_eq!(
            outcome.stock_failures[0],
            DomainError::insufficient_stock(scarce, 1)
        );
        assert_eq!(fx.products.get(plenty).unwrap().stock, 90);
        assert_eq!(fx.products.get(scarce).unwrap().stock, 1);
        assert_eq!(fx.movements.list_all().len(), 1);
    }

    #[test]
    fn recalculate_refreshes_prices_and_totals() {
        let fx = fixture();
        let a = add_product(&fx, "MACH-001", "40000.00", 2);
        let order = fx
            .engine
            .create_order(fx.customer_id, date("2024-03-01"), vec![line(a, 1, "35000.00")])
            .unwrap();
        assert_eq!(order.totals.ex_vat, dec("35000.00"));

        let recalculated = fx.engine.recalculate(order.id).unwrap();
        assert_eq!(recalculated.lines[0].unit_price, dec("40000.00"));
        assert_eq!(recalculated.totals.ex_vat, dec("40000.00"));
        assert_eq!(recalculated.totals.vat_amount, dec("8400.00"));
        assert_eq!(recalculated.totals.inc_vat, dec("48400.00"));
    }

    #[test]
    fn recalculate_skips_lines_whose_product_is_gone() {
        let fx = fixture();
        let kept = add_product(&fx, "MACH-001", "40000.00", 2);
        let removed = add_product(&fx, "OND-001", "30.00", 10);
        let order = fx
            .engine
            .create_order(
                fx.customer_id,
                date("2024-03-01"),
                vec![line(kept, 1, "35000.00"), line(removed, 2, "25.00")],
            )
            .unwrap();

        fx.products.delete(removed);
        let recalculated = fx.engine.recalculate(order.id).unwrap();

        assert_eq!(recalculated.lines[0].unit_price, dec("40000.00"));
        // Stale price preserved for the vanished product.
        assert_eq!(recalculated.lines[1].unit_price, dec("25.00"));
        assert_eq!(recalculated.totals.ex_vat, dec("40050.00"));
    }

    #[test]
    fn update_status_of_missing_order_is_not_found() {
        let fx = fixture();
        let err = fx
            .engine
            .update_status(OrderId::from_seq(9999), OrderStatus::Processing)
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound { entity: "order", .. }));
    }
}
