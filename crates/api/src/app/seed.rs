//! Reference data: a small machine-trade catalog with Dutch businesses.
//!
//! Loaded at startup and on `POST /_admin/reset`. Clearing first makes the
//! seed idempotent; id counters restart at 1001, so the nth seeded entity
//! always gets the same id.

use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use orderflow_core::money::{line_total, OrderTotals};
use orderflow_inventory::{MovementKind, StockMovement};
use orderflow_invoicing::{Invoice, InvoiceStatus, PAYMENT_TERM_DAYS};
use orderflow_orders::{Order, OrderLine, OrderStatus};
use orderflow_parties::{Customer, Supplier};
use orderflow_products::Product;
use orderflow_store::EntityStore;

use crate::app::AppState;

pub fn seed_all(state: &AppState) {
    // Clear in reverse dependency order, then seed forward.
    state.invoices.clear();
    state.movements.clear();
    state.orders.clear();
    state.customers.clear();
    state.products.clear();
    state.suppliers.clear();

    let suppliers = seed_suppliers(state);
    let products = seed_products(state, &suppliers);
    let customers = seed_customers(state);
    let orders = seed_orders(state, &customers, &products);
    seed_movements(state, &products);
    seed_invoices(state, &orders);

    tracing::info!(
        suppliers = suppliers.len(),
        products = products.len(),
        customers = customers.len(),
        orders = orders.len(),
        "seeded reference data"
    );
}

fn seed_suppliers(state: &AppState) -> Vec<Supplier> {
    let rows: [(&str, &str, &str, &str, &str); 3] = [
        (
            "Machine Tools International",
            "NL111111111B01",
            "sales@machinetools.nl",
            "020-1111111",
            "Machineweg 1, 1000 AB Amsterdam",
        ),
        (
            "Precision Parts BV",
            "NL222222222B01",
            "info@precisionparts.nl",
            "010-2222222",
            "Precisieweg 2, 3000 AB Rotterdam",
        ),
        (
            "Industrial Supplies",
            "NL333333333B01",
            "contact@industrialsupplies.nl",
            "040-3333333",
            "Industrieweg 3, 5600 AB Eindhoven",
        ),
    ];

    rows.into_iter()
        .map(|(name, vat_number, email, phone, address)| {
            state.suppliers.create(|id| Supplier {
                id,
                name: name.to_string(),
                vat_number: vat_number.to_string(),
                email: email.to_string(),
                phone: phone.to_string(),
                address: address.to_string(),
            })
        })
        .collect()
}

fn seed_products(state: &AppState, suppliers: &[Supplier]) -> Vec<Product> {
    let rows: [(&str, &str, &str, &str, Decimal, Decimal, i64, usize); 8] = [
        (
            "MACH-001",
            "Draaibank",
            "Precisie draaibank voor metaalbewerking",
            "Machines",
            dec!(25000.00),
            dec!(35000.00),
            2,
            0,
        ),
        (
            "MACH-002",
            "Freesmachine",
            "CNC freesmachine voor complexe bewerkingen",
            "Machines",
            dec!(45000.00),
            dec!(65000.00),
            1,
            0,
        ),
        (
            "OND-001",
            "Snijplaatje",
            "HSS snijplaatje 10mm",
            "Onderdelen",
            dec!(15.50),
            dec!(25.00),
            50,
            1,
        ),
        (
            "OND-002",
            "Boor 8mm",
            "HSS boor 8mm x 100mm",
            "Onderdelen",
            dec!(8.75),
            dec!(15.00),
            100,
            1,
        ),
        (
            "OND-003",
            "Moer M8",
            "Stalen moer M8",
            "Onderdelen",
            dec!(0.25),
            dec!(0.50),
            500,
            2,
        ),
        (
            "MACH-003",
            "Lasapparaat",
            "MIG/MAG lasapparaat 200A",
            "Machines",
            dec!(1200.00),
            dec!(1800.00),
            3,
            2,
        ),
        (
            "OND-004",
            "Elektrode 3.25",
            "Rutiel elektrode 3.25mm",
            "Onderdelen",
            dec!(0.85),
            dec!(1.50),
            200,
            2,
        ),
        (
            "MACH-004",
            "Slijpmachine",
            "Bandenlijpmachine 75x2000mm",
            "Machines",
            dec!(3500.00),
            dec!(5200.00),
            1,
            0,
        ),
    ];

    rows.into_iter()
        .map(
            |(sku, name, description, category, purchase_price, sale_price, stock, supplier)| {
                state.products.create(|id| Product {
                    id,
                    sku: sku.to_string(),
                    name: name.to_string(),
                    description: description.to_string(),
                    category: category.to_string(),
                    purchase_price,
                    sale_price,
                    stock,
                    supplier_id: suppliers[supplier].id,
                })
            },
        )
        .collect()
}

fn seed_customers(state: &AppState) -> Vec<Customer> {
    let rows: [(&str, Option<&str>, &str, &str, &str); 5] = [
        (
            "Metaalwerken BV",
            Some("NL123456789B01"),
            "info@metaalwerken.nl",
            "020-1234567",
            "Industrieweg 123, 1000 AB Amsterdam",
        ),
        (
            "Constructie & Co",
            Some("NL987654321B01"),
            "contact@constructieco.nl",
            "010-7654321",
            "Havenstraat 456, 3000 AB Rotterdam",
        ),
        (
            "Precisie Techniek",
            Some("NL555666777B01"),
            "verkoop@precisietechniek.nl",
            "040-555666",
            "Technieklaan 789, 5600 AB Eindhoven",
        ),
        (
            "Machine Service",
            None,
            "service@machineservice.nl",
            "030-999888",
            "Serviceweg 321, 3500 AB Utrecht",
        ),
        (
            "Industrieel Onderhoud",
            Some("NL111222333B01"),
            "onderhoud@industriel.nl",
            "050-111222",
            "Onderhoudsstraat 654, 9700 AB Groningen",
        ),
    ];

    rows.into_iter()
        .map(|(company_name, vat_number, email, phone, address)| {
            state.customers.create(|id| Customer {
                id,
                company_name: company_name.to_string(),
                vat_number: vat_number.map(String::from),
                email: email.to_string(),
                phone: phone.to_string(),
                address: address.to_string(),
                billing_address: address.to_string(),
            })
        })
        .collect()
}

fn seed_orders(state: &AppState, customers: &[Customer], products: &[Product]) -> Vec<Order> {
    let today = Utc::now().date_naive();

    // (customer idx, days ago, status, [(product idx, quantity, unit price)])
    let rows: [(usize, i64, OrderStatus, Vec<(usize, i64, Decimal)>); 4] = [
        (
            0,
            5,
            OrderStatus::Processing,
            vec![(0, 1, dec!(35000.00)), (2, 10, dec!(25.00))],
        ),
        (
            1,
            3,
            OrderStatus::New,
            vec![(1, 1, dec!(65000.00)), (3, 5, dec!(15.00))],
        ),
        (
            2,
            1,
            OrderStatus::Delivered,
            vec![(5, 1, dec!(1800.00)), (6, 50, dec!(1.50))],
        ),
        (
            3,
            0,
            OrderStatus::Cancelled,
            vec![(4, 2, dec!(0.50)), (7, 1, dec!(5200.00))],
        ),
    ];

    rows.into_iter()
        .map(|(customer, days_ago, status, line_rows)| {
            let lines: Vec<OrderLine> = line_rows
                .into_iter()
                .map(|(product, quantity, unit_price)| OrderLine {
                    product_id: products[product].id,
                    quantity,
                    unit_price,
                    line_total: line_total(unit_price, quantity),
                })
                .collect();
            let totals = OrderTotals::from_line_totals(lines.iter().map(|l| l.line_total));

            state.orders.create(|id| Order {
                id,
                customer_id: customers[customer].id,
                order_date: today - Duration::days(days_ago),
                status,
                lines,
                totals,
            })
        })
        .collect()
}

fn seed_movements(state: &AppState, products: &[Product]) {
    let today = Utc::now().date_naive();

    // Historical ledger entries; product stock fields are seeded directly,
    // so these bypass the ledger instead of mutating stock again.
    let rows: [(usize, MovementKind, i64, i64, &str); 6] = [
        (0, MovementKind::In, 5, 10, "Initiële voorraad"),
        (0, MovementKind::Out, 2, 5, "Verkoop"),
        (1, MovementKind::In, 2, 8, "Initiële voorraad"),
        (2, MovementKind::In, 100, 15, "Bulk inkoop"),
        (2, MovementKind::Out, 20, 3, "Verkoop"),
        (3, MovementKind::Correction, 5, 1, "Inventaris correctie"),
    ];

    for (product, kind, quantity, days_ago, remark) in rows {
        state.movements.create(|id| StockMovement {
            id,
            product_id: products[product].id,
            kind,
            quantity,
            date: today - Duration::days(days_ago),
            remark: Some(remark.to_string()),
        });
    }
}

fn seed_invoices(state: &AppState, orders: &[Order]) {
    let today = Utc::now().date_naive();

    let rows: [(usize, i64, InvoiceStatus); 3] = [
        (0, 5, InvoiceStatus::Open),
        (1, 3, InvoiceStatus::Paid),
        (2, 10, InvoiceStatus::Late),
    ];

    for (order, days_ago, status) in rows {
        let invoice_date = today - Duration::days(days_ago);
        state.invoices.create(|id| Invoice {
            id,
            order_id: orders[order].id,
            invoice_date,
            due_date: invoice_date + Duration::days(PAYMENT_TERM_DAYS),
            status,
            inc_vat_total: orders[order].totals.inc_vat,
        });
    }
}
