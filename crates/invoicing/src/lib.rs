//! `orderflow-invoicing`: invoices derived from orders.
//!
//! One invoice per order, a 30-day payment term, and a snapshot of the
//! order's VAT-inclusive total taken at creation time.

pub mod engine;
pub mod invoice;

pub use engine::InvoiceEngine;
pub use invoice::{Invoice, InvoiceStatus, PAYMENT_TERM_DAYS};
