//! `orderflow-orders`: the order engine.
//!
//! Owns the order status state machine, line validation against the catalog,
//! cached totals, and the stock deduction triggered by delivery.

pub mod engine;
pub mod order;

pub use engine::{NewOrderLine, OrderEngine, StatusUpdateOutcome};
pub use order::{Order, OrderLine, OrderStatus};
