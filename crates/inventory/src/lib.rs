//! `orderflow-inventory`: stock movements and the stock ledger.
//!
//! The ledger is the source of truth for stock derivation: a product's stock
//! quantity is always the replay of all accepted movements, and can never go
//! negative.

pub mod ledger;
pub mod movement;

pub use ledger::StockLedger;
pub use movement::{MovementKind, StockMovement};
