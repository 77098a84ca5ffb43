//! `orderflow-parties`: customer and supplier reference data.
//!
//! Parties carry no lifecycle coupling to the engines beyond existence
//! checks when orders and products reference them.

pub mod party;

pub use party::{Customer, Supplier};
