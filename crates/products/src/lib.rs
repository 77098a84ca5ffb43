//! `orderflow-products`: product catalog.
//!
//! The catalog owns product creation and edits, and enforces store-wide SKU
//! uniqueness. Stock itself is mutated by the stock ledger, not here.

pub mod catalog;
pub mod product;

pub use catalog::Catalog;
pub use product::{Product, ProductDraft};
