//! `orderflow-core`: domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure
//! concerns): the error taxonomy, typed sequential identifiers, the `Entity`
//! trait, and the shared monetary computation.

pub mod entity;
pub mod error;
pub mod id;
pub mod money;

pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::EntityId;
pub use money::{OrderTotals, VAT_RATE};
