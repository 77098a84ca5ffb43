//! `orderflow-store`: injectable in-memory entity stores.
//!
//! Each store exclusively owns one entity kind and guarantees linearizable
//! per-key reads and writes. Engines receive stores as `Arc`s, so tests can
//! wire them up without any process-wide singleton.

pub mod memory;

pub use memory::{EntityStore, InMemoryStore};
