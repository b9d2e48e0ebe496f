//! Entity store boundary.
//!
//! One store contract per entity type plus a health probe. `PostgresStore`
//! is the production implementation; `InMemoryStore` mirrors its semantics
//! (serial ids, foreign keys, cascading deletes) for tests and local runs.

pub mod in_memory;
pub mod postgres;
pub mod r#trait;

pub use in_memory::InMemoryStore;
pub use postgres::PostgresStore;
pub use r#trait::{CareEventStore, PetStore, StoreError, StoreHealth, StoreResult};
