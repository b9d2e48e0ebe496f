//! Infrastructure layer: configuration, Postgres wiring, entity stores.

pub mod config;
pub mod db;
pub mod store;

pub use config::{Config, ConfigError};
pub use store::{
    CareEventStore, InMemoryStore, PetStore, PostgresStore, StoreError, StoreHealth, StoreResult,
};
