//! `mascotas-core`: domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns):
//! identifiers, the input error model, field validation and paging.

pub mod entity;
pub mod error;
pub mod id;
pub mod page;
pub mod validation;

pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::{CareEventId, PetId};
pub use page::Page;
pub use validation::{FieldError, Rule, Validator};
