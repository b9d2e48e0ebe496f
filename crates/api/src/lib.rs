//! HTTP surface of the pets service.

pub mod app;
pub mod middleware;
