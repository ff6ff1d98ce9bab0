//! Company registry: CRUD over company records.

pub mod handlers;
mod service;

pub use service::{CompanyPayload, CompanyService};
