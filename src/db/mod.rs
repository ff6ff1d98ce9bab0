//! Database module for the company registry server
//!
//! This module defines the storage interface, the PostgreSQL
//! implementation used in production and an in-memory one for tests.

pub mod memory;
pub mod models;
pub mod operations;
pub mod storage;

pub use memory::MemoryStorage;
pub use models::{Company, CompanyUpdate, NewCompany, NewUser, User, UserProfile};
pub use operations::DbOperations;
pub use storage::Storage;
