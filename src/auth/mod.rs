//! Authentication module for the company registry server
//!
//! This module handles user registration, password hashing,
//! bearer token issuance and token validation.

pub mod handlers;
pub mod password;
mod service;

pub use service::{AuthService, Claims, Credentials, Registration};
