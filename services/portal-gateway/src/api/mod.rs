//! Gateway HTTP API module.
//!
//! # Purpose
//! Exposes the built-in route handlers and the shared error shape used when
//! the gate refuses a request.
pub mod error;
pub mod identity;
pub mod system;
pub mod types;
