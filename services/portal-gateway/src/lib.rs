//! Portal gateway service library crate.
//!
//! # Purpose
//! Hosts the authorization gate as axum middleware, along with configuration,
//! observability, and the small set of built-in routes, for use by the binary
//! and tests.
//!
//! # Notes
//! Policy decisions live in `portal-authz`; this crate only translates between
//! HTTP and the gate.
pub mod api;
pub mod app;
pub mod config;
pub mod middleware;
pub mod observability;
