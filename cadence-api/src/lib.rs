//! # Cadence API Server Library
//!
//! Thin HTTP surface over the Task Tracking Store. Handlers translate
//! requests into store operations and store errors into HTTP responses;
//! all validation and authorization decisions belong to the store.
//!
//! ## Modules
//!
//! - `app`: Application state, router and session auth middleware
//! - `config`: Configuration management
//! - `error`: Error handling and HTTP response mapping
//! - `routes`: API route handlers

pub mod app;
pub mod config;
pub mod error;
pub mod routes;
