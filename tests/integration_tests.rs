//! Integration Tests Entry Point
//!
//! Tests are organized by module:
//! - `api/` - REST API endpoint tests over the real router
//! - `common/` - Shared test utilities

mod api;
mod common;
