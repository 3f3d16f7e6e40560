//! # Messenger Server Library
//!
//! This crate provides a minimal real-time messenger backend with:
//! - RESTful HTTP API for accounts and chat threads
//! - WebSocket delivery with persist-then-broadcast ordering
//! - Access/refresh token authentication with transparent rotation
//! - PostgreSQL for persistent storage
//!
//! ## Architecture
//!
//! The crate follows Clean Architecture principles:
//!
//! - **Domain Layer**: Core business entities and repository traits
//! - **Application Layer**: Business logic services and DTOs
//! - **Infrastructure Layer**: Database implementations and metrics
//! - **Presentation Layer**: HTTP handlers and the WebSocket realtime layer
//!
//! ## Module Structure
//!
//! ```text
//! messenger_server/
//! +-- config/         Configuration management
//! +-- domain/         Domain entities and repository traits
//! +-- application/    Application services and DTOs
//! +-- infrastructure/ Database repositories and metrics
//! +-- presentation/   HTTP routes, middleware and WebSocket handlers
//! +-- shared/         Common utilities (errors, snowflake IDs, validation)
//! ```

// Configuration module
pub mod config;

// Domain layer - Core business logic
pub mod domain;

// Application layer - Business services
pub mod application;

// Infrastructure layer - External implementations
pub mod infrastructure;

// Presentation layer - HTTP and WebSocket handlers
pub mod presentation;

// Shared utilities
pub mod shared;

// Application startup and state management
pub mod startup;

// Telemetry and observability
pub mod telemetry;
