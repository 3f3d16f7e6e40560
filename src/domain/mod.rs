//! # Domain Layer
//!
//! Core business entities and repository traits, independent of any
//! framework or infrastructure concern.

pub mod entities;

pub use entities::*;
