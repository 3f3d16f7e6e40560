//! Data Transfer Objects
//!
//! Request and response body structures for the HTTP API.

pub mod request;
pub mod response;
