//! REST API client module for the remote vocabulary service.
//!
//! This module provides the `RemoteOptions` trait the option store talks to,
//! and `ApiClient`, its HTTP implementation.
//!
//! The service authenticates with a bearer token; shared views use an
//! unauthenticated, read-only path prefixed with the share id.

pub mod client;
pub mod error;

pub use client::{ApiClient, RemoteOptions};
pub use error::ApiError;
