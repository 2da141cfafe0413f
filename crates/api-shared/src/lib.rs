//! # API Shared
//!
//! Shared wire types and utilities for the HPMS API.
//!
//! Contains:
//! - JSON request/response bodies with OpenAPI schemas (`wire` module)
//! - Shared services like `HealthService`
//! - API key checking
//!
//! Used by `api-rest` and the CLI.

pub mod auth;
pub mod health;
pub mod wire;

pub use health::HealthService;
pub use wire::*;
