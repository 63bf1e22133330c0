//! AWS SDK adapters for the awsutils helpers.
//!
//! This crate owns the runtime integration details: SDK-backed
//! implementations of the `awsutils_core` client traits, environment-driven
//! client configuration, and the `awsutils` command-line binary. The helpers
//! themselves (retries, status checks, logging) live in `awsutils_core`.

pub mod adapters;
pub mod config;
pub mod telemetry;
