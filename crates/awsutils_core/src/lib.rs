//! Retrying helper functions for object storage and message queues.
//!
//! This crate owns the error-checking, retry and logging conventions around
//! bucket/key access checks, file transfers and queue messaging. It talks to
//! the services only through the [`object_store::ObjectStore`] and
//! [`queue::QueueClient`] traits and intentionally excludes AWS SDK concerns;
//! `awsutils_aws` provides the SDK-backed implementations.

pub mod error;
pub mod filesystem;
pub mod object_store;
pub mod queue;
pub mod retry;
pub mod sqs;

pub use error::AwsError;
pub use object_store::{ObjectMetadata, ObjectStore, ResponseMetadata};
pub use queue::QueueClient;
pub use retry::RetryPolicy;
