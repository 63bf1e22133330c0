//! SDK-backed implementations of the synchronous client traits.
//!
//! The SDK is async; every call is driven to completion with
//! `block_in_place` on the current Tokio runtime, so callers must run inside a
//! multi-threaded runtime.

use std::future::Future;

use aws_sdk_s3::config::http::HttpResponse;
use aws_sdk_s3::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use awsutils_core::{AwsError, ResponseMetadata};

pub mod s3;
pub mod sqs;

pub use s3::S3ObjectStore;
pub use sqs::SqsQueueClient;

pub(crate) fn block_on<F: Future>(future: F) -> F::Output {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}

/// Maps an SDK failure onto the helper taxonomy: anything the service answered
/// is a client error, everything else never reached it.
pub(crate) fn classify<E>(operation: &'static str, error: SdkError<E, HttpResponse>) -> AwsError
where
    E: ProvideErrorMetadata + std::error::Error + Send + Sync + 'static,
{
    let message = DisplayErrorContext(&error).to_string();
    match &error {
        SdkError::ServiceError(_) | SdkError::ResponseError(_) => AwsError::Client {
            operation,
            status: error
                .raw_response()
                .map(|response| response.status().as_u16()),
            code: error.code().map(str::to_string),
            message,
        },
        _ => AwsError::Transport { operation, message },
    }
}

/// The SDK turns non-2xx answers into errors, so a returned output is a 200.
pub(crate) fn ok_metadata(request_id: Option<&str>) -> ResponseMetadata {
    ResponseMetadata {
        http_status_code: 200,
        request_id: request_id.map(str::to_string),
    }
}
