use tracing::warn;

use crate::error::AwsError;

/// Declarative retry policy: stop after a fixed number of attempts and only
/// retry errors accepted by the caller's predicate. Retries run immediately.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
}

/// Downloads retry twice on local I/O failures.
pub const DOWNLOAD_RETRY: RetryPolicy = RetryPolicy::stop_after_attempt(3);
/// Uploads retry once on local I/O failures.
pub const UPLOAD_RETRY: RetryPolicy = RetryPolicy::stop_after_attempt(2);
/// Moves retry twice on any failed step.
pub const MOVE_RETRY: RetryPolicy = RetryPolicy::stop_after_attempt(3);

impl RetryPolicy {
    /// A policy allowing `attempts` calls in total. Zero is treated as one.
    pub const fn stop_after_attempt(attempts: u32) -> Self {
        Self {
            max_attempts: if attempts == 0 { 1 } else { attempts },
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Runs `call` until it succeeds, fails with an error `retry_if` rejects,
    /// or the attempt budget is spent.
    ///
    /// Non-retryable errors are returned as-is. Exhausting the budget wraps the
    /// last error in [`AwsError::RetriesExhausted`].
    pub fn run<T>(
        &self,
        operation: &'static str,
        retry_if: impl Fn(&AwsError) -> bool,
        mut call: impl FnMut() -> Result<T, AwsError>,
    ) -> Result<T, AwsError> {
        let mut attempt = 1;
        loop {
            match call() {
                Ok(value) => return Ok(value),
                Err(error) if !retry_if(&error) => return Err(error),
                Err(error) if attempt >= self.max_attempts => {
                    return Err(AwsError::RetriesExhausted {
                        operation,
                        attempts: attempt,
                        last: Box::new(error),
                    });
                }
                Err(error) => {
                    warn!(
                        operation,
                        attempt,
                        max_attempts = self.max_attempts,
                        %error,
                        "retrying"
                    );
                    attempt += 1;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::io;

    use super::*;

    fn io_error() -> AwsError {
        AwsError::local_io("/tmp/x", io::Error::new(io::ErrorKind::Other, "disk"))
    }

    #[test]
    fn zero_attempts_still_calls_once() {
        assert_eq!(RetryPolicy::stop_after_attempt(0).max_attempts(), 1);
    }

    #[test]
    fn returns_first_success_without_retrying() {
        let calls = Cell::new(0);
        let result = DOWNLOAD_RETRY.run("op", AwsError::is_local_io, || {
            calls.set(calls.get() + 1);
            Ok::<_, AwsError>(7)
        });

        assert_eq!(result.expect("call should succeed"), 7);
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn retries_matching_errors_until_success() {
        let calls = Cell::new(0);
        let result = DOWNLOAD_RETRY.run("op", AwsError::is_local_io, || {
            calls.set(calls.get() + 1);
            if calls.get() < 3 {
                Err(io_error())
            } else {
                Ok("done")
            }
        });

        assert_eq!(result.expect("third attempt succeeds"), "done");
        assert_eq!(calls.get(), 3);
    }

    #[test]
    fn non_matching_error_is_returned_unwrapped_on_first_attempt() {
        let calls = Cell::new(0);
        let result: Result<(), _> = DOWNLOAD_RETRY.run("op", AwsError::is_local_io, || {
            calls.set(calls.get() + 1);
            Err(AwsError::client("get_object", Some(403), "AccessDenied"))
        });

        let error = result.expect_err("client errors are not retried");
        assert!(error.is_client());
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn exhaustion_wraps_last_error_with_attempt_count() {
        let calls = Cell::new(0);
        let result: Result<(), _> = UPLOAD_RETRY.run("s3_upload", AwsError::is_local_io, || {
            calls.set(calls.get() + 1);
            Err(io_error())
        });

        match result.expect_err("budget should run out") {
            AwsError::RetriesExhausted {
                operation,
                attempts,
                last,
            } => {
                assert_eq!(operation, "s3_upload");
                assert_eq!(attempts, 2);
                assert!(last.is_local_io());
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(calls.get(), 2);
    }
}
