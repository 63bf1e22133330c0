//! Object-storage file handling.
//!
//! Two generations of helpers live side by side. The flag-returning functions
//! (`bucket_access`, `download`, `move_file`, ...) log failures and hand back a
//! `bool` or `Option`; they are deprecated and kept for existing callers. The
//! `s3_` functions return `Result`, so no error means the operation succeeded,
//! and they retry local failures with the policies in [`crate::retry`].

use std::path::Path;

use tracing::{debug, error, info};

use crate::error::AwsError;
use crate::object_store::{ObjectMetadata, ObjectStore};
use crate::retry::{DOWNLOAD_RETRY, MOVE_RETRY, UPLOAD_RETRY};

/// Tests accessibility of a bucket.
#[deprecated(note = "use `s3_bucket_access`")]
pub fn bucket_access(s3: &dyn ObjectStore, bucket: &str) -> bool {
    match s3.head_bucket(bucket) {
        Ok(_) => {
            debug!(bucket, "bucket is accessible");
            true
        }
        Err(err) => {
            error!(bucket, error = %err, "bucket is inaccessible");
            false
        }
    }
}

/// Tests accessibility of a key in a bucket.
#[deprecated(note = "use `s3_key_access`")]
pub fn key_access(s3: &dyn ObjectStore, bucket: &str, key: &str) -> bool {
    match s3.head_object(bucket, key) {
        Ok(_) => {
            debug!(bucket, key, "key is accessible");
            true
        }
        Err(err) => {
            error!(bucket, key, error = %err, "key does not exist or is inaccessible");
            false
        }
    }
}

/// HEAD response for a key, or `None` when the key cannot be reached.
pub fn key_metadata(s3: &dyn ObjectStore, bucket: &str, key: &str) -> Option<ObjectMetadata> {
    match s3.head_object(bucket, key) {
        Ok(metadata) => {
            debug!(bucket, key, "key is accessible");
            Some(metadata)
        }
        Err(err) => {
            error!(bucket, key, error = %err, "key does not exist or is inaccessible");
            None
        }
    }
}

/// Downloads `key` to `local_file` after checking the bucket and key are reachable.
///
/// Returns `true` only when the download succeeded and the file exists locally.
#[deprecated(note = "use `s3_download`")]
#[allow(deprecated)]
pub fn download(s3: &dyn ObjectStore, bucket: &str, key: &str, local_file: &Path) -> bool {
    let source_flag = bucket_access(s3, bucket);
    let key_flag = key_access(s3, bucket, key);

    if !(source_flag && key_flag) {
        error!(bucket, key, "download ABORTED - inaccessible s3 resource");
        return false;
    }

    debug!(bucket, key, "downloading");
    let mut success = match s3.download_file(bucket, key, local_file) {
        Ok(()) => {
            debug!(bucket, key, "download succeeded");
            true
        }
        Err(err) if err.is_not_found() => {
            error!(bucket, key, "s3 object not found during file download");
            false
        }
        Err(err) => {
            error!(bucket, key, error = %err, "unexpected error during download");
            false
        }
    };

    if !local_file.is_file() {
        error!(
            key,
            path = %local_file.display(),
            "download possible but not saved locally"
        );
        success = false;
    }

    success
}

/// Uploads `local_file` to `bucket`/`key`, returning `true` on success.
#[deprecated(note = "use `s3_upload`")]
pub fn upload(s3: &dyn ObjectStore, bucket: &str, key: &str, local_file: &Path) -> bool {
    match s3.upload_file(local_file, bucket, key) {
        Ok(()) => true,
        Err(err) if err.is_local_io() => {
            error!(path = %local_file.display(), error = %err, "local file error on upload");
            false
        }
        Err(err) if err.is_not_found() => {
            error!(bucket, "bucket not found");
            false
        }
        Err(err) => {
            error!(bucket, key, error = %err, "unexpected error during upload");
            false
        }
    }
}

/// Managed move of a file from one bucket to another.
///
/// Returns the abort flag: `true` means the move did not happen completely and
/// the caller should stop.
#[deprecated(note = "use `s3_move`")]
#[allow(deprecated)]
pub fn move_file(
    s3: &dyn ObjectStore,
    source_bucket: &str,
    target_bucket: &str,
    source_key: &str,
    target_key: &str,
    local_file: &Path,
) -> bool {
    let source_flag = bucket_access(s3, source_bucket);
    let key_flag = key_access(s3, source_bucket, source_key);
    let target_flag = bucket_access(s3, target_bucket);

    if !(source_flag && key_flag && target_flag) {
        error!(
            key = source_key,
            target_bucket, "move ABORTED due to inaccessible s3 resource"
        );
        return true;
    }

    if move_core(
        s3,
        source_bucket,
        target_bucket,
        source_key,
        target_key,
        local_file,
    ) {
        info!(key = source_key, target_bucket, "moved");
        false
    } else {
        error!(key = source_key, target_bucket, "move FAILED");
        true
    }
}

/// Uploads the local copy to the target and deletes the source object once the
/// upload is verified. Returns `true` when all three steps succeeded.
#[deprecated(note = "use `s3_move`")]
#[allow(deprecated)]
pub fn move_core(
    s3: &dyn ObjectStore,
    source_bucket: &str,
    target_bucket: &str,
    source_key: &str,
    target_key: &str,
    local_file: &Path,
) -> bool {
    let upload_flag = upload(s3, target_bucket, target_key, local_file);
    let key_flag = upload_flag && key_access(s3, target_bucket, target_key);

    if !(upload_flag && key_flag) {
        return false;
    }

    debug!(key = target_key, target_bucket, "upload success");
    match s3.delete_object(source_bucket, source_key) {
        Ok(_) => true,
        Err(err) if err.is_not_found() => {
            error!(
                key = source_key,
                bucket = source_bucket,
                error = %err,
                "file not found - delete failed"
            );
            false
        }
        Err(err) => {
            error!(
                key = source_key,
                bucket = source_bucket,
                error = %err,
                "delete failed"
            );
            false
        }
    }
}

/// Fails with [`AwsError::BucketInaccessible`] unless the bucket can be reached.
pub fn s3_bucket_access(s3: &dyn ObjectStore, bucket: &str) -> Result<(), AwsError> {
    s3.head_bucket(bucket).map_err(|cause| {
        error!(bucket, error = %cause, "bucket is inaccessible");
        AwsError::BucketInaccessible {
            bucket: bucket.to_string(),
            cause: Box::new(cause),
        }
    })?;
    debug!(bucket, "bucket is accessible");
    Ok(())
}

/// Fails with [`AwsError::KeyInaccessible`] unless the key can be reached.
pub fn s3_key_access(s3: &dyn ObjectStore, bucket: &str, key: &str) -> Result<(), AwsError> {
    s3.head_object(bucket, key).map_err(|cause| {
        error!(bucket, key, error = %cause, "key does not exist or is inaccessible");
        AwsError::KeyInaccessible {
            bucket: bucket.to_string(),
            key: key.to_string(),
            cause: Box::new(cause),
        }
    })?;
    debug!(bucket, key, "key is accessible");
    Ok(())
}

/// HEAD response for a key; the service error is returned unwrapped.
pub fn s3_key_metadata(
    s3: &dyn ObjectStore,
    bucket: &str,
    key: &str,
) -> Result<ObjectMetadata, AwsError> {
    s3.head_object(bucket, key)
}

/// Downloads `key` to `local_file`.
///
/// The SDK already retries transport failures, so only local failures are
/// retried here (three attempts in total). Anything else is left to the caller.
pub fn s3_download(
    s3: &dyn ObjectStore,
    bucket: &str,
    key: &str,
    local_file: &Path,
) -> Result<(), AwsError> {
    DOWNLOAD_RETRY.run("s3_download", AwsError::is_local_io, || {
        s3.download_file(bucket, key, local_file).map_err(|err| {
            if err.is_transport() {
                error!(bucket, key, error = %err, "unexpected error during file download operation");
            }
            err
        })?;

        if !local_file.is_file() {
            error!(
                key,
                path = %local_file.display(),
                "download possible but not saved locally"
            );
            return Err(AwsError::NotSavedLocally {
                key: key.to_string(),
                path: local_file.to_path_buf(),
            });
        }

        Ok(())
    })
}

/// Uploads `local_file` to `bucket`/`key`, retrying once on local failures.
pub fn s3_upload(
    s3: &dyn ObjectStore,
    bucket: &str,
    key: &str,
    local_file: &Path,
) -> Result<(), AwsError> {
    UPLOAD_RETRY.run("s3_upload", AwsError::is_local_io, || {
        s3.upload_file(local_file, bucket, key).map_err(|err| {
            if err.is_transport() {
                error!(bucket, key, error = %err, "unexpected error during file upload operation");
            } else if err.is_local_io() {
                error!(path = %local_file.display(), error = %err, "local file error on upload");
            }
            err
        })
    })
}

/// Moves a file between buckets: uploads the local copy to the target, checks
/// the new key is reachable, then deletes the source object.
///
/// Any failed step fails the attempt with [`AwsError::MoveFailed`]; the whole
/// sequence is tried three times.
pub fn s3_move(
    s3: &dyn ObjectStore,
    source_bucket: &str,
    target_bucket: &str,
    source_key: &str,
    target_key: &str,
    local_file: &Path,
) -> Result<(), AwsError> {
    MOVE_RETRY.run("s3_move", AwsError::is_move_failure, || {
        let failed = |cause: AwsError| AwsError::MoveFailed {
            source_key: source_key.to_string(),
            target_key: target_key.to_string(),
            source_bucket: source_bucket.to_string(),
            target_bucket: target_bucket.to_string(),
            cause: Box::new(cause),
        };

        s3_upload(s3, target_bucket, target_key, local_file).map_err(failed)?;
        s3_key_access(s3, target_bucket, target_key).map_err(failed)?;
        debug!(key = target_key, target_bucket, "upload success");

        s3.delete_object(source_bucket, source_key)
            .map_err(failed)?;
        debug!(key = source_key, source_bucket, target_bucket, "moved");
        Ok(())
    })
}
