use std::io;
use std::path::Path;

use aws_sdk_s3::operation::RequestId;
use aws_sdk_s3::primitives::ByteStream;
use awsutils_core::{AwsError, ObjectMetadata, ObjectStore, ResponseMetadata};
use tokio::io::AsyncWriteExt;

use super::{block_on, classify, ok_metadata};

/// [`ObjectStore`] over an S3 client.
#[derive(Debug, Clone)]
pub struct S3ObjectStore {
    client: aws_sdk_s3::Client,
}

impl S3ObjectStore {
    pub fn new(client: aws_sdk_s3::Client) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &aws_sdk_s3::Client {
        &self.client
    }
}

impl ObjectStore for S3ObjectStore {
    fn head_bucket(&self, bucket: &str) -> Result<ResponseMetadata, AwsError> {
        let output = block_on(self.client.head_bucket().bucket(bucket).send())
            .map_err(|error| classify("head_bucket", error))?;
        Ok(ok_metadata(output.request_id()))
    }

    fn head_object(&self, bucket: &str, key: &str) -> Result<ObjectMetadata, AwsError> {
        let output = block_on(self.client.head_object().bucket(bucket).key(key).send())
            .map_err(|error| classify("head_object", error))?;

        Ok(ObjectMetadata {
            metadata: ok_metadata(output.request_id()),
            content_length: output.content_length(),
            content_type: output.content_type().map(str::to_string),
            e_tag: output.e_tag().map(str::to_string),
            last_modified: output.last_modified().map(|timestamp| timestamp.secs()),
            user_metadata: output.metadata().cloned().unwrap_or_default(),
        })
    }

    /// Streams the object body into `local_file`, replacing any existing file.
    fn download_file(&self, bucket: &str, key: &str, local_file: &Path) -> Result<(), AwsError> {
        let local_error = |error: io::Error| AwsError::local_io(local_file, error);

        block_on(async {
            let output = self
                .client
                .get_object()
                .bucket(bucket)
                .key(key)
                .send()
                .await
                .map_err(|error| classify("get_object", error))?;

            let mut file = tokio::fs::File::create(local_file)
                .await
                .map_err(local_error)?;
            let written = write_body(output.body, &mut file, local_error).await;
            drop(file);
            if written.is_err() {
                // A truncated body must not pass for a finished download.
                let _ = tokio::fs::remove_file(local_file).await;
            }
            written
        })
    }

    fn upload_file(&self, local_file: &Path, bucket: &str, key: &str) -> Result<(), AwsError> {
        block_on(async {
            let body = ByteStream::from_path(local_file)
                .await
                .map_err(|error| AwsError::local_io(local_file, io::Error::other(error)))?;

            self.client
                .put_object()
                .bucket(bucket)
                .key(key)
                .body(body)
                .send()
                .await
                .map(|_| ())
                .map_err(|error| classify("put_object", error))
        })
    }

    fn delete_object(&self, bucket: &str, key: &str) -> Result<ResponseMetadata, AwsError> {
        let output = block_on(self.client.delete_object().bucket(bucket).key(key).send())
            .map_err(|error| classify("delete_object", error))?;
        Ok(ok_metadata(output.request_id()))
    }
}

async fn write_body<W>(
    mut body: ByteStream,
    file: &mut W,
    local_error: impl Fn(io::Error) -> AwsError,
) -> Result<(), AwsError>
where
    W: tokio::io::AsyncWrite + Unpin,
{
    while let Some(chunk) = body.try_next().await.map_err(|error| AwsError::Transport {
        operation: "get_object",
        message: format!("failed to read object body: {error}"),
    })? {
        file.write_all(&chunk).await.map_err(&local_error)?;
    }
    file.flush().await.map_err(local_error)
}
