use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::AwsError;

/// Status information returned alongside every service response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResponseMetadata {
    pub http_status_code: u16,
    pub request_id: Option<String>,
}

impl ResponseMetadata {
    pub fn ok() -> Self {
        Self {
            http_status_code: 200,
            request_id: None,
        }
    }

    pub fn with_status(http_status_code: u16) -> Self {
        Self {
            http_status_code,
            request_id: None,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.http_status_code == 200
    }
}

/// HEAD response for a single object.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ObjectMetadata {
    pub metadata: ResponseMetadata,
    pub content_length: Option<i64>,
    pub content_type: Option<String>,
    pub e_tag: Option<String>,
    /// Seconds since the Unix epoch.
    pub last_modified: Option<i64>,
    pub user_metadata: HashMap<String, String>,
}

impl ObjectMetadata {
    pub fn new(metadata: ResponseMetadata) -> Self {
        Self {
            metadata,
            content_length: None,
            content_type: None,
            e_tag: None,
            last_modified: None,
            user_metadata: HashMap::new(),
        }
    }
}

/// Object-storage operations the helpers are built on.
///
/// Implementations report service rejections as [`AwsError::Client`],
/// unreachable services as [`AwsError::Transport`] and local file failures as
/// [`AwsError::LocalIo`].
pub trait ObjectStore {
    fn head_bucket(&self, bucket: &str) -> Result<ResponseMetadata, AwsError>;

    fn head_object(&self, bucket: &str, key: &str) -> Result<ObjectMetadata, AwsError>;

    fn download_file(&self, bucket: &str, key: &str, local_file: &Path) -> Result<(), AwsError>;

    fn upload_file(&self, local_file: &Path, bucket: &str, key: &str) -> Result<(), AwsError>;

    fn delete_object(&self, bucket: &str, key: &str) -> Result<ResponseMetadata, AwsError>;
}
