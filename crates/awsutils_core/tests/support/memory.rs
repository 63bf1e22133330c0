#![allow(dead_code)]

use std::collections::{HashMap, HashSet, VecDeque};
use std::fs;
use std::path::Path;
use std::sync::Mutex;

use awsutils_core::queue::{
    BatchEntry, QueueClient, QueueUrlResponse, ReceiveResponse, ReceivedMessage,
    SendBatchResponse, SentMessage,
};
use awsutils_core::{AwsError, ObjectMetadata, ObjectStore, ResponseMetadata};

/// In-memory buckets keyed by `(bucket, key)`.
#[derive(Default)]
pub struct MemoryStore {
    buckets: HashSet<String>,
    objects: Mutex<HashMap<(String, String), Vec<u8>>>,
}

impl MemoryStore {
    pub fn with_buckets(buckets: &[&str]) -> Self {
        Self {
            buckets: buckets.iter().map(|bucket| bucket.to_string()).collect(),
            objects: Mutex::new(HashMap::new()),
        }
    }

    pub fn put(&self, bucket: &str, key: &str, body: &[u8]) {
        self.objects
            .lock()
            .expect("poisoned mutex")
            .insert((bucket.to_string(), key.to_string()), body.to_vec());
    }

    pub fn get(&self, bucket: &str, key: &str) -> Option<Vec<u8>> {
        self.objects
            .lock()
            .expect("poisoned mutex")
            .get(&(bucket.to_string(), key.to_string()))
            .cloned()
    }

    fn require_bucket(&self, operation: &'static str, bucket: &str) -> Result<(), AwsError> {
        if self.buckets.contains(bucket) {
            Ok(())
        } else {
            Err(AwsError::client(operation, Some(404), "NoSuchBucket"))
        }
    }
}

impl ObjectStore for MemoryStore {
    fn head_bucket(&self, bucket: &str) -> Result<ResponseMetadata, AwsError> {
        self.require_bucket("head_bucket", bucket)?;
        Ok(ResponseMetadata::ok())
    }

    fn head_object(&self, bucket: &str, key: &str) -> Result<ObjectMetadata, AwsError> {
        self.require_bucket("head_object", bucket)?;
        let body = self
            .get(bucket, key)
            .ok_or_else(|| AwsError::client("head_object", Some(404), "Not Found"))?;
        let mut metadata = ObjectMetadata::new(ResponseMetadata::ok());
        metadata.content_length = Some(body.len() as i64);
        Ok(metadata)
    }

    fn download_file(&self, bucket: &str, key: &str, local_file: &Path) -> Result<(), AwsError> {
        self.require_bucket("get_object", bucket)?;
        let body = self
            .get(bucket, key)
            .ok_or_else(|| AwsError::client("get_object", Some(404), "NoSuchKey"))?;
        fs::write(local_file, body).map_err(|error| AwsError::local_io(local_file, error))
    }

    fn upload_file(&self, local_file: &Path, bucket: &str, key: &str) -> Result<(), AwsError> {
        let body = fs::read(local_file).map_err(|error| AwsError::local_io(local_file, error))?;
        self.require_bucket("put_object", bucket)?;
        self.put(bucket, key, &body);
        Ok(())
    }

    fn delete_object(&self, bucket: &str, key: &str) -> Result<ResponseMetadata, AwsError> {
        self.require_bucket("delete_object", bucket)?;
        self.objects
            .lock()
            .expect("poisoned mutex")
            .remove(&(bucket.to_string(), key.to_string()));
        Ok(ResponseMetadata::ok())
    }
}

/// A single named queue with visible and in-flight messages.
pub struct MemoryQueue {
    name: String,
    url: String,
    visible: Mutex<VecDeque<BatchEntry>>,
    in_flight: Mutex<HashMap<String, BatchEntry>>,
    next_handle: Mutex<usize>,
}

impl MemoryQueue {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            url: format!("https://sqs.local/000000000000/{name}"),
            visible: Mutex::new(VecDeque::new()),
            in_flight: Mutex::new(HashMap::new()),
            next_handle: Mutex::new(0),
        }
    }

    pub fn visible_len(&self) -> usize {
        self.visible.lock().expect("poisoned mutex").len()
    }

    pub fn in_flight_len(&self) -> usize {
        self.in_flight.lock().expect("poisoned mutex").len()
    }
}

impl QueueClient for MemoryQueue {
    fn get_queue_url(&self, queue_name: &str) -> Result<QueueUrlResponse, AwsError> {
        if queue_name != self.name {
            return Err(AwsError::client(
                "get_queue_url",
                Some(400),
                "AWS.SimpleQueueService.NonExistentQueue",
            ));
        }
        Ok(QueueUrlResponse {
            metadata: ResponseMetadata::ok(),
            queue_url: Some(self.url.clone()),
        })
    }

    fn send_message_batch(
        &self,
        _queue_url: &str,
        entries: &[BatchEntry],
    ) -> Result<SendBatchResponse, AwsError> {
        let mut visible = self.visible.lock().expect("poisoned mutex");
        let successful = entries
            .iter()
            .map(|entry| {
                visible.push_back(entry.clone());
                SentMessage {
                    id: entry.id.clone(),
                    message_id: format!("{}-{}", self.name, entry.id),
                }
            })
            .collect();
        Ok(SendBatchResponse {
            metadata: ResponseMetadata::ok(),
            successful,
            failed: Vec::new(),
        })
    }

    fn receive_message(&self, _queue_url: &str) -> Result<ReceiveResponse, AwsError> {
        let Some(entry) = self.visible.lock().expect("poisoned mutex").pop_front() else {
            return Ok(ReceiveResponse {
                metadata: ResponseMetadata::ok(),
                messages: None,
            });
        };

        let mut next_handle = self.next_handle.lock().expect("poisoned mutex");
        *next_handle += 1;
        let receipt_handle = format!("handle-{next_handle}");
        self.in_flight
            .lock()
            .expect("poisoned mutex")
            .insert(receipt_handle.clone(), entry.clone());

        Ok(ReceiveResponse {
            metadata: ResponseMetadata::ok(),
            messages: Some(vec![ReceivedMessage {
                message_id: Some(entry.id),
                body: entry.message_body,
                receipt_handle,
                message_attributes: entry.message_attributes,
            }]),
        })
    }

    fn delete_message(
        &self,
        _queue_url: &str,
        receipt_handle: &str,
    ) -> Result<ResponseMetadata, AwsError> {
        match self
            .in_flight
            .lock()
            .expect("poisoned mutex")
            .remove(receipt_handle)
        {
            Some(_) => Ok(ResponseMetadata::ok()),
            None => Err(AwsError::client(
                "delete_message",
                Some(400),
                "ReceiptHandleIsInvalid",
            )),
        }
    }

    fn purge_queue(&self, _queue_url: &str) -> Result<ResponseMetadata, AwsError> {
        self.visible.lock().expect("poisoned mutex").clear();
        self.in_flight.lock().expect("poisoned mutex").clear();
        Ok(ResponseMetadata::ok())
    }
}
