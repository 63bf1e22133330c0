use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::AwsError;
use crate::object_store::ResponseMetadata;

/// Typed message attribute value.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "data_type", content = "value")]
pub enum MessageAttribute {
    String(String),
    Number(String),
    Binary(Vec<u8>),
}

impl MessageAttribute {
    pub fn data_type(&self) -> &'static str {
        match self {
            Self::String(_) => "String",
            Self::Number(_) => "Number",
            Self::Binary(_) => "Binary",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(value) | Self::Number(value) => Some(value),
            Self::Binary(_) => None,
        }
    }
}

pub type MessageAttributes = HashMap<String, MessageAttribute>;

/// One entry of a batch send, formatted the way the queue service expects.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BatchEntry {
    pub id: String,
    pub message_body: String,
    #[serde(default)]
    pub message_attributes: MessageAttributes,
    pub delay_seconds: Option<i32>,
}

impl BatchEntry {
    pub fn new(id: impl Into<String>, message_body: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            message_body: message_body.into(),
            message_attributes: MessageAttributes::new(),
            delay_seconds: None,
        }
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: MessageAttribute) -> Self {
        self.message_attributes.insert(name.into(), value);
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct QueueUrlResponse {
    pub metadata: ResponseMetadata,
    pub queue_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SentMessage {
    pub id: String,
    pub message_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FailedEntry {
    pub id: String,
    pub code: String,
    pub message: Option<String>,
    pub sender_fault: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SendBatchResponse {
    pub metadata: ResponseMetadata,
    pub successful: Vec<SentMessage>,
    pub failed: Vec<FailedEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReceivedMessage {
    pub message_id: Option<String>,
    pub body: String,
    pub receipt_handle: String,
    #[serde(default)]
    pub message_attributes: MessageAttributes,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReceiveResponse {
    pub metadata: ResponseMetadata,
    /// `None` when the service returned no message list at all.
    pub messages: Option<Vec<ReceivedMessage>>,
}

/// Message-queue operations the helpers are built on.
pub trait QueueClient {
    fn get_queue_url(&self, queue_name: &str) -> Result<QueueUrlResponse, AwsError>;

    fn send_message_batch(
        &self,
        queue_url: &str,
        entries: &[BatchEntry],
    ) -> Result<SendBatchResponse, AwsError>;

    /// Receives messages with all message attributes attached.
    fn receive_message(&self, queue_url: &str) -> Result<ReceiveResponse, AwsError>;

    fn delete_message(
        &self,
        queue_url: &str,
        receipt_handle: &str,
    ) -> Result<ResponseMetadata, AwsError>;

    fn purge_queue(&self, queue_url: &str) -> Result<ResponseMetadata, AwsError>;
}
