use std::collections::HashMap;

use aws_sdk_sqs::operation::RequestId;
use aws_sdk_sqs::primitives::Blob;
use aws_sdk_sqs::types::{Message, MessageAttributeValue, SendMessageBatchRequestEntry};
use awsutils_core::queue::{
    BatchEntry, FailedEntry, MessageAttribute, MessageAttributes, QueueClient, QueueUrlResponse,
    ReceiveResponse, ReceivedMessage, SendBatchResponse, SentMessage,
};
use awsutils_core::{AwsError, ResponseMetadata};

use super::{block_on, classify, ok_metadata};

/// Receive requests ask for every message attribute.
const ALL_ATTRIBUTES: &str = "All";

/// [`QueueClient`] over an SQS client.
#[derive(Debug, Clone)]
pub struct SqsQueueClient {
    client: aws_sdk_sqs::Client,
}

impl SqsQueueClient {
    pub fn new(client: aws_sdk_sqs::Client) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &aws_sdk_sqs::Client {
        &self.client
    }
}

impl QueueClient for SqsQueueClient {
    fn get_queue_url(&self, queue_name: &str) -> Result<QueueUrlResponse, AwsError> {
        let output = block_on(self.client.get_queue_url().queue_name(queue_name).send())
            .map_err(|error| classify("get_queue_url", error))?;

        Ok(QueueUrlResponse {
            metadata: ok_metadata(output.request_id()),
            queue_url: output.queue_url().map(str::to_string),
        })
    }

    fn send_message_batch(
        &self,
        queue_url: &str,
        entries: &[BatchEntry],
    ) -> Result<SendBatchResponse, AwsError> {
        let request_entries = entries
            .iter()
            .map(batch_request_entry)
            .collect::<Result<Vec<_>, _>>()?;

        let output = block_on(
            self.client
                .send_message_batch()
                .queue_url(queue_url)
                .set_entries(Some(request_entries))
                .send(),
        )
        .map_err(|error| classify("send_message_batch", error))?;

        Ok(SendBatchResponse {
            metadata: ok_metadata(output.request_id()),
            successful: output
                .successful()
                .iter()
                .map(|entry| SentMessage {
                    id: entry.id().to_string(),
                    message_id: entry.message_id().to_string(),
                })
                .collect(),
            failed: output
                .failed()
                .iter()
                .map(|entry| FailedEntry {
                    id: entry.id().to_string(),
                    code: entry.code().to_string(),
                    message: entry.message().map(str::to_string),
                    sender_fault: entry.sender_fault(),
                })
                .collect(),
        })
    }

    fn receive_message(&self, queue_url: &str) -> Result<ReceiveResponse, AwsError> {
        let output = block_on(
            self.client
                .receive_message()
                .queue_url(queue_url)
                .message_attribute_names(ALL_ATTRIBUTES)
                .send(),
        )
        .map_err(|error| classify("receive_message", error))?;

        let metadata = ok_metadata(output.request_id());
        let messages = output
            .messages
            .map(|messages| messages.into_iter().map(received_message).collect());

        Ok(ReceiveResponse { metadata, messages })
    }

    fn delete_message(
        &self,
        queue_url: &str,
        receipt_handle: &str,
    ) -> Result<ResponseMetadata, AwsError> {
        let output = block_on(
            self.client
                .delete_message()
                .queue_url(queue_url)
                .receipt_handle(receipt_handle)
                .send(),
        )
        .map_err(|error| classify("delete_message", error))?;
        Ok(ok_metadata(output.request_id()))
    }

    fn purge_queue(&self, queue_url: &str) -> Result<ResponseMetadata, AwsError> {
        let output = block_on(self.client.purge_queue().queue_url(queue_url).send())
            .map_err(|error| classify("purge_queue", error))?;
        Ok(ok_metadata(output.request_id()))
    }
}

fn batch_request_entry(entry: &BatchEntry) -> Result<SendMessageBatchRequestEntry, AwsError> {
    let mut attributes = HashMap::with_capacity(entry.message_attributes.len());
    for (name, value) in &entry.message_attributes {
        attributes.insert(name.clone(), sdk_attribute(value)?);
    }

    SendMessageBatchRequestEntry::builder()
        .id(&entry.id)
        .message_body(&entry.message_body)
        .set_message_attributes((!attributes.is_empty()).then_some(attributes))
        .set_delay_seconds(entry.delay_seconds)
        .build()
        .map_err(|error| invalid_request(format!("invalid batch entry {}: {error}", entry.id)))
}

fn sdk_attribute(value: &MessageAttribute) -> Result<MessageAttributeValue, AwsError> {
    let builder = MessageAttributeValue::builder().data_type(value.data_type());
    let builder = match value {
        MessageAttribute::String(text) | MessageAttribute::Number(text) => {
            builder.string_value(text)
        }
        MessageAttribute::Binary(bytes) => builder.binary_value(Blob::new(bytes.clone())),
    };
    builder
        .build()
        .map_err(|error| invalid_request(format!("invalid message attribute: {error}")))
}

fn invalid_request(message: String) -> AwsError {
    AwsError::Transport {
        operation: "send_message_batch",
        message,
    }
}

fn received_message(message: Message) -> ReceivedMessage {
    let message_attributes: MessageAttributes = message
        .message_attributes()
        .map(|attributes| {
            attributes
                .iter()
                .map(|(name, value)| {
                    (
                        name.clone(),
                        attribute_from_parts(
                            value.data_type(),
                            value.string_value(),
                            value.binary_value().map(|blob| blob.as_ref()),
                        ),
                    )
                })
                .collect()
        })
        .unwrap_or_default();

    ReceivedMessage {
        message_id: message.message_id().map(str::to_string),
        body: message.body().unwrap_or_default().to_string(),
        receipt_handle: message.receipt_handle().unwrap_or_default().to_string(),
        message_attributes,
    }
}

/// Custom data types keep their base type as a prefix, e.g. `Number.float`.
fn attribute_from_parts(
    data_type: &str,
    string_value: Option<&str>,
    binary_value: Option<&[u8]>,
) -> MessageAttribute {
    if data_type.starts_with("Binary") {
        MessageAttribute::Binary(binary_value.unwrap_or_default().to_vec())
    } else if data_type.starts_with("Number") {
        MessageAttribute::Number(string_value.unwrap_or_default().to_string())
    } else {
        MessageAttribute::String(string_value.unwrap_or_default().to_string())
    }
}
