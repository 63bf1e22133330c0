//! Message-queue helpers for passing data between functions.
//!
//! Every helper takes the queue client as its first argument and checks the
//! HTTP status of the response before handing anything back.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::error::AwsError;
use crate::object_store::ResponseMetadata;
use crate::queue::{
    BatchEntry, MessageAttributes, QueueClient, ReceiveResponse, SendBatchResponse,
};

/// Message body that tells a consumer to stop; it carries no attributes.
pub const STOP_ACTION: &str = "STOP";

/// One received message after attribute parsing.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ProcessedMessage<A> {
    pub action: String,
    /// `None` for [`STOP_ACTION`] messages.
    pub attributes: Option<A>,
    pub receipt_handle: String,
}

/// Binary payloads come back from the queue base64 encoded; this turns them
/// back into bytes.
pub fn decode_b64(encoded: impl AsRef<[u8]>) -> Result<Vec<u8>, AwsError> {
    Ok(STANDARD.decode(encoded)?)
}

fn ensure_ok(operation: &'static str, metadata: &ResponseMetadata) -> Result<(), AwsError> {
    if metadata.is_ok() {
        Ok(())
    } else {
        Err(AwsError::HttpStatus {
            operation,
            status: metadata.http_status_code,
        })
    }
}

/// Looks up the URL of `queue_name`.
pub fn get_queue(sqs: &dyn QueueClient, queue_name: &str) -> Result<String, AwsError> {
    debug!(queue_name, "getting sqs url");

    let response = sqs.get_queue_url(queue_name).map_err(|err| {
        error!(queue_name, error = %err, "get_queue_url failed");
        AwsError::Client {
            operation: "get_queue_url",
            status: err.http_status(),
            code: err.code().map(str::to_string),
            message: format!("no sqs url: {err}"),
        }
    })?;
    debug!(queue_name, ?response, "queue url get response");

    ensure_ok("get_queue_url", &response.metadata)?;
    let url = response.queue_url.ok_or(AwsError::MissingField {
        operation: "get_queue_url",
        field: "QueueUrl",
    })?;

    info!(url = %url, "sqs url");
    Ok(url)
}

/// Puts messages on the queue with the batch API.
///
/// Fails unless the service answered 200 and accepted at least one entry.
pub fn send_message(
    sqs: &dyn QueueClient,
    url: &str,
    entries: &[BatchEntry],
) -> Result<SendBatchResponse, AwsError> {
    debug!(url, entries = entries.len(), "sending message to sqs");

    let response = sqs.send_message_batch(url, entries).map_err(|err| {
        error!(url, error = %err, "sqs send message failed");
        AwsError::client(
            "send_message_batch",
            err.http_status(),
            format!("sqs send message failure: {err}"),
        )
    })?;
    debug!(url, ?response, "send message response");

    ensure_ok("send_message_batch", &response.metadata)?;
    for failed in &response.failed {
        warn!(
            url,
            id = %failed.id,
            code = %failed.code,
            sender_fault = failed.sender_fault,
            "sqs rejected batch entry"
        );
    }
    if response.successful.is_empty() {
        return Err(AwsError::MissingField {
            operation: "send_message_batch",
            field: "Successful",
        });
    }

    Ok(response)
}

/// Receives from the queue, with all message attributes.
pub fn get_msg(sqs: &dyn QueueClient, url: &str) -> Result<ReceiveResponse, AwsError> {
    debug!(url, "getting message from sqs");

    let response = sqs.receive_message(url).map_err(|err| {
        error!(url, error = %err, "sqs message receive failed");
        err
    })?;
    debug!(url, ?response, "message RECEIVE response");

    if !response.metadata.is_ok() {
        error!(
            url,
            status = response.metadata.http_status_code,
            "message received HTTPStatus != 200"
        );
    }
    ensure_ok("receive_message", &response.metadata)?;

    Ok(response)
}

/// Receives messages and runs `parser` over the attributes of each one.
///
/// The parser is skipped for [`STOP_ACTION`] bodies. A response without a
/// message list fails with [`AwsError::NoMessages`].
pub fn process_msg<A>(
    sqs: &dyn QueueClient,
    url: &str,
    mut parser: impl FnMut(&MessageAttributes) -> A,
) -> Result<Vec<ProcessedMessage<A>>, AwsError> {
    let response = get_msg(sqs, url)?;
    let http_status = response.metadata.http_status_code;

    let Some(messages) = response.messages else {
        error!(url, "NO MESSAGE RETURNED");
        return Err(AwsError::NoMessages {
            url: url.to_string(),
        });
    };

    info!(url, count = messages.len(), "processing received sqs messages");
    let processed = messages
        .into_iter()
        .map(|message| {
            debug!(
                body = %message.body,
                receipt_handle = %message.receipt_handle,
                http_status,
                "received message"
            );
            let attributes = if message.body == STOP_ACTION {
                None
            } else {
                Some(parser(&message.message_attributes))
            };
            ProcessedMessage {
                action: message.body,
                attributes,
                receipt_handle: message.receipt_handle,
            }
        })
        .collect();

    Ok(processed)
}

/// Deletes the message identified by `receipt_handle`.
pub fn del_message(sqs: &dyn QueueClient, url: &str, receipt_handle: &str) -> Result<(), AwsError> {
    debug!(url, "deleting sqs message");

    let response = sqs.delete_message(url, receipt_handle)?;
    debug!(url, receipt_handle, ?response, "msg del response");

    if !response.is_ok() {
        error!(
            url,
            receipt_handle,
            status = response.http_status_code,
            "message delete HTTPStatus != 200"
        );
    }
    ensure_ok("delete_message", &response)?;

    debug!(url, receipt_handle, "MSG DELETED SUCCESSFULLY");
    Ok(())
}

/// Purges the whole queue. The service allows one purge every 60 seconds.
///
/// A rejected purge is logged and reported as `Ok(None)`; only a non-200
/// response or a transport failure is an error.
pub fn purge_sqs(sqs: &dyn QueueClient, url: &str) -> Result<Option<ResponseMetadata>, AwsError> {
    debug!(url, "purging the whole sqs queue");

    let response = match sqs.purge_queue(url) {
        Ok(response) => response,
        Err(err) if err.is_client() => {
            error!(url, error = %err, "sqs purge failed");
            return Ok(None);
        }
        Err(err) => return Err(err),
    };

    ensure_ok("purge_queue", &response)?;
    debug!(url, ?response, "queue purge response");
    Ok(Some(response))
}
