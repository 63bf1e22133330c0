use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use awsutils_aws::adapters::{S3ObjectStore, SqsQueueClient};
use awsutils_aws::config::ClientSettings;
use awsutils_aws::telemetry::init_tracing;
use awsutils_core::filesystem::{
    s3_bucket_access, s3_download, s3_key_access, s3_key_metadata, s3_move, s3_upload,
};
use awsutils_core::queue::{BatchEntry, MessageAttribute};
use awsutils_core::sqs::{del_message, get_msg, get_queue, purge_sqs, send_message};
use awsutils_core::{ObjectStore, QueueClient};
use clap::{Parser, Subcommand};
use serde::Serialize;

// ── CLI definition ─────────────────────────────────────────────────

#[derive(Parser)]
#[command(
    name = "awsutils",
    about = "Checked, retrying S3 and SQS operations",
    long_about = "Runs one awsutils helper against S3 or SQS.\n\
                  Region and endpoint come from AWSUTILS_REGION / AWSUTILS_ENDPOINT_URL,\n\
                  credentials from the AWS default provider chain."
)]
struct Cli {
    /// Log filter used when RUST_LOG is not set
    #[arg(long, env = "AWSUTILS_LOG", default_value = "info")]
    log_level: String,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check that a bucket is reachable
    BucketAccess { bucket: String },
    /// Check that a key exists and is reachable
    KeyAccess { bucket: String, key: String },
    /// Print the HEAD metadata of a key as JSON
    KeyMetadata { bucket: String, key: String },
    /// Download a key to a local file (retries local failures)
    Download {
        bucket: String,
        key: String,
        local_file: PathBuf,
    },
    /// Upload a local file to a key (retries local failures)
    Upload {
        local_file: PathBuf,
        bucket: String,
        key: String,
    },
    /// Upload a local copy to the target bucket, then delete the source key
    Move {
        #[arg(long)]
        source_bucket: String,
        #[arg(long)]
        target_bucket: String,
        #[arg(long)]
        source_key: String,
        /// Defaults to the source key
        #[arg(long)]
        target_key: Option<String>,
        #[arg(long)]
        local_file: PathBuf,
    },
    /// Print the URL of a queue
    QueueUrl { queue_name: String },
    /// Send one message
    Send {
        queue_url: String,
        body: String,
        /// String attribute as NAME=VALUE; repeatable
        #[arg(long = "attribute", value_parser = parse_attribute)]
        attributes: Vec<(String, String)>,
        #[arg(long, default_value = "1")]
        id: String,
    },
    /// Receive messages and print them as JSON
    Receive { queue_url: String },
    /// Delete a received message
    Delete {
        queue_url: String,
        receipt_handle: String,
    },
    /// Purge every message from a queue
    Purge { queue_url: String },
}

fn parse_attribute(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((name, value)) if !name.trim().is_empty() => {
            Ok((name.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected NAME=VALUE, got `{raw}`")),
    }
}

// ── Entry point ────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level)
        .with_context(|| format!("invalid log level filter: {}", cli.log_level))?;

    let settings = ClientSettings::from_env();
    let sdk_config = settings.load_sdk_config().await;
    let s3 = S3ObjectStore::new(settings.s3_client(&sdk_config));
    let sqs = SqsQueueClient::new(settings.sqs_client(&sdk_config));

    run(cli.command, &s3, &sqs)
}

fn run(command: Commands, s3: &dyn ObjectStore, sqs: &dyn QueueClient) -> Result<()> {
    match command {
        Commands::BucketAccess { bucket } => {
            s3_bucket_access(s3, &bucket)?;
            println!("bucket {bucket} is accessible");
        }
        Commands::KeyAccess { bucket, key } => {
            s3_key_access(s3, &bucket, &key)?;
            println!("key {key} is accessible");
        }
        Commands::KeyMetadata { bucket, key } => {
            print_json(&s3_key_metadata(s3, &bucket, &key)?)?;
        }
        Commands::Download {
            bucket,
            key,
            local_file,
        } => {
            s3_download(s3, &bucket, &key, &local_file)
                .with_context(|| format!("download of {key} from {bucket} failed"))?;
        }
        Commands::Upload {
            local_file,
            bucket,
            key,
        } => {
            s3_upload(s3, &bucket, &key, &local_file)
                .with_context(|| format!("upload of {} failed", local_file.display()))?;
        }
        Commands::Move {
            source_bucket,
            target_bucket,
            source_key,
            target_key,
            local_file,
        } => {
            let target_key = target_key.unwrap_or_else(|| source_key.clone());
            s3_move(
                s3,
                &source_bucket,
                &target_bucket,
                &source_key,
                &target_key,
                &local_file,
            )?;
        }
        Commands::QueueUrl { queue_name } => {
            println!("{}", get_queue(sqs, &queue_name)?);
        }
        Commands::Send {
            queue_url,
            body,
            attributes,
            id,
        } => {
            let entry = attributes
                .into_iter()
                .fold(BatchEntry::new(id, body), |entry, (name, value)| {
                    entry.with_attribute(name, MessageAttribute::String(value))
                });
            let response = send_message(sqs, &queue_url, &[entry])?;
            print_json(&response)?;
            if !response.failed.is_empty() {
                bail!("{} message(s) rejected", response.failed.len());
            }
        }
        Commands::Receive { queue_url } => {
            print_json(&get_msg(sqs, &queue_url)?)?;
        }
        Commands::Delete {
            queue_url,
            receipt_handle,
        } => {
            del_message(sqs, &queue_url, &receipt_handle)?;
        }
        Commands::Purge { queue_url } => match purge_sqs(sqs, &queue_url)? {
            Some(_) => println!("purged {queue_url}"),
            None => bail!("purge of {queue_url} was rejected"),
        },
    }

    Ok(())
}

fn print_json(value: &impl Serialize) -> Result<()> {
    let text = serde_json::to_string_pretty(value).context("failed to serialize output")?;
    println!("{text}");
    Ok(())
}
