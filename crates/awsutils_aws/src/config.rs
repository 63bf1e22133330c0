use aws_config::{BehaviorVersion, SdkConfig};
use aws_sdk_s3::config::Region;
use tracing::info;

/// Overrides the region resolved by the SDK default provider chain.
pub const REGION_ENV: &str = "AWSUTILS_REGION";
/// Custom endpoint for S3/SQS-compatible services (LocalStack, MinIO).
pub const ENDPOINT_URL_ENV: &str = "AWSUTILS_ENDPOINT_URL";

/// Client settings read from the environment. Credentials always come from
/// the SDK default provider chain.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientSettings {
    pub region: Option<String>,
    pub endpoint_url: Option<String>,
}

impl ClientSettings {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Blank values are treated as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        Self {
            region: non_empty(REGION_ENV),
            endpoint_url: non_empty(ENDPOINT_URL_ENV),
        }
    }

    pub async fn load_sdk_config(&self) -> SdkConfig {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let Some(region) = &self.region {
            loader = loader.region(Region::new(region.clone()));
        }
        if let Some(endpoint_url) = &self.endpoint_url {
            loader = loader.endpoint_url(endpoint_url);
        }
        let sdk_config = loader.load().await;
        info!(
            region = ?sdk_config.region().map(ToString::to_string),
            endpoint_url = ?self.endpoint_url,
            "aws sdk config loaded"
        );
        sdk_config
    }

    /// S3 client; custom endpoints get path-style addressing.
    pub fn s3_client(&self, sdk_config: &SdkConfig) -> aws_sdk_s3::Client {
        let mut builder = aws_sdk_s3::config::Builder::from(sdk_config);
        if self.endpoint_url.is_some() {
            builder = builder.force_path_style(true);
        }
        aws_sdk_s3::Client::from_conf(builder.build())
    }

    pub fn sqs_client(&self, sdk_config: &SdkConfig) -> aws_sdk_sqs::Client {
        aws_sdk_sqs::Client::new(sdk_config)
    }
}
