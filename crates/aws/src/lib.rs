//! AWS backends for the civic assistant.
//!
//! - [`DynamoDbStore`]: `civic_store::KvStore` over one DynamoDB table
//! - [`TextractAnalyzer`]: `civic_forms::DocumentAnalyzer` using asynchronous
//!   Textract form analysis
//!
//! Both take an `aws_config::SdkConfig` so credentials, retries and the HTTP client
//! come from the standard provider chain:
//!
//! ```no_run
//! use aws_config::BehaviorVersion;
//! use civic_aws::{DynamoDbConfig, DynamoDbStore};
//!
//! # async fn example() -> civic_aws::Result<()> {
//! let sdk_config = aws_config::load_defaults(BehaviorVersion::latest()).await;
//! let store = DynamoDbStore::new(&sdk_config, DynamoDbConfig::new("civic-table"))?;
//! # Ok(())
//! # }
//! ```

mod dynamodb;
mod error;
mod textract;

pub use dynamodb::{DynamoDbConfig, DynamoDbStore, ATTR_DATA, ATTR_PK, ATTR_SK};
pub use error::{AwsError, Result};
pub use textract::{TextractAnalyzer, TextractConfig};

/// Load the shared SDK configuration from the default provider chain.
pub async fn load_sdk_config(region: Option<&str>) -> aws_config::SdkConfig {
    let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest());
    if let Some(region) = region {
        loader = loader.region(aws_config::Region::new(region.to_string()));
    }
    loader.load().await
}
