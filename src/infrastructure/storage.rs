use crate::config::RelayConfig;
use crate::services::archive::{ArchiveDestination, S3ArchiveDestination};
use crate::services::source::{GcsAuth, GcsSource, ObjectSource};
use aws_sdk_s3::config::Region;
use std::sync::Arc;
use tracing::{info, warn};

pub async fn setup_archive(config: &RelayConfig) -> Arc<dyn ArchiveDestination> {
    if config.destination_bucket.is_empty() {
        warn!("⚠️  S3_BUCKET_NAME is not set; uploads will fail");
    }

    info!(
        "🧊 Archive: s3://{} (Region: {}, Class: {})",
        config.destination_bucket, config.aws_region, config.storage_class
    );

    let mut loader = aws_config::from_env()
        .region(Region::new(config.aws_region.clone()))
        .credentials_provider(aws_sdk_s3::config::Credentials::new(
            config.aws_access_key_id.clone(),
            config.aws_secret_access_key.clone(),
            None,
            None,
            "static",
        ));

    if let Some(endpoint_url) = &config.s3_endpoint {
        info!("☁️  S3 endpoint override: {}", endpoint_url);
        loader = loader.endpoint_url(endpoint_url);
    }

    let aws_config = loader.load().await;

    let s3_config = aws_sdk_s3::config::Builder::from(&aws_config)
        .force_path_style(config.s3_endpoint.is_some())
        .build();

    let s3_client = aws_sdk_s3::Client::from_conf(s3_config);
    Arc::new(S3ArchiveDestination::new(
        s3_client,
        config.destination_bucket.clone(),
    ))
}

/// Pick source credentials: an explicit token, then anonymous access, then
/// application default credentials.
pub async fn source_auth(config: &RelayConfig) -> GcsAuth {
    match (&config.gcs_access_token, config.gcs_anonymous) {
        (Some(token), _) => GcsAuth::Static(token.clone()),
        (None, true) => GcsAuth::Anonymous,
        (None, false) => GcsAuth::application_default().await,
    }
}

pub async fn setup_source(config: &RelayConfig) -> anyhow::Result<Arc<dyn ObjectSource>> {
    let auth = source_auth(config).await;

    info!(
        "🪣 Source: {} (Auth: {})",
        config.gcs_endpoint,
        auth.describe()
    );

    let http = reqwest::Client::builder()
        .user_agent(concat!("archive-relay/", env!("CARGO_PKG_VERSION")))
        .build()?;

    Ok(Arc::new(GcsSource::new(http, config.gcs_endpoint.clone(), auth)))
}
