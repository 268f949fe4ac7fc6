use crate::models::ArchiveClass;
use anyhow::{Context, Result};
use async_trait::async_trait;
use aws_sdk_s3::Client;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::StorageClass;
use std::path::Path;

/// Write side of the relay: places a local file in cold storage.
#[async_trait]
pub trait ArchiveDestination: Send + Sync {
    fn bucket(&self) -> &str;

    /// Upload the contents of `path` under `key` with storage class `class`.
    async fn upload_from(&self, path: &Path, key: &str, class: ArchiveClass) -> Result<()>;
}

pub struct S3ArchiveDestination {
    client: Client,
    bucket: String,
}

impl S3ArchiveDestination {
    pub fn new(client: Client, bucket: String) -> Self {
        Self { client, bucket }
    }
}

#[async_trait]
impl ArchiveDestination for S3ArchiveDestination {
    fn bucket(&self) -> &str {
        &self.bucket
    }

    async fn upload_from(&self, path: &Path, key: &str, class: ArchiveClass) -> Result<()> {
        let body = ByteStream::from_path(path)
            .await
            .with_context(|| format!("Failed to read scratch file {}", path.display()))?;

        let res = self
            .client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .storage_class(StorageClass::from(class.as_str()))
            .body(body)
            .send()
            .await;

        if let Err(e) = res {
            tracing::error!(
                "S3 put_object failed: dest={}/{}, storage_class={}, error={:?}",
                self.bucket,
                key,
                class,
                e
            );
            return Err(e.into());
        }
        Ok(())
    }
}
