use crate::models::{ArchiveClass, RelayOutcome, TransferEvent};
use crate::services::archive::ArchiveDestination;
use crate::services::scratch::ScratchFile;
use crate::services::skip_rules::SkipRules;
use crate::services::source::ObjectSource;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info, warn};

#[derive(Error, Debug)]
pub enum RelayError {
    #[error("Failed to create scratch file: {0}")]
    Scratch(#[source] io::Error),

    #[error("Error downloading {bucket}/{key} from source: {source:#}")]
    Download {
        bucket: String,
        key: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("Error uploading {key} to archive bucket {bucket}: {source:#}")]
    Upload {
        bucket: String,
        key: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("Failed to remove scratch file {}: {source}", .path.display())]
    Release {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Copies newly created source objects into cold storage.
///
/// Holds only read-only state, so one instance serves concurrent
/// invocations. Each invocation runs skip check, download, upload and
/// scratch release strictly in sequence.
pub struct RelayHandler {
    source: Arc<dyn ObjectSource>,
    archive: Arc<dyn ArchiveDestination>,
    skip_rules: SkipRules,
    storage_class: ArchiveClass,
    scratch_dir: Option<PathBuf>,
}

impl RelayHandler {
    pub fn new(
        source: Arc<dyn ObjectSource>,
        archive: Arc<dyn ArchiveDestination>,
        skip_rules: SkipRules,
        storage_class: ArchiveClass,
    ) -> Self {
        Self {
            source,
            archive,
            skip_rules,
            storage_class,
            scratch_dir: None,
        }
    }

    pub fn with_scratch_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.scratch_dir = dir;
        self
    }

    pub fn storage_class(&self) -> ArchiveClass {
        self.storage_class
    }

    pub fn destination_bucket(&self) -> &str {
        self.archive.bucket()
    }

    pub async fn handle(&self, event: &TransferEvent) -> Result<RelayOutcome, RelayError> {
        info!(
            bucket = %event.bucket,
            key = %event.name,
            "Processing file: {} from bucket: {}",
            event.name,
            event.bucket
        );

        if let Some(pattern) = self.skip_rules.matching(&event.name) {
            info!("⏭️  Skip pattern '{}' matches file '{}'. Skipping", pattern, event.name);
            return Ok(RelayOutcome::Skipped {
                key: event.name.clone(),
                pattern: pattern.to_string(),
            });
        }

        let scratch =
            ScratchFile::create(self.scratch_dir.as_deref()).map_err(RelayError::Scratch)?;

        let scratch_path = scratch.path().to_path_buf();
        let transferred = self.transfer(event, &scratch_path).await;

        match (scratch.release(), transferred) {
            (Ok(path), transferred) => {
                info!("🧹 Removed temporary file: {}", path.display());
                transferred
            }
            (Err(e), Ok(_)) => Err(RelayError::Release {
                path: scratch_path,
                source: e,
            }),
            (Err(e), Err(transfer_err)) => {
                warn!(
                    "Failed to remove temporary file {} after failed transfer: {}",
                    scratch_path.display(),
                    e
                );
                Err(transfer_err)
            }
        }
    }

    /// Log-and-stop composition of [`handle`](Self::handle): failures are
    /// logged and dropped, nothing is retried.
    pub async fn relay(&self, event: &TransferEvent) {
        match self.handle(event).await {
            Ok(RelayOutcome::Skipped { .. }) => {}
            Ok(RelayOutcome::Archived { key, bytes }) => {
                info!(key = %key, bytes, "✅ Relay complete");
            }
            Err(e) => {
                error!(bucket = %event.bucket, key = %event.name, "❌ {}", e);
            }
        }
    }

    async fn transfer(
        &self,
        event: &TransferEvent,
        scratch: &Path,
    ) -> Result<RelayOutcome, RelayError> {
        let bytes = self
            .source
            .download_to(&event.bucket, &event.name, scratch)
            .await
            .map_err(|source| RelayError::Download {
                bucket: event.bucket.clone(),
                key: event.name.clone(),
                source,
            })?;
        info!("📥 Downloaded file: {} ({} bytes) to temporary location", event.name, bytes);

        self.archive
            .upload_from(scratch, &event.name, self.storage_class)
            .await
            .map_err(|source| RelayError::Upload {
                bucket: self.archive.bucket().to_string(),
                key: event.name.clone(),
                source,
            })?;
        info!(
            "📤 Uploaded file: {} to S3 bucket: {} with {} storage class",
            event.name,
            self.archive.bucket(),
            self.storage_class
        );

        Ok(RelayOutcome::Archived {
            key: event.name.clone(),
            bytes,
        })
    }
}
