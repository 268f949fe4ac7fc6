use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use gcp_auth::TokenProvider;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use std::path::Path;
use std::sync::Arc;
use tokio::io::AsyncWriteExt;

/// Scope requested from application default credentials.
pub const READ_ONLY_SCOPE: &str = "https://www.googleapis.com/auth/devstorage.read_only";

/// Object names go into a single path segment, so `/` must be escaped too.
const OBJECT_NAME: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Read side of the relay: materializes a whole object on local disk.
#[async_trait]
pub trait ObjectSource: Send + Sync {
    /// Write the full contents of `bucket/key` to `dest`, returning the
    /// number of bytes written.
    async fn download_to(&self, bucket: &str, key: &str, dest: &Path) -> Result<u64>;
}

#[derive(Clone)]
pub enum GcsAuth {
    Static(String),
    /// Service-account key file, gcloud user credentials or the metadata
    /// server, whichever `gcp_auth` finds first. Tokens are cached and
    /// refreshed by the provider.
    ApplicationDefault(Arc<dyn TokenProvider>),
    /// No application default credentials could be found at startup. Every
    /// download fails with the recorded reason.
    Unavailable(String),
    Anonymous,
}

impl GcsAuth {
    /// Resolve application default credentials. A failure is kept rather
    /// than returned so the service still starts and each event reports it.
    pub async fn application_default() -> Self {
        match gcp_auth::provider().await {
            Ok(provider) => GcsAuth::ApplicationDefault(provider),
            Err(e) => {
                tracing::warn!("No Google application default credentials: {}", e);
                GcsAuth::Unavailable(e.to_string())
            }
        }
    }

    pub fn describe(&self) -> &'static str {
        match self {
            GcsAuth::Static(_) => "static token",
            GcsAuth::ApplicationDefault(_) => "application default credentials",
            GcsAuth::Unavailable(_) => "unavailable",
            GcsAuth::Anonymous => "anonymous",
        }
    }
}

/// Google Cloud Storage over the JSON API.
pub struct GcsSource {
    http: reqwest::Client,
    endpoint: String,
    auth: GcsAuth,
}

impl GcsSource {
    pub fn new(http: reqwest::Client, endpoint: impl Into<String>, auth: GcsAuth) -> Self {
        Self {
            http,
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            auth,
        }
    }

    pub fn media_url(&self, bucket: &str, key: &str) -> String {
        format!(
            "{}/storage/v1/b/{}/o/{}?alt=media",
            self.endpoint,
            utf8_percent_encode(bucket, OBJECT_NAME),
            utf8_percent_encode(key, OBJECT_NAME)
        )
    }

    async fn bearer_token(&self) -> Result<Option<String>> {
        match &self.auth {
            GcsAuth::Static(token) => Ok(Some(token.clone())),
            GcsAuth::Anonymous => Ok(None),
            GcsAuth::ApplicationDefault(provider) => {
                let token = provider
                    .token(&[READ_ONLY_SCOPE])
                    .await
                    .context("Failed to obtain GCS access token")?;
                Ok(Some(token.as_str().to_string()))
            }
            GcsAuth::Unavailable(reason) => Err(anyhow!(
                "No Google application default credentials: {}",
                reason
            )),
        }
    }
}

#[async_trait]
impl ObjectSource for GcsSource {
    async fn download_to(&self, bucket: &str, key: &str, dest: &Path) -> Result<u64> {
        let mut req = self.http.get(self.media_url(bucket, key));
        if let Some(token) = self.bearer_token().await? {
            req = req.bearer_auth(token);
        }

        let mut res = req.send().await?;
        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            return Err(anyhow!(
                "GCS get {}/{} failed with {}: {}",
                bucket,
                key,
                status,
                body.trim()
            ));
        }

        let mut file = tokio::fs::File::create(dest)
            .await
            .with_context(|| format!("Failed to open scratch file {}", dest.display()))?;

        let mut written = 0u64;
        while let Some(chunk) = res.chunk().await? {
            file.write_all(&chunk).await?;
            written += chunk.len() as u64;
        }
        file.flush().await?;

        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_media_url_escapes_object_name() {
        let source = GcsSource::new(
            reqwest::Client::new(),
            "https://storage.googleapis.com/",
            GcsAuth::Anonymous,
        );
        assert_eq!(
            source.media_url("my-bucket", "pub/firefox/a b+c.tar"),
            "https://storage.googleapis.com/storage/v1/b/my-bucket/o/pub%2Ffirefox%2Fa%20b%2Bc.tar?alt=media"
        );
    }
}
