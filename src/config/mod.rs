use crate::models::ArchiveClass;
use std::env;
use std::fmt;
use std::path::PathBuf;

pub const DEFAULT_GCS_ENDPOINT: &str = "https://storage.googleapis.com";

/// Key prefixes that are never archived.
pub const DEFAULT_SKIP_PATTERNS: &[&str] = &[
    "^pub/firefox/nightly/partials",
    "^pub/thunderbird/nightly/partials",
    "^to-be-deleted",
];

/// Runtime configuration for the relay
#[derive(Clone)]
pub struct RelayConfig {
    /// Destination S3 bucket (S3_BUCKET_NAME)
    pub destination_bucket: String,

    /// Destination credentials (AWS_ACCESS_KEY_ID / AWS_SECRET_ACCESS_KEY)
    pub aws_access_key_id: String,
    pub aws_secret_access_key: String,

    /// Destination region (default: "us-east-1")
    pub aws_region: String,

    /// S3-compatible endpoint override
    pub s3_endpoint: Option<String>,

    /// Storage class attached to every upload (default: DEEP_ARCHIVE)
    pub storage_class: ArchiveClass,

    /// Source JSON API endpoint (default: https://storage.googleapis.com)
    pub gcs_endpoint: String,

    /// Static bearer token for the source; application default credentials are
    /// used when unset
    pub gcs_access_token: Option<String>,

    /// Send source requests without credentials (emulators, public buckets)
    pub gcs_anonymous: bool,

    /// Directory for scratch files; system temp dir when unset
    pub scratch_dir: Option<PathBuf>,

    pub skip_patterns: Vec<String>,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            destination_bucket: String::new(),
            aws_access_key_id: String::new(),
            aws_secret_access_key: String::new(),
            aws_region: "us-east-1".to_string(),
            s3_endpoint: None,
            storage_class: ArchiveClass::DeepArchive,
            gcs_endpoint: DEFAULT_GCS_ENDPOINT.to_string(),
            gcs_access_token: None,
            gcs_anonymous: false,
            scratch_dir: None,
            skip_patterns: DEFAULT_SKIP_PATTERNS.iter().map(|p| p.to_string()).collect(),
        }
    }
}

impl RelayConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let default = Self::default();

        Self {
            destination_bucket: env::var("S3_BUCKET_NAME").unwrap_or(default.destination_bucket),

            aws_access_key_id: env::var("AWS_ACCESS_KEY_ID").unwrap_or(default.aws_access_key_id),
            aws_secret_access_key: env::var("AWS_SECRET_ACCESS_KEY")
                .unwrap_or(default.aws_secret_access_key),

            aws_region: env::var("AWS_REGION")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(default.aws_region),

            s3_endpoint: env::var("S3_ENDPOINT").ok().filter(|v| !v.trim().is_empty()),

            storage_class: match env::var("S3_STORAGE_CLASS") {
                Ok(v) => v.parse().unwrap_or_else(|e| {
                    tracing::warn!("{}; falling back to {}", e, default.storage_class);
                    default.storage_class
                }),
                Err(_) => default.storage_class,
            },

            gcs_endpoint: env::var("GCS_ENDPOINT")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .map(|v| v.trim_end_matches('/').to_string())
                .unwrap_or(default.gcs_endpoint),

            gcs_access_token: env::var("GCS_ACCESS_TOKEN").ok().filter(|v| !v.is_empty()),

            gcs_anonymous: env::var("GCS_ANONYMOUS")
                .map(|v| v.to_lowercase() == "true" || v == "1")
                .unwrap_or(default.gcs_anonymous),

            scratch_dir: env::var("SCRATCH_DIR")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from),

            skip_patterns: default.skip_patterns,
        }
    }
}

/// LOG_FORMAT=json selects JSON log lines. Read on its own so logging can be
/// set up before the rest of the configuration is parsed.
pub fn json_logs_from_env() -> bool {
    env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false)
}

impl fmt::Debug for RelayConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RelayConfig")
            .field("destination_bucket", &self.destination_bucket)
            .field("aws_access_key_id", &self.aws_access_key_id)
            .field("aws_secret_access_key", &"<redacted>")
            .field("aws_region", &self.aws_region)
            .field("s3_endpoint", &self.s3_endpoint)
            .field("storage_class", &self.storage_class)
            .field("gcs_endpoint", &self.gcs_endpoint)
            .field("gcs_access_token", &self.gcs_access_token.as_ref().map(|_| "<redacted>"))
            .field("gcs_anonymous", &self.gcs_anonymous)
            .field("scratch_dir", &self.scratch_dir)
            .field("skip_patterns", &self.skip_patterns)
            .finish()
    }
}
