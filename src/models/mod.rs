use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Object-creation notification delivered by the source bucket.
///
/// Only `bucket` and `name` are read; the rest of the storage-object payload
/// is ignored. Missing fields become empty strings and surface later as a
/// lookup failure at the source provider.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TransferEvent {
    #[serde(default)]
    pub bucket: String,
    #[serde(default)]
    pub name: String,
}

impl TransferEvent {
    pub fn new(bucket: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            name: name.into(),
        }
    }
}

/// Archival S3 storage classes. Objects in these tiers need a restore
/// before they can be read again, so instant-retrieval tiers are excluded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ArchiveClass {
    #[default]
    DeepArchive,
    /// Glacier Flexible Retrieval; the S3 API still calls it `GLACIER`.
    Glacier,
}

impl ArchiveClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            ArchiveClass::DeepArchive => "DEEP_ARCHIVE",
            ArchiveClass::Glacier => "GLACIER",
        }
    }
}

impl fmt::Display for ArchiveClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ArchiveClass {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "DEEP_ARCHIVE" => Ok(ArchiveClass::DeepArchive),
            "GLACIER" | "GLACIER_FLEXIBLE_RETRIEVAL" => Ok(ArchiveClass::Glacier),
            other => Err(format!("'{}' is not an archival storage class", other)),
        }
    }
}

/// How a relay invocation ended when nothing went wrong.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelayOutcome {
    Skipped { key: String, pattern: String },
    Archived { key: String, bytes: u64 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_ignores_extra_fields() {
        let payload = r#"{
            "kind": "storage#object",
            "bucket": "source-bucket",
            "name": "releases/v1/build.zip",
            "size": "1024",
            "contentType": "application/zip"
        }"#;
        let event: TransferEvent = serde_json::from_str(payload).unwrap();
        assert_eq!(event, TransferEvent::new("source-bucket", "releases/v1/build.zip"));
    }

    #[test]
    fn test_event_missing_fields_are_empty() {
        let event: TransferEvent = serde_json::from_str("{}").unwrap();
        assert!(event.bucket.is_empty());
        assert!(event.name.is_empty());
    }

    #[test]
    fn test_archive_class_parsing() {
        assert_eq!("deep_archive".parse::<ArchiveClass>().unwrap(), ArchiveClass::DeepArchive);
        assert_eq!("GLACIER".parse::<ArchiveClass>().unwrap(), ArchiveClass::Glacier);
        assert_eq!(
            " glacier_flexible_retrieval ".parse::<ArchiveClass>().unwrap(),
            ArchiveClass::Glacier
        );
        assert!("STANDARD".parse::<ArchiveClass>().is_err());
        assert!("GLACIER_IR".parse::<ArchiveClass>().is_err());
        assert!("INTELLIGENT_TIERING".parse::<ArchiveClass>().is_err());
    }

    #[test]
    fn test_flexible_retrieval_alias_uses_api_name() {
        let class: ArchiveClass = "GLACIER_FLEXIBLE_RETRIEVAL".parse().unwrap();
        assert_eq!(class.as_str(), "GLACIER");
    }

    #[test]
    fn test_default_archive_class_is_deep_archive() {
        assert_eq!(ArchiveClass::default().as_str(), "DEEP_ARCHIVE");
    }
}
