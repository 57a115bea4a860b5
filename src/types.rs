//! Core types shared across the store, checker, and API layers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

/// Availability status of a single probed link.
///
/// Every probe resolves to exactly one of these; there is no "unknown"
/// state. The wire and snapshot representations are `"available"` and
/// `"not available"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum LinkStatus {
    /// The link responded with a success or redirect status code (200-399)
    #[serde(rename = "available")]
    Available,
    /// The link could not be parsed, reached, or responded outside 200-399
    #[serde(rename = "not available")]
    Unavailable,
}

impl fmt::Display for LinkStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinkStatus::Available => write!(f, "available"),
            LinkStatus::Unavailable => write!(f, "not available"),
        }
    }
}

/// One probed link: the URL exactly as submitted plus its status.
///
/// Identity within a batch is positional; element `i` of a batch always
/// corresponds to the `i`-th submitted URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct LinkInfo {
    /// The URL as submitted (not the reconstructed form that was probed)
    pub url: String,
    /// Probe outcome
    pub status: LinkStatus,
}

impl LinkInfo {
    /// Create a new `LinkInfo`
    pub fn new(url: impl Into<String>, status: LinkStatus) -> Self {
        Self {
            url: url.into(),
            status,
        }
    }
}

/// Identifier of a stored batch.
///
/// Ids are issued strictly increasing for the lifetime of a store and are
/// never reused, even across snapshot restore. Serialized as a plain
/// integer (and as a decimal string when used as a JSON object key in
/// snapshots).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema,
)]
pub struct BatchId(pub u64);

impl fmt::Display for BatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A stored batch: the probed links in submission order plus the instant
/// after which the batch is considered stale.
///
/// This is also the snapshot record format: `data` + RFC3339 `expires_at`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Batch {
    /// Probe results in submission order
    pub data: Vec<LinkInfo>,
    /// Instant after which the batch is stale and eligible for re-probing
    pub expires_at: DateTime<Utc>,
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_link_status_wire_format() {
        let available = serde_json::to_string(&LinkStatus::Available).unwrap();
        assert_eq!(available, r#""available""#);

        let unavailable = serde_json::to_string(&LinkStatus::Unavailable).unwrap();
        assert_eq!(unavailable, r#""not available""#);

        let parsed: LinkStatus = serde_json::from_str(r#""not available""#).unwrap();
        assert_eq!(parsed, LinkStatus::Unavailable);
    }

    #[test]
    fn test_link_info_serialization() {
        let info = LinkInfo::new("example.com", LinkStatus::Available);
        let json = serde_json::to_value(&info).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"url": "example.com", "status": "available"})
        );
    }

    #[test]
    fn test_batch_id_display() {
        assert_eq!(BatchId(42).to_string(), "42");
    }
}
