//! Types for the multi-region database scan.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Regions scanned when no override is given on the command line.
pub const DEFAULT_REGIONS: &[&str] = &[
    "us-east-1",
    "us-east-2",
    "us-west-1",
    "us-west-2",
    "eu-west-1",
    "eu-central-1",
    "ap-northeast-1",
    "ap-southeast-1",
];

/// One managed database instance, as reported by a single region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseRecord {
    /// Instance identifier (always present).
    pub instance_id: String,
    /// Database name, if one was created on the instance.
    pub db_name: Option<String>,
    /// Engine (e.g. "postgres", "mysql").
    pub engine: Option<String>,
    /// Lifecycle status (e.g. "available").
    pub status: Option<String>,
}

/// Aggregate scan outcome: one entry per region that answered (or was
/// denied), each holding records in the order the API returned them.
///
/// A region absent from the map failed with something other than access
/// denial and was dropped by the coordinator.
pub type RegionScanResult = HashMap<String, Vec<DatabaseRecord>>;

/// Failure of a single region's scan.
///
/// Never aborts the whole scan; the coordinator logs it and omits the region
/// from the aggregate.
#[derive(Debug, Error)]
pub enum ScanError {
    /// Region-scoped credentials or configuration could not be resolved.
    #[error("failed to configure access for region {region}: {message}")]
    Config { region: String, message: String },

    /// The list query failed for a reason other than access denial.
    #[error("database query failed in region {region}: {source}")]
    Query {
        region: String,
        #[source]
        source: anyhow::Error,
    },
}

impl ScanError {
    /// Region this failure is tagged with.
    pub fn region(&self) -> &str {
        match self {
            ScanError::Config { region, .. } | ScanError::Query { region, .. } => region,
        }
    }
}

/// Failure at the client seam, before scan policy is applied.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The account is not authorized to list databases in this region.
    #[error("access denied")]
    AccessDenied,

    /// Anything else: throttling, networking, malformed responses.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_error_region_tag() {
        let config = ScanError::Config {
            region: "us-east-1".to_string(),
            message: "no credentials".to_string(),
        };
        assert_eq!(config.region(), "us-east-1");

        let query = ScanError::Query {
            region: "eu-west-1".to_string(),
            source: anyhow::anyhow!("throttled"),
        };
        assert_eq!(query.region(), "eu-west-1");
        assert!(query.to_string().contains("eu-west-1"));
    }

    #[test]
    fn test_default_regions_are_unique() {
        let mut sorted = DEFAULT_REGIONS.to_vec();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted.len(), DEFAULT_REGIONS.len());
    }
}
