//! Multi-Region Database Scan
//!
//! Fan-out/fan-in scan for managed database instances across a set of AWS
//! regions: one worker task per region, a strict join, and a single shared
//! aggregate keyed by region. Per-region failures never abort the scan as a
//! whole.

mod client;
mod coordinator;
mod types;

pub use client::{AwsClientFactory, DatabaseClient, RegionClientFactory};
pub use coordinator::{scan_region, ScanCoordinator};
pub use types::{ClientError, DatabaseRecord, RegionScanResult, ScanError, DEFAULT_REGIONS};
