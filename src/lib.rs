//! Exposure Engine Library
//!
//! Builds a human-readable exposure report for one AWS account: EC2
//! instances with their inbound security-group rules, plus managed database
//! instances discovered by a parallel multi-region scan.

pub mod identity;
pub mod inventory;
pub mod report;
pub mod scan;

pub use report::ExposureReport;
pub use scan::{ScanCoordinator, DEFAULT_REGIONS};
