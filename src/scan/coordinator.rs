//! Scan Coordinator and Region Scanner.
//!
//! The coordinator fans out one worker task per region and joins them all
//! before returning. Workers share a single mutex-guarded aggregate; the
//! lock is held only for the insertion, never across network I/O.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{error, info, warn};
use uuid::Uuid;

use super::client::RegionClientFactory;
use super::types::{ClientError, DatabaseRecord, RegionScanResult, ScanError};

/// Scan one region: obtain a region-scoped client, issue the list query,
/// and classify the outcome.
///
/// Access denial is not an error here: the region appears in the aggregate
/// with zero records, indistinguishable from a genuinely empty region.
pub async fn scan_region(
    factory: &dyn RegionClientFactory,
    region: &str,
) -> Result<Vec<DatabaseRecord>, ScanError> {
    info!(region, "Scanning region for managed databases");

    let client = factory.client_for(region).await?;

    match client.list_managed_databases().await {
        Ok(records) => {
            info!(region, count = records.len(), "Region scan complete");
            Ok(records)
        }
        Err(ClientError::AccessDenied) => {
            warn!(region, "Access denied for database listing, skipping");
            Ok(Vec::new())
        }
        Err(ClientError::Other(source)) => Err(ScanError::Query {
            region: region.to_string(),
            source,
        }),
    }
}

/// Fans one scanner task out per region and aggregates their results.
pub struct ScanCoordinator {
    factory: Arc<dyn RegionClientFactory>,
    regions: Vec<String>,
}

impl ScanCoordinator {
    /// Create a coordinator over an explicit region list.
    pub fn new(factory: Arc<dyn RegionClientFactory>, regions: Vec<String>) -> Self {
        Self { factory, regions }
    }

    /// Scan every region concurrently and return the aggregate.
    ///
    /// Blocks until every worker has finished; there is no deadline.
    /// Regions that failed with anything other than access denial are absent
    /// from the returned map; the failure is logged and never affects other
    /// regions.
    pub async fn scan_all_regions(&self) -> RegionScanResult {
        let scan_id = Uuid::new_v4();
        info!(
            %scan_id,
            regions = self.regions.len(),
            "Starting multi-region database scan"
        );

        let results: Arc<Mutex<RegionScanResult>> = Arc::new(Mutex::new(HashMap::new()));

        let mut workers = Vec::with_capacity(self.regions.len());
        for region in &self.regions {
            let factory = Arc::clone(&self.factory);
            let results = Arc::clone(&results);
            let region = region.clone();

            workers.push(tokio::spawn(async move {
                match scan_region(factory.as_ref(), &region).await {
                    Ok(records) => {
                        results.lock().await.insert(region, records);
                    }
                    Err(err) => {
                        error!(
                            region = err.region(),
                            error = %err,
                            "Region scan failed, dropping region from report"
                        );
                    }
                }
            }));
        }

        for joined in futures::future::join_all(workers).await {
            if let Err(err) = joined {
                error!(error = %err, "Scanner task panicked");
            }
        }

        let aggregate = std::mem::take(&mut *results.lock().await);
        info!(
            %scan_id,
            regions_reported = aggregate.len(),
            "Multi-region scan complete"
        );
        aggregate
    }
}
