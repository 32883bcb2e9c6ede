//! Client seam for the region scan.
//!
//! `RegionClientFactory` and `DatabaseClient` isolate scan policy from the
//! AWS SDK so the coordinator can be tested against synthetic regions. The
//! production implementations wrap `aws-sdk-rds` with a region-scoped config.

use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_rds::error::ProvideErrorMetadata;
use aws_sdk_rds::types::DbInstance;

use super::types::{ClientError, DatabaseRecord, ScanError};

/// A database client bound to exactly one region.
#[async_trait]
pub trait DatabaseClient: Send + Sync {
    /// Issue the single "list managed databases" query for this client's region.
    async fn list_managed_databases(&self) -> Result<Vec<DatabaseRecord>, ClientError>;
}

/// Produces region-scoped clients for scanner workers.
#[async_trait]
pub trait RegionClientFactory: Send + Sync {
    async fn client_for(&self, region: &str) -> Result<Box<dyn DatabaseClient>, ScanError>;
}

/// Factory backed by the default AWS credential chain.
#[derive(Debug, Default)]
pub struct AwsClientFactory;

#[async_trait]
impl RegionClientFactory for AwsClientFactory {
    async fn client_for(&self, region: &str) -> Result<Box<dyn DatabaseClient>, ScanError> {
        let config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(region.to_string()))
            .load()
            .await;

        Ok(Box::new(AwsDatabaseClient {
            client: aws_sdk_rds::Client::new(&config),
        }))
    }
}

/// RDS-backed client for one region.
struct AwsDatabaseClient {
    client: aws_sdk_rds::Client,
}

#[async_trait]
impl DatabaseClient for AwsDatabaseClient {
    async fn list_managed_databases(&self) -> Result<Vec<DatabaseRecord>, ClientError> {
        let output = self
            .client
            .describe_db_instances()
            .send()
            .await
            .map_err(|err| {
                if is_access_denied(err.code()) {
                    ClientError::AccessDenied
                } else {
                    ClientError::Other(anyhow::Error::new(err))
                }
            })?;

        Ok(output
            .db_instances()
            .iter()
            .map(record_from_db_instance)
            .collect())
    }
}

/// Classify an API error code as an authorization failure.
///
/// Matching is on the structured error code, not the rendered message.
/// EC2-style actions report `UnauthorizedOperation`; most other services use
/// `AccessDenied` or `AccessDeniedException`.
fn is_access_denied(code: Option<&str>) -> bool {
    matches!(
        code,
        Some("AccessDenied") | Some("AccessDeniedException") | Some("UnauthorizedOperation")
    )
}

/// Map one RDS instance description into the record the report consumes.
fn record_from_db_instance(db: &DbInstance) -> DatabaseRecord {
    DatabaseRecord {
        instance_id: db.db_instance_identifier().unwrap_or_default().to_string(),
        db_name: db.db_name().map(str::to_string),
        engine: db.engine().map(str::to_string),
        status: db.db_instance_status().map(str::to_string),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_access_denied_code_classification() {
        assert!(is_access_denied(Some("AccessDenied")));
        assert!(is_access_denied(Some("AccessDeniedException")));
        assert!(is_access_denied(Some("UnauthorizedOperation")));

        assert!(!is_access_denied(Some("Throttling")));
        assert!(!is_access_denied(Some("InternalFailure")));
        assert!(!is_access_denied(None));
    }

    #[test]
    fn test_record_mapping_full() {
        let db = DbInstance::builder()
            .db_instance_identifier("orders-primary")
            .db_name("orders")
            .engine("postgres")
            .db_instance_status("available")
            .build();

        let record = record_from_db_instance(&db);
        assert_eq!(record.instance_id, "orders-primary");
        assert_eq!(record.db_name.as_deref(), Some("orders"));
        assert_eq!(record.engine.as_deref(), Some("postgres"));
        assert_eq!(record.status.as_deref(), Some("available"));
    }

    #[test]
    fn test_record_mapping_identifier_only() {
        let db = DbInstance::builder()
            .db_instance_identifier("bare-instance")
            .build();

        let record = record_from_db_instance(&db);
        assert_eq!(record.instance_id, "bare-instance");
        assert_eq!(record.db_name, None);
        assert_eq!(record.engine, None);
        assert_eq!(record.status, None);
    }
}
