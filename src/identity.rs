//! Caller identity resolution via STS.

use anyhow::{Context, Result};
use aws_config::SdkConfig;
use tracing::info;

/// Resolve the account id the configured credentials belong to.
///
/// Failure here means the credentials are unusable, which is fatal to the
/// whole run.
pub async fn caller_account(config: &SdkConfig) -> Result<String> {
    let client = aws_sdk_sts::Client::new(config);

    let identity = client
        .get_caller_identity()
        .send()
        .await
        .context("failed to resolve caller identity")?;

    let account = identity
        .account()
        .context("caller identity response carried no account id")?
        .to_string();

    info!(account = %account, "Resolved AWS account");
    Ok(account)
}
