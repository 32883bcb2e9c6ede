//! Compute Instance Inventory
//!
//! Fetches EC2 instances in the base region together with the inbound rules
//! of their attached security groups. Single-region, one pass; a failure
//! here is fatal to the run.

mod types;

pub use types::{InstanceExposure, PortExposure, SecurityGroupExposure};

use std::collections::HashMap;

use anyhow::{Context, Result};
use aws_config::SdkConfig;
use aws_sdk_ec2::types::{Instance, SecurityGroup, Tag};
use tracing::info;

/// Builds the compute-instance half of the exposure report.
pub struct InventoryBuilder {
    client: aws_sdk_ec2::Client,
}

impl InventoryBuilder {
    pub fn new(config: &SdkConfig) -> Self {
        Self {
            client: aws_sdk_ec2::Client::new(config),
        }
    }

    /// Describe every instance and resolve its security-group rules.
    pub async fn build(&self) -> Result<Vec<InstanceExposure>> {
        let described = self
            .client
            .describe_instances()
            .send()
            .await
            .context("failed to describe instances")?;

        let instances: Vec<&Instance> = described
            .reservations()
            .iter()
            .flat_map(|reservation| reservation.instances())
            .collect();

        let group_ids: Vec<String> = instances
            .iter()
            .flat_map(|instance| instance.security_groups())
            .filter_map(|group| group.group_id().map(str::to_string))
            .collect();

        let groups = self.security_group_details(group_ids).await?;

        let mut exposures = Vec::with_capacity(instances.len());
        for instance in instances {
            let Some(id) = instance.instance_id() else {
                continue;
            };

            let security_groups = instance
                .security_groups()
                .iter()
                .filter_map(|group| group.group_id())
                .filter_map(|group_id| groups.get(group_id))
                .map(summarize_security_group)
                .collect();

            exposures.push(InstanceExposure {
                id: id.to_string(),
                name: name_tag(instance.tags()),
                public_ip: instance.public_ip_address().map(str::to_string),
                security_groups,
            });
        }

        info!(count = exposures.len(), "Instance inventory complete");
        Ok(exposures)
    }

    /// Fetch full descriptions for the attached security groups, keyed by id.
    async fn security_group_details(
        &self,
        group_ids: Vec<String>,
    ) -> Result<HashMap<String, SecurityGroup>> {
        if group_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let described = self
            .client
            .describe_security_groups()
            .set_group_ids(Some(group_ids))
            .send()
            .await
            .context("failed to describe security groups")?;

        Ok(described
            .security_groups()
            .iter()
            .filter_map(|group| group.group_id().map(|id| (id.to_string(), group.clone())))
            .collect())
    }
}

/// Reduce a security group to the inbound surface the report cares about.
fn summarize_security_group(group: &SecurityGroup) -> SecurityGroupExposure {
    let open_ports = group
        .ip_permissions()
        .iter()
        .map(|rule| PortExposure {
            port: rule.from_port(),
            protocol: rule.ip_protocol().unwrap_or("unknown").to_string(),
            source_ranges: rule
                .ip_ranges()
                .iter()
                .filter_map(|range| range.cidr_ip().map(str::to_string))
                .collect(),
        })
        .collect();

    SecurityGroupExposure {
        id: group.group_id().unwrap_or_default().to_string(),
        name: group.group_name().unwrap_or_default().to_string(),
        open_ports,
    }
}

/// Look up the `Name` tag on an instance.
fn name_tag(tags: &[Tag]) -> Option<String> {
    tags.iter()
        .find(|tag| tag.key() == Some("Name"))
        .and_then(|tag| tag.value())
        .map(str::to_string)
}
