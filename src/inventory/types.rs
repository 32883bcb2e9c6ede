//! Types describing compute-instance exposure.

use serde::{Deserialize, Serialize};

/// One EC2 instance and the inbound surface its security groups allow.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstanceExposure {
    /// Instance identifier.
    pub id: String,
    /// Value of the `Name` tag, if present.
    pub name: Option<String>,
    /// Public IPv4 address, if one is attached.
    pub public_ip: Option<String>,
    /// Security groups attached to the instance.
    pub security_groups: Vec<SecurityGroupExposure>,
}

/// Inbound rules of one security group attached to an instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityGroupExposure {
    pub id: String,
    pub name: String,
    pub open_ports: Vec<PortExposure>,
}

/// One inbound permission: a port (or whole-protocol rule) and the source
/// ranges allowed to reach it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortExposure {
    /// Start of the port range; `None` for all-traffic rules.
    pub port: Option<i32>,
    pub protocol: String,
    pub source_ranges: Vec<String>,
}
