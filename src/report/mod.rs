//! Exposure Report Rendering
//!
//! Formats the aggregated inventory and scan data into the plain-text
//! report, wraps it for the web view, and persists it to disk before it is
//! served.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::inventory::InstanceExposure;
use crate::scan::RegionScanResult;

/// Everything the renderer needs for one report.
#[derive(Debug, Clone, Serialize)]
pub struct ExposureReport {
    pub account_id: String,
    pub generated_at: DateTime<Utc>,
    pub instances: Vec<InstanceExposure>,
    pub databases: RegionScanResult,
}

impl ExposureReport {
    pub fn new(
        account_id: String,
        instances: Vec<InstanceExposure>,
        databases: RegionScanResult,
    ) -> Self {
        Self {
            account_id,
            generated_at: Utc::now(),
            instances,
            databases,
        }
    }

    /// Render the plain-text report.
    ///
    /// Regions are rendered in sorted order so repeated runs against the
    /// same data produce identical output; the aggregate map itself carries
    /// no order. With `just_instances` the instance block shrinks to ids and
    /// names only.
    pub fn render_text(&self, just_instances: bool) -> String {
        let mut out = String::new();
        out.push_str(&format!(
            "Exposure report for AWS account {}\n",
            self.account_id
        ));
        out.push_str(&format!(
            "Generated at {}\n\n",
            self.generated_at.to_rfc3339()
        ));

        self.render_databases(&mut out);
        self.render_instances(&mut out, just_instances);

        out.push_str("----------\n");
        out
    }

    fn render_databases(&self, out: &mut String) {
        out.push_str("RDS Start\n");

        let mut regions: Vec<&String> = self.databases.keys().collect();
        regions.sort();

        for region in regions {
            out.push_str(&format!("Region: {region}\n"));

            let records = &self.databases[region];
            if records.is_empty() {
                out.push_str("  No RDS instances found\n");
                continue;
            }

            for db in records {
                let mut line = match &db.db_name {
                    Some(name) => format!("  DB: {name}"),
                    None => format!("  Instance: {} (no DB name)", db.instance_id),
                };
                if let Some(engine) = &db.engine {
                    line.push_str(&format!(", Engine: {engine}"));
                }
                if let Some(status) = &db.status {
                    line.push_str(&format!(", Status: {status}"));
                }
                out.push_str(&line);
                out.push('\n');
            }
        }

        out.push_str("RDS End\n");
    }

    fn render_instances(&self, out: &mut String, just_instances: bool) {
        out.push_str("Instance Report!\n");

        for instance in &self.instances {
            out.push_str(&format!("Instance ID: {}\n", instance.id));

            if just_instances {
                match &instance.name {
                    Some(name) => out.push_str(&format!("Name: {name}\n")),
                    None => out.push_str("Name: N/A\n"),
                }
                continue;
            }

            if let Some(name) = &instance.name {
                out.push_str(&format!("Name: {name}\n"));
            }
            if let Some(ip) = &instance.public_ip {
                out.push_str(&format!("Public IP: {ip}\n"));
            }

            out.push_str("Security Groups:\n");
            for group in &instance.security_groups {
                out.push_str(&format!("  Security Group: {} ({})\n", group.name, group.id));
                for port in &group.open_ports {
                    let port_label = match port.port {
                        Some(number) => number.to_string(),
                        None => "any".to_string(),
                    };
                    out.push_str(&format!("    Port {} ({}):\n", port_label, port.protocol));
                    out.push_str(&format!(
                        "      Inbound access allowed from: {}\n",
                        port.source_ranges.join(", ")
                    ));
                }
            }
        }
    }
}

/// Wrap the text report in the monospace page served on `/`.
pub fn render_html(text: &str) -> String {
    format!(
        "<html><head><title>Automatic APT Results</title>\
         <style>body{{font-family:monospace;white-space:pre;padding:20px;line-height:1.5}}</style>\
         </head><body>{text}</body></html>"
    )
}

/// Persist the text report to disk.
pub async fn persist(path: &Path, text: &str) -> Result<()> {
    tokio::fs::write(path, text)
        .await
        .with_context(|| format!("failed to write report to {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inventory::{PortExposure, SecurityGroupExposure};
    use crate::scan::DatabaseRecord;
    use std::collections::HashMap;

    fn fixture_report() -> ExposureReport {
        let mut databases = HashMap::new();
        databases.insert(
            "us-east-1".to_string(),
            vec![
                DatabaseRecord {
                    instance_id: "orders-primary".to_string(),
                    db_name: Some("orders".to_string()),
                    engine: Some("postgres".to_string()),
                    status: Some("available".to_string()),
                },
                DatabaseRecord {
                    instance_id: "legacy-mysql".to_string(),
                    db_name: None,
                    engine: Some("mysql".to_string()),
                    status: None,
                },
            ],
        );
        databases.insert("us-west-2".to_string(), Vec::new());

        let instances = vec![InstanceExposure {
            id: "i-0abc".to_string(),
            name: Some("api-server".to_string()),
            public_ip: Some("203.0.113.7".to_string()),
            security_groups: vec![SecurityGroupExposure {
                id: "sg-0123".to_string(),
                name: "web".to_string(),
                open_ports: vec![PortExposure {
                    port: Some(443),
                    protocol: "tcp".to_string(),
                    source_ranges: vec!["0.0.0.0/0".to_string()],
                }],
            }],
        }];

        ExposureReport::new("123456789012".to_string(), instances, databases)
    }

    #[test]
    fn test_full_report_layout() {
        let text = fixture_report().render_text(false);

        assert!(text.contains("Exposure report for AWS account 123456789012"));
        assert!(text.contains("RDS Start\n"));
        assert!(text.contains("Region: us-east-1"));
        assert!(text.contains("  DB: orders, Engine: postgres, Status: available"));
        assert!(text.contains("  Instance: legacy-mysql (no DB name), Engine: mysql"));
        assert!(text.contains("Region: us-west-2\n  No RDS instances found"));
        assert!(text.contains("RDS End\n"));
        assert!(text.contains("Instance ID: i-0abc"));
        assert!(text.contains("Public IP: 203.0.113.7"));
        assert!(text.contains("  Security Group: web (sg-0123)"));
        assert!(text.contains("    Port 443 (tcp):"));
        assert!(text.contains("      Inbound access allowed from: 0.0.0.0/0"));
        assert!(text.ends_with("----------\n"));
    }

    #[test]
    fn test_regions_render_in_sorted_order() {
        let text = fixture_report().render_text(false);
        let east = text.find("Region: us-east-1").unwrap();
        let west = text.find("Region: us-west-2").unwrap();
        assert!(east < west);
    }

    #[test]
    fn test_just_instances_omits_network_detail() {
        let text = fixture_report().render_text(true);

        assert!(text.contains("Instance ID: i-0abc"));
        assert!(text.contains("Name: api-server"));
        assert!(!text.contains("Public IP:"));
        assert!(!text.contains("Security Groups:"));
    }

    #[test]
    fn test_just_instances_marks_missing_names() {
        let mut report = fixture_report();
        report.instances[0].name = None;

        let text = report.render_text(true);
        assert!(text.contains("Name: N/A"));
    }

    #[test]
    fn test_html_wraps_text_in_monospace_page() {
        let html = render_html("RDS Start\nRDS End\n");
        assert!(html.starts_with("<html>"));
        assert!(html.contains("font-family:monospace"));
        assert!(html.contains("RDS Start"));
        assert!(html.ends_with("</body></html>"));
    }
}
