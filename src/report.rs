// src/report.rs
//
// One row per (resource, diagnostic category), written as CSV/TSV.

use std::path::{Path, PathBuf};

use crate::config::options::ExportOptions;
use crate::error::Result;
use crate::file::write_rows;
use crate::inventory::{DiagnosticCategory, Resource, Subscription};
use crate::resolve::Resolution;

pub const HEADERS: [&str; 10] = [
    "SubscriptionName",
    "SubscriptionId",
    "ResourceName",
    "ResourceType",
    "ResourceGroup",
    "CategoryName",
    "CategoryType",
    "LogAnalyticsTable",
    "Enabled",
    "ResourceId",
];

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReportRow {
    pub subscription_name: String,
    pub subscription_id: String,
    pub resource_name: String,
    pub resource_type: String,
    pub resource_group: String,
    pub category_name: String,
    pub category_type: String,
    /// Table name, or `Unknown (<reason>)`.
    pub log_analytics_table: String,
    pub enabled: bool,
    pub resource_id: String,
}

impl ReportRow {
    pub fn new(
        sub: &Subscription,
        res: &Resource,
        cat: &DiagnosticCategory,
        resolution: &Resolution,
        enabled: bool,
    ) -> Self {
        Self {
            subscription_name: sub.name.clone(),
            subscription_id: sub.id.clone(),
            resource_name: res.name.clone(),
            resource_type: res.resource_type.clone(),
            resource_group: res.resource_group.clone(),
            category_name: cat.name.clone(),
            category_type: cat.category_type.to_string(),
            log_analytics_table: resolution.to_string(),
            enabled,
            resource_id: res.resource_id.clone(),
        }
    }

    pub fn is_resolved(&self) -> bool {
        !self.log_analytics_table.starts_with("Unknown")
    }

    /// Cells in `HEADERS` order.
    pub fn to_row(&self) -> Vec<String> {
        vec![
            self.subscription_name.clone(),
            self.subscription_id.clone(),
            self.resource_name.clone(),
            self.resource_type.clone(),
            self.resource_group.clone(),
            self.category_name.clone(),
            self.category_type.clone(),
            self.log_analytics_table.clone(),
            self.enabled.to_string(),
            self.resource_id.clone(),
        ]
    }
}

pub fn write_report(path: &Path, rows: &[ReportRow], export: &ExportOptions) -> Result<PathBuf> {
    let cells: Vec<Vec<String>> = rows.iter().map(ReportRow::to_row).collect();
    let headers = export.include_headers.then_some(&HEADERS[..]);
    let written = write_rows(path, headers, &cells, export.format.delim())?;
    logf!("Wrote {} report rows to {}", rows.len(), written.display());
    Ok(written)
}
