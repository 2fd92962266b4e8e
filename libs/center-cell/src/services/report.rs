use std::path::Path;

use anyhow::{Context, Result};
use reqwest::Method;
use tracing::{debug, info};

use shared_client::RosterApiClient;
use shared_config::AppConfig;
use shared_utils::Month;

use crate::models::CenterReport;

pub struct ReportService {
    client: RosterApiClient,
}

impl ReportService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: RosterApiClient::new(config),
        }
    }

    pub async fn monthly_report(
        &self,
        center_id: &str,
        month: Month,
        auth_token: &str,
    ) -> Result<CenterReport> {
        debug!("Fetching report for center {} month {}", center_id, month);

        let path = format!(
            "/centers/{}/reports?month={}",
            center_id,
            urlencoding::encode(&month.to_string())
        );
        let report: CenterReport = self.client.request(
            Method::GET,
            &path,
            Some(auth_token),
            None,
        ).await?;

        Ok(report)
    }

    pub async fn monthly_report_csv(
        &self,
        center_id: &str,
        month: Month,
        auth_token: &str,
    ) -> Result<String> {
        let path = format!(
            "/centers/{}/reports.csv?month={}",
            center_id,
            urlencoding::encode(&month.to_string())
        );

        Ok(self.client.request_text(Method::GET, &path, Some(auth_token)).await?)
    }

    /// Downloads the CSV export and writes it to `dest`
    pub async fn export_csv(
        &self,
        center_id: &str,
        month: Month,
        dest: &Path,
        auth_token: &str,
    ) -> Result<usize> {
        let csv = self.monthly_report_csv(center_id, month, auth_token).await?;
        tokio::fs::write(dest, csv.as_bytes())
            .await
            .with_context(|| format!("Failed to write report to {}", dest.display()))?;

        info!("Wrote {} bytes to {}", csv.len(), dest.display());
        Ok(csv.len())
    }
}

/// `report_<center>_<month>.csv`, the download name the web client used
pub fn default_csv_filename(center_name: &str, month: Month) -> String {
    let safe: String = center_name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
        .collect();
    format!("report_{}_{}.csv", safe, month)
}
