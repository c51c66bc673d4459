use crate::errors::AppError;
use crate::models::{Lead, LeadStatus, NewLeadRecord};
use serde_json::json;
use std::time::Duration;

/// Client for the remote Metropole lead service.
///
/// The service is the authoritative store; this client only lists the
/// full collection for a tenant/product, updates one lead's status slot,
/// and submits new leads. There are no retries: every failed call is
/// surfaced to the caller for explicit re-invocation.
#[derive(Clone)]
pub struct MetropoleClient {
    client: reqwest::Client,
    base_url: String,
}

impl MetropoleClient {
    /// Creates a new `MetropoleClient`.
    ///
    /// # Arguments
    ///
    /// * `base_url` - The base URL of the Metropole service, without a
    ///   trailing slash.
    pub fn new(base_url: String) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| {
                AppError::ExternalApiError(format!("Failed to create Metropole client: {}", e))
            })?;

        Ok(Self { client, base_url })
    }

    /// Lists every lead for a tenant/product pair.
    ///
    /// # Returns
    ///
    /// * `Result<Vec<Lead>, AppError>` - The full lead collection.
    pub async fn list_leads(&self, tenant_id: i64, product: &str) -> Result<Vec<Lead>, AppError> {
        let url = format!(
            "{}/metropole/v1/data/{}/{}",
            self.base_url, tenant_id, product
        );
        tracing::info!("Fetching leads for tenant {} product {}", tenant_id, product);

        let response = self.client.get(&url).send().await.map_err(|e| {
            AppError::ExternalApiError(format!("Metropole list request failed: {}", e))
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::ExternalApiError(format!(
                "Metropole returned {}: {}",
                status, error_text
            )));
        }

        let leads: Vec<Lead> = response.json().await.map_err(|e| {
            AppError::ExternalApiError(format!("Failed to parse Metropole response: {}", e))
        })?;

        tracing::info!("Fetched {} leads", leads.len());
        Ok(leads)
    }

    /// Updates the pipeline status of one lead.
    ///
    /// The remote update endpoint patches a single field; the status
    /// lives in the `field03` slot by convention.
    pub async fn update_status(&self, lead_id: i64, status: LeadStatus) -> Result<(), AppError> {
        let url = format!("{}/metropole/v1/update/{}", self.base_url, lead_id);
        tracing::info!("Updating lead {} status to {}", lead_id, status.as_str());

        let body = json!({ "field03": status.as_str() });

        let response = self
            .client
            .put(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                AppError::ExternalApiError(format!("Metropole update request failed: {}", e))
            })?;

        if !response.status().is_success() {
            let status_code = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::ExternalApiError(format!(
                "Metropole status update failed {}: {}",
                status_code, error_text
            )));
        }

        tracing::info!("Lead {} status updated", lead_id);
        Ok(())
    }

    /// Submits a new lead record.
    pub async fn create_lead(&self, record: &NewLeadRecord) -> Result<(), AppError> {
        let url = format!("{}/metropole/v1/send", self.base_url);
        tracing::info!("Creating new lead: {}", record.name);

        let response = self
            .client
            .post(&url)
            .json(record)
            .send()
            .await
            .map_err(|e| {
                AppError::ExternalApiError(format!("Metropole create request failed: {}", e))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::ExternalApiError(format!(
                "Metropole lead creation failed {}: {}",
                status, error_text
            )));
        }

        tracing::info!("Lead created successfully");
        Ok(())
    }
}
