use reqwest::Client;

use crate::error::{OverlayError, Result};
use crate::model::{parse_catalog, ModelRecord};
use crate::PRICING_API;

pub struct CatalogClient {
    http: Client,
}

impl CatalogClient {
    pub fn new() -> Self {
        Self {
            http: Client::builder()
                .timeout(std::time::Duration::from_secs(15))
                .build()
                .expect("failed to build HTTP client"),
        }
    }

    /// Fetch the full model list from the pricing endpoint.
    pub async fn fetch_models(&self) -> Result<Vec<ModelRecord>> {
        let resp = self.http.get(PRICING_API).send().await?;
        let status = resp.status().as_u16();
        if !resp.status().is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(OverlayError::Api { status, body });
        }
        let body: serde_json::Value = resp.json().await?;
        let models = parse_catalog(&body);
        tracing::debug!(models = models.len(), "fetched pricing catalog");
        Ok(models)
    }
}

impl Default for CatalogClient {
    fn default() -> Self {
        Self::new()
    }
}
