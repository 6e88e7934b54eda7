use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use common::{http::fetch_json, CoreError};
use models::{Product, ProductId, Stock};

use crate::errors::ServiceError;
use crate::inventory::repository::InventoryService;
use crate::observability::INVENTORY_REQUEST_DURATION;

/// Inventory backed by the storefront REST API.
#[derive(Clone)]
pub struct HttpInventory {
    client: reqwest::Client,
    base_url: String,
}

impl HttpInventory {
    /// `timeout` of `None` leaves requests unbounded.
    pub fn new(base_url: impl Into<String>, timeout: Option<Duration>) -> Result<Self, ServiceError> {
        let mut builder = reqwest::Client::builder();
        if let Some(t) = timeout {
            builder = builder.timeout(t);
        }
        let client = builder
            .build()
            .map_err(|e| CoreError::Network(e.to_string()))?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get<T: DeserializeOwned>(&self, endpoint: &str, product_id: ProductId) -> Result<T, ServiceError> {
        let url = format!("{}/{}/{}", self.base_url, endpoint, product_id);
        let timer = INVENTORY_REQUEST_DURATION.with_label_values(&[endpoint]).start_timer();
        let result = fetch_json::<T>(&self.client, &url).await;
        timer.observe_duration();
        match result {
            Ok(value) => Ok(value),
            Err(CoreError::Status { status: 404, .. }) => {
                Err(ServiceError::not_found(&format!("{endpoint} {product_id}")))
            }
            Err(e) => {
                debug!(%url, error = %e, "inventory request failed");
                Err(e.into())
            }
        }
    }
}

#[async_trait]
impl InventoryService for HttpInventory {
    #[instrument(skip(self))]
    async fn stock(&self, product_id: ProductId) -> Result<Stock, ServiceError> {
        self.get("stock", product_id).await
    }

    #[instrument(skip(self))]
    async fn product(&self, product_id: ProductId) -> Result<Product, ServiceError> {
        self.get("products", product_id).await
    }
}
