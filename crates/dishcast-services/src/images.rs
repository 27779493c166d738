//! Unsplash photo search, used for a representative image of a dish.

use std::sync::Arc;
use std::time::Duration;

use dishcast_core::ApiConfig;
use reqwest::Client;
use serde::Deserialize;
use tracing::instrument;

use crate::error::{build_client, read_json, ServiceError};

/// Image used when the search has no results.
pub const DEFAULT_IMAGE_URL: &str = "default-image-url.jpg";

#[derive(Debug, Deserialize)]
struct PhotoSearchResponse {
    #[serde(default)]
    results: Vec<Photo>,
}

#[derive(Debug, Deserialize)]
struct Photo {
    urls: Option<PhotoUrls>,
}

#[derive(Debug, Deserialize)]
struct PhotoUrls {
    regular: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ImageClient {
    client: Arc<Client>,
    base_url: String,
    access_key: String,
}

impl ImageClient {
    pub fn new(api: &ApiConfig, timeout: Duration) -> Result<Self, ServiceError> {
        Ok(Self {
            client: Arc::new(build_client(timeout)?),
            base_url: api.base_url.trim_end_matches('/').to_string(),
            access_key: api.key().to_string(),
        })
    }

    /// URL of the first matching photo, or [`DEFAULT_IMAGE_URL`].
    #[instrument(skip(self), level = "info")]
    pub async fn recipe_image(&self, query: &str) -> Result<String, ServiceError> {
        let url = format!("{}/search/photos", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[("query", query), ("client_id", self.access_key.as_str())])
            .send()
            .await?;

        let found: PhotoSearchResponse = read_json(response).await?;
        Ok(found
            .results
            .into_iter()
            .next()
            .and_then(|photo| photo.urls)
            .and_then(|urls| urls.regular)
            .unwrap_or_else(|| DEFAULT_IMAGE_URL.to_string()))
    }
}
