//! Geolocation sources: fixed coordinates, IP-based lookup, or none.

use std::sync::Arc;
use std::time::Duration;

use dishcast_core::{LocationConfig, LocationMode, ReqwestErrorExt};
use reqwest::Client;
use serde::Deserialize;

use crate::types::{Location, LocationError};

#[derive(Debug, Deserialize)]
struct IpLookupResponse {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    message: Option<String>,
    lat: Option<f64>,
    lon: Option<f64>,
    city: Option<String>,
}

/// Where the current position comes from.
#[derive(Clone)]
pub enum LocationSource {
    /// Coordinates from the config file.
    Fixed(Location),

    /// `ip-api.com`-style JSON lookup (`lat`, `lon`, `city`).
    IpLookup { client: Arc<Client>, url: String },

    /// No geolocation capability.
    Unsupported,
}

impl LocationSource {
    /// Build the source described by `[location]` in the config.
    pub fn from_config(config: &LocationConfig, timeout: Duration) -> Result<Self, LocationError> {
        match config.mode {
            LocationMode::Fixed => match (config.latitude, config.longitude) {
                (Some(latitude), Some(longitude)) => Ok(Self::Fixed(Location {
                    latitude,
                    longitude,
                    city_name: config.city_name.clone(),
                })),
                _ => Ok(Self::Unsupported),
            },
            LocationMode::IpLookup => {
                let client = Client::builder()
                    .timeout(timeout)
                    .build()
                    .map_err(|e| LocationError::Network(e.into_network_error()))?;
                Ok(Self::IpLookup {
                    client: Arc::new(client),
                    url: config.lookup_url.clone(),
                })
            }
            LocationMode::Disabled => Ok(Self::Unsupported),
        }
    }

    /// Resolve the current position.
    pub async fn current(&self) -> Result<Location, LocationError> {
        match self {
            Self::Fixed(location) => Ok(location.clone()),
            Self::IpLookup { client, url } => lookup(client, url).await,
            Self::Unsupported => Err(LocationError::Unsupported),
        }
    }
}

async fn lookup(client: &Client, url: &str) -> Result<Location, LocationError> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| LocationError::Network(e.into_network_error()))?;

    if !response.status().is_success() {
        return Err(LocationError::Lookup(format!(
            "lookup returned status {}",
            response.status()
        )));
    }

    let body: IpLookupResponse = response
        .json()
        .await
        .map_err(|e| LocationError::Lookup(format!("unreadable lookup response: {}", e)))?;

    if body.status.as_deref() == Some("fail") {
        return Err(LocationError::Lookup(
            body.message.unwrap_or_else(|| "lookup failed".to_string()),
        ));
    }

    match (body.lat, body.lon) {
        (Some(latitude), Some(longitude)) => {
            tracing::debug!("Resolved location {}, {}", latitude, longitude);
            Ok(Location {
                latitude,
                longitude,
                city_name: body.city,
            })
        }
        _ => Err(LocationError::Lookup("lookup response had no coordinates".into())),
    }
}

impl std::fmt::Debug for LocationSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Fixed(loc) => f.debug_tuple("LocationSource::Fixed").field(loc).finish(),
            Self::IpLookup { url, .. } => f
                .debug_struct("LocationSource::IpLookup")
                .field("url", url)
                .finish(),
            Self::Unsupported => f.debug_tuple("LocationSource::Unsupported").finish(),
        }
    }
}
