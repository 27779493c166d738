//! OpenWeather current-conditions client.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use dishcast_core::{ApiConfig, ReqwestErrorExt};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::instrument;

use crate::types::{Location, WeatherError, WeatherReading};

#[derive(Debug, Deserialize)]
struct OpenWeatherResponse {
    main: Option<OpenWeatherMain>,
    #[serde(default)]
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenWeatherMain {
    temp: f64,
}

#[derive(Debug, Clone)]
pub struct WeatherProvider {
    client: Arc<Client>,
    base_url: String,
    api_key: String,
}

impl WeatherProvider {
    pub fn new(api: &ApiConfig, timeout: Duration) -> Result<Self, WeatherError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| WeatherError::Network(e.into_network_error()))?;

        Ok(Self {
            client: Arc::new(client),
            base_url: api.base_url.trim_end_matches('/').to_string(),
            api_key: api.key().to_string(),
        })
    }

    /// Fetch current conditions in metric units.
    #[instrument(skip(self), level = "info")]
    pub async fn fetch(&self, location: &Location) -> Result<WeatherReading, WeatherError> {
        let url = format!("{}/weather", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[
                ("lat", location.latitude.to_string()),
                ("lon", location.longitude.to_string()),
                ("appid", self.api_key.clone()),
                ("units", "metric".to_string()),
            ])
            .send()
            .await
            .map_err(|e| WeatherError::Network(e.into_network_error()))?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(WeatherError::InvalidApiKey);
        }
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(WeatherError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: OpenWeatherResponse = response
            .json()
            .await
            .map_err(|e| WeatherError::Parse(e.to_string()))?;

        let main = body
            .main
            .ok_or_else(|| WeatherError::Parse("response has no main.temp".into()))?;

        let location_name = body
            .name
            .filter(|n| !n.is_empty())
            .or_else(|| location.city_name.clone())
            .unwrap_or_else(|| format!("{:.2}, {:.2}", location.latitude, location.longitude));

        tracing::info!("Weather for {}: {:.1}°C", location_name, main.temp);

        Ok(WeatherReading {
            temperature_c: main.temp,
            location_name,
            fetched_at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn provider(server: &MockServer) -> WeatherProvider {
        let api = ApiConfig {
            base_url: server.uri(),
            api_key: Some("weather-key".into()),
        };
        WeatherProvider::new(&api, Duration::from_secs(5)).unwrap()
    }

    fn seattle() -> Location {
        Location {
            latitude: 47.61,
            longitude: -122.33,
            city_name: None,
        }
    }

    #[tokio::test]
    async fn test_fetch_reads_temperature_and_name() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/weather"))
            .and(query_param("appid", "weather-key"))
            .and(query_param("units", "metric"))
            .and(query_param("lat", "47.61"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "main": {"temp": 12.4, "humidity": 80},
                "name": "Seattle"
            })))
            .mount(&server)
            .await;

        let reading = provider(&server).fetch(&seattle()).await.unwrap();
        assert_eq!(reading.temperature_c, 12.4);
        assert_eq!(reading.location_name, "Seattle");
    }

    #[tokio::test]
    async fn test_fetch_unauthorized_is_invalid_key() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let err = provider(&server).fetch(&seattle()).await.unwrap_err();
        assert!(matches!(err, WeatherError::InvalidApiKey));
    }

    #[tokio::test]
    async fn test_fetch_missing_main_is_parse_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "name": "Nowhere"
            })))
            .mount(&server)
            .await;

        let err = provider(&server).fetch(&seattle()).await.unwrap_err();
        assert!(matches!(err, WeatherError::Parse(_)));
    }

    #[tokio::test]
    async fn test_fetch_falls_back_to_location_name() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "main": {"temp": 31.0},
                "name": ""
            })))
            .mount(&server)
            .await;

        let mut loc = seattle();
        loc.city_name = Some("Home".into());
        let reading = provider(&server).fetch(&loc).await.unwrap();
        assert_eq!(reading.location_name, "Home");
    }
}
