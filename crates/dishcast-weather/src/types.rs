use chrono::{DateTime, Utc};
use dishcast_core::{AppError, NetworkError};
use serde::{Deserialize, Serialize};

/// Food category suggested by the current temperature
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FoodCategory {
    HotSoup,
    ComfortFood,
    SaladLight,
    ColdRefreshing,
}

impl FoodCategory {
    /// Bucket a temperature in °C. Lower bounds are inclusive: exactly 10 is
    /// comfort food, exactly 20 is salad, exactly 30 is cold.
    pub fn from_celsius(temperature: f64) -> Self {
        if temperature < 10.0 {
            Self::HotSoup
        } else if temperature < 20.0 {
            Self::ComfortFood
        } else if temperature < 30.0 {
            Self::SaladLight
        } else {
            Self::ColdRefreshing
        }
    }

    /// Recipe search query for this category
    pub fn query(&self) -> &'static str {
        match self {
            Self::HotSoup => "soup,stew,hot",
            Self::ComfortFood => "comfort food,pasta,warm",
            Self::SaladLight => "salad,fresh,light",
            Self::ColdRefreshing => "cold,refreshing,ice cream",
        }
    }

    /// Heading shown above the recommendations
    pub fn description(&self) -> &'static str {
        match self {
            Self::HotSoup => "Hot soups and stews",
            Self::ComfortFood => "Comfort food",
            Self::SaladLight => "Salads and light dishes",
            Self::ColdRefreshing => "Cold and refreshing",
        }
    }
}

/// Geographic location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
    pub city_name: Option<String>,
}

/// Current conditions as shown in the weather widget
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherReading {
    pub temperature_c: f64,
    pub location_name: String,
    pub fetched_at: DateTime<Utc>,
}

impl WeatherReading {
    /// Temperature rounded to the nearest whole degree for display
    pub fn rounded_temperature(&self) -> i64 {
        self.temperature_c.round() as i64
    }

    pub fn food_category(&self) -> FoodCategory {
        FoodCategory::from_celsius(self.temperature_c)
    }
}

/// Location service errors
#[derive(Debug, thiserror::Error)]
pub enum LocationError {
    #[error("Geolocation is not supported")]
    Unsupported,
    #[error("Location lookup failed: {0}")]
    Lookup(String),
    #[error("Location network error: {0}")]
    Network(#[from] NetworkError),
}

/// Weather provider errors
#[derive(Debug, thiserror::Error)]
pub enum WeatherError {
    #[error("Network error: {0}")]
    Network(#[from] NetworkError),
    #[error("Location error: {0}")]
    Location(#[from] LocationError),
    #[error("Invalid API key")]
    InvalidApiKey,
    #[error("Weather API error: {status} - {message}")]
    Api { status: u16, message: String },
    #[error("Parse error: {0}")]
    Parse(String),
}

impl WeatherError {
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Network(e) => e.user_message(),
            Self::Location(LocationError::Unsupported) => "Location unavailable",
            Self::Location(_) => "Could not determine your location",
            Self::InvalidApiKey => "Weather API key is invalid. Check settings.",
            Self::Api { .. } => "Weather service error. Please try again.",
            Self::Parse(_) => "Weather data could not be read.",
        }
    }
}

impl From<LocationError> for AppError {
    fn from(err: LocationError) -> Self {
        match err {
            LocationError::Unsupported => AppError::Unsupported("geolocation".to_string()),
            LocationError::Network(e) => AppError::Network(e),
            LocationError::Lookup(msg) => AppError::Service(msg),
        }
    }
}

impl From<WeatherError> for AppError {
    fn from(err: WeatherError) -> Self {
        match err {
            WeatherError::Network(e) => AppError::Network(e),
            WeatherError::Location(e) => e.into(),
            WeatherError::Parse(msg) => AppError::Malformed(msg),
            other => AppError::Service(other.to_string()),
        }
    }
}
