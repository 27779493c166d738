//! Weather for Dishcast
//!
//! Resolves the current position, fetches current conditions from
//! OpenWeather and maps the temperature to a food category.

pub mod location;
pub mod provider;
pub mod types;

pub use location::LocationSource;
pub use provider::WeatherProvider;
pub use types::*;
