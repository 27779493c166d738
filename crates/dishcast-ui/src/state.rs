use dishcast_weather::{FoodCategory, Location, WeatherReading};

/// Application state handed to the render functions.
///
/// Holds only what later renders need: the resolved position and the last
/// weather reading.
#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub location: Option<Location>,
    pub weather: Option<WeatherReading>,
}

impl AppState {
    /// Food category for the last reading, if there is one
    pub fn food_category(&self) -> Option<FoodCategory> {
        self.weather.as_ref().map(WeatherReading::food_category)
    }

    /// City of the resolved position, when the source named one
    pub fn place_name(&self) -> Option<&str> {
        self.location.as_ref()?.city_name.as_deref()
    }
}
