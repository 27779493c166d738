use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

/// Configuration validation errors
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Result of config validation
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationResult {
    /// Returns true if there are no errors (warnings are OK)
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Add an error
    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Add a warning
    pub fn add_warning(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Get a user-friendly message summarizing all errors
    pub fn error_summary(&self) -> String {
        if self.errors.is_empty() {
            return String::new();
        }
        self.errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// OpenWeather current-conditions endpoint
    #[serde(default = "default_openweather")]
    pub openweather: ApiConfig,

    /// Unsplash photo search
    #[serde(default = "default_unsplash")]
    pub unsplash: ApiConfig,

    /// Spoonacular recipe search and detail
    #[serde(default = "default_spoonacular")]
    pub spoonacular: ApiConfig,

    /// Gemini generateContent endpoint used for mood suggestions
    #[serde(default = "default_gemini")]
    pub gemini: ApiConfig,

    #[serde(default)]
    pub location: LocationConfig,

    #[serde(default)]
    pub search: SearchConfig,

    #[serde(default)]
    pub http: HttpConfig,
}

/// Base URL and key for one third-party API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,

    /// API key, access key or client id, depending on the service.
    /// May be supplied through the environment instead (see [`Config::apply_env_overrides`]).
    #[serde(default)]
    pub api_key: Option<String>,
}

impl ApiConfig {
    fn with_base(base_url: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
            api_key: None,
        }
    }

    /// Check if a key is configured (not empty, not a placeholder)
    pub fn has_key(&self) -> bool {
        self.api_key
            .as_deref()
            .map(|k| !k.trim().is_empty() && !k.starts_with("YOUR_"))
            .unwrap_or(false)
    }

    /// The configured key, or an empty string when none is set.
    pub fn key(&self) -> &str {
        self.api_key.as_deref().unwrap_or("")
    }
}

fn default_openweather() -> ApiConfig {
    ApiConfig::with_base("https://api.openweathermap.org/data/2.5")
}

fn default_unsplash() -> ApiConfig {
    ApiConfig::with_base("https://api.unsplash.com")
}

fn default_spoonacular() -> ApiConfig {
    ApiConfig::with_base("https://api.spoonacular.com/recipes")
}

fn default_gemini() -> ApiConfig {
    ApiConfig::with_base(
        "https://generativelanguage.googleapis.com/v1beta/models/gemini-pro:generateContent",
    )
}

/// How the current position is obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LocationMode {
    /// Use the coordinates in the config file
    Fixed,
    /// Resolve the position from the public IP address
    #[default]
    IpLookup,
    /// No geolocation capability
    Disabled,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationConfig {
    #[serde(default)]
    pub mode: LocationMode,

    #[serde(default)]
    pub latitude: Option<f64>,

    #[serde(default)]
    pub longitude: Option<f64>,

    /// Display name used with fixed coordinates
    #[serde(default)]
    pub city_name: Option<String>,

    #[serde(default = "default_lookup_url")]
    pub lookup_url: String,
}

fn default_lookup_url() -> String {
    "http://ip-api.com/json".to_string()
}

impl Default for LocationConfig {
    fn default() -> Self {
        Self {
            mode: LocationMode::default(),
            latitude: None,
            longitude: None,
            city_name: None,
            lookup_url: default_lookup_url(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Quiet period for search-as-you-type, in milliseconds
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Queries shorter than this (after trimming) are ignored
    #[serde(default = "default_min_query_len")]
    pub min_query_len: usize,

    /// Number of recipes requested per search
    #[serde(default = "default_results")]
    pub results: u32,
}

fn default_debounce_ms() -> u64 {
    500
}

fn default_min_query_len() -> usize {
    3
}

fn default_results() -> u32 {
    6
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            min_query_len: default_min_query_len(),
            results: default_results(),
        }
    }
}

impl SearchConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    10
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl HttpConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Environment variables that override the API keys in the config file.
pub const ENV_OPENWEATHER_KEY: &str = "OPENWEATHER_API_KEY";
pub const ENV_UNSPLASH_KEY: &str = "UNSPLASH_ACCESS_KEY";
pub const ENV_SPOONACULAR_KEY: &str = "SPOONACULAR_API_KEY";
pub const ENV_GEMINI_KEY: &str = "GEMINI_API_KEY";

impl Default for Config {
    fn default() -> Self {
        Self {
            openweather: default_openweather(),
            unsplash: default_unsplash(),
            spoonacular: default_spoonacular(),
            gemini: default_gemini(),
            location: LocationConfig::default(),
            search: SearchConfig::default(),
            http: HttpConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from file, creating default if it doesn't exist
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;
        Self::load_from(&config_path)
    }

    /// Load configuration from an explicit path, creating a default file if missing.
    /// Environment key overrides are applied after reading.
    pub fn load_from(config_path: &Path) -> Result<Self> {
        let mut config = if !config_path.exists() {
            let config = Self::default();
            config.save_to(config_path)?;
            tracing::info!("Wrote default config to {}", config_path.display());
            config
        } else {
            let contents = std::fs::read_to_string(config_path)
                .context("Failed to read config file")?;

            toml::from_str(&contents).context("Failed to parse config file")?
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// Load configuration and validate it
    ///
    /// Returns the config along with any validation warnings.
    /// Returns an error if validation fails with critical errors.
    pub fn load_validated() -> Result<(Self, ValidationResult)> {
        let config = Self::load()?;
        config.into_validated()
    }

    /// Validate an already-loaded config, logging warnings.
    pub fn into_validated(self) -> Result<(Self, ValidationResult)> {
        let validation = self.validate();

        if !validation.is_valid() {
            anyhow::bail!(
                "Configuration validation failed: {}",
                validation.error_summary()
            );
        }

        for warning in &validation.warnings {
            tracing::warn!("Config warning: {}", warning);
        }

        Ok((self, validation))
    }

    /// Replace API keys with values from the environment when set
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|var| std::env::var(var).ok());
    }

    fn apply_overrides_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let targets: [(&str, &mut ApiConfig); 4] = [
            (ENV_OPENWEATHER_KEY, &mut self.openweather),
            (ENV_UNSPLASH_KEY, &mut self.unsplash),
            (ENV_SPOONACULAR_KEY, &mut self.spoonacular),
            (ENV_GEMINI_KEY, &mut self.gemini),
        ];

        for (var, api) in targets {
            if let Some(value) = lookup(var).filter(|v| !v.trim().is_empty()) {
                tracing::debug!("Using {} from environment", var);
                api.api_key = Some(value);
            }
        }
    }

    /// Validate the configuration
    ///
    /// Returns a ValidationResult containing any errors or warnings.
    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::default();

        let apis = [
            ("openweather", &self.openweather, "weather-based recommendations"),
            ("unsplash", &self.unsplash, "image fallbacks"),
            ("spoonacular", &self.spoonacular, "recipe search"),
            ("gemini", &self.gemini, "mood suggestions"),
        ];

        for (name, api, feature) in apis {
            self.validate_url(&api.base_url, &format!("{}.base_url", name), &mut result);
            if !api.has_key() {
                result.add_warning(
                    format!("{}.api_key", name),
                    format!("API key not set - {} will be unavailable", feature),
                );
            }
        }

        match self.location.mode {
            LocationMode::Fixed => match (self.location.latitude, self.location.longitude) {
                (Some(lat), Some(lon)) => {
                    if !(-90.0..=90.0).contains(&lat) {
                        result.add_error("location.latitude", "Latitude must be within -90..=90");
                    }
                    if !(-180.0..=180.0).contains(&lon) {
                        result.add_error(
                            "location.longitude",
                            "Longitude must be within -180..=180",
                        );
                    }
                }
                _ => result.add_error(
                    "location",
                    "Fixed location mode requires latitude and longitude",
                ),
            },
            LocationMode::IpLookup => {
                self.validate_url(&self.location.lookup_url, "location.lookup_url", &mut result);
            }
            LocationMode::Disabled => result.add_warning(
                "location",
                "Geolocation disabled - weather widget will show a placeholder",
            ),
        }

        if self.search.debounce_ms == 0 {
            result.add_error("search.debounce_ms", "Debounce period must be greater than 0");
        } else if self.search.debounce_ms > 5000 {
            result.add_warning(
                "search.debounce_ms",
                "Debounce period is unusually long (>5000ms)",
            );
        }

        if self.search.min_query_len == 0 {
            result.add_warning(
                "search.min_query_len",
                "Empty queries will be sent to the recipe service",
            );
        }

        if self.search.results == 0 {
            result.add_error("search.results", "Result count must be greater than 0");
        } else if self.search.results > 100 {
            result.add_warning("search.results", "Recipe service caps results at 100");
        }

        if self.http.timeout_secs == 0 {
            result.add_error("http.timeout_secs", "Timeout must be greater than 0");
        }

        result
    }

    /// Validate a URL field
    fn validate_url(&self, url_str: &str, field_name: &str, result: &mut ValidationResult) {
        match Url::parse(url_str) {
            Ok(url) => {
                if url.scheme() != "http" && url.scheme() != "https" {
                    result.add_error(
                        field_name,
                        format!("URL must use http or https scheme, got: {}", url.scheme()),
                    );
                }

                if url.host().is_none() {
                    result.add_error(field_name, "URL must have a host");
                }

                if let Some(port) = url.port() {
                    if port == 0 {
                        result.add_error(field_name, "Port cannot be 0");
                    }
                }
            }
            Err(e) => {
                result.add_error(field_name, format!("Invalid URL: {}", e));
            }
        }
    }

    /// Save configuration to an explicit path
    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        std::fs::write(config_path, contents).context("Failed to write config file")?;

        Ok(())
    }

    /// Get the path to the configuration file
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to get config directory")?
            .join("dishcast");

        Ok(config_dir.join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keyed_config() -> Config {
        let mut config = Config::default();
        for api in [
            &mut config.openweather,
            &mut config.unsplash,
            &mut config.spoonacular,
            &mut config.gemini,
        ] {
            api.api_key = Some("test-key".to_string());
        }
        config
    }

    #[test]
    fn test_valid_default_config() {
        let config = Config::default();
        let result = config.validate();
        // Missing keys are warnings only
        assert!(result.is_valid(), "Default config should be valid: {:?}", result.errors);
        assert!(result.warnings.iter().any(|w| w.field == "spoonacular.api_key"));
    }

    #[test]
    fn test_keyed_config_has_no_key_warnings() {
        let result = keyed_config().validate();
        assert!(result.is_valid());
        assert!(!result.warnings.iter().any(|w| w.field.ends_with(".api_key")));
    }

    #[test]
    fn test_invalid_url() {
        let mut config = Config::default();
        config.spoonacular.base_url = "not-a-url".to_string();
        let result = config.validate();
        assert!(!result.is_valid());
        assert!(result.errors.iter().any(|e| e.field == "spoonacular.base_url"));
    }

    #[test]
    fn test_invalid_url_scheme() {
        let mut config = Config::default();
        config.openweather.base_url = "ftp://localhost:8080".to_string();
        let result = config.validate();
        assert!(!result.is_valid());
        assert!(result.errors.iter().any(|e| e.message.contains("http or https")));
    }

    #[test]
    fn test_zero_debounce_is_error() {
        let mut config = Config::default();
        config.search.debounce_ms = 0;
        let result = config.validate();
        assert!(!result.is_valid());
        assert!(result.errors.iter().any(|e| e.field == "search.debounce_ms"));
    }

    #[test]
    fn test_fixed_location_requires_coordinates() {
        let mut config = Config::default();
        config.location.mode = LocationMode::Fixed;
        assert!(!config.validate().is_valid());

        config.location.latitude = Some(47.6);
        config.location.longitude = Some(-122.3);
        assert!(config.validate().is_valid());

        config.location.latitude = Some(123.0);
        let result = config.validate();
        assert!(result.errors.iter().any(|e| e.field == "location.latitude"));
    }

    #[test]
    fn test_disabled_location_is_warning() {
        let mut config = Config::default();
        config.location.mode = LocationMode::Disabled;
        let result = config.validate();
        assert!(result.is_valid());
        assert!(result.warnings.iter().any(|w| w.field == "location"));
    }

    #[test]
    fn test_env_overrides_replace_keys() {
        let mut config = Config::default();
        config.gemini.api_key = Some("from-file".to_string());
        config.apply_overrides_from(|var| match var {
            ENV_SPOONACULAR_KEY => Some("spoon".to_string()),
            ENV_GEMINI_KEY => Some("  ".to_string()),
            _ => None,
        });
        assert_eq!(config.spoonacular.api_key.as_deref(), Some("spoon"));
        // Blank values do not clobber the file
        assert_eq!(config.gemini.api_key.as_deref(), Some("from-file"));
        assert!(config.openweather.api_key.is_none());
    }

    #[test]
    fn test_placeholder_key_is_not_a_key() {
        let mut api = default_unsplash();
        assert!(!api.has_key());
        api.api_key = Some("YOUR_UNSPLASH_KEY".to_string());
        assert!(!api.has_key());
        api.api_key = Some("abc".to_string());
        assert!(api.has_key());
    }

    #[test]
    fn test_load_from_creates_default_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let config = Config::load_from(&path).unwrap();
        assert!(path.exists());
        assert_eq!(config.search.debounce_ms, 500);
        assert_eq!(config.search.min_query_len, 3);
        assert_eq!(config.search.results, 6);
    }

    #[test]
    fn test_partial_file_uses_section_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
[search]
debounce_ms = 250
"#,
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.search.debounce_ms, 250);
        assert_eq!(config.search.min_query_len, 3);
        assert_eq!(config.spoonacular.base_url, "https://api.spoonacular.com/recipes");
        assert_eq!(config.location.mode, LocationMode::IpLookup);
    }

    #[test]
    fn test_hand_written_file_with_one_section_loads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
[spoonacular]
base_url = "https://api.spoonacular.com/recipes"
api_key = "spoon-key"
"#,
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert!(config.spoonacular.has_key());
        assert_eq!(config.openweather.base_url, "https://api.openweathermap.org/data/2.5");
        assert_eq!(config.http.timeout_secs, 10);
    }

    #[test]
    fn test_saved_default_reloads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        Config::default().save_to(&path).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(!contents.contains("config_dir"));
        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.search.debounce_ms, 500);
    }

    #[test]
    fn test_validation_result_error_summary() {
        let mut result = ValidationResult::default();
        result.add_error("field1", "error1");
        result.add_error("field2", "error2");
        let summary = result.error_summary();
        assert!(summary.contains("field1"));
        assert!(summary.contains("field2"));
    }
}
