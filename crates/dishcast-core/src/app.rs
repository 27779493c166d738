use anyhow::Result;
use std::sync::Arc;

use crate::config::ValidationResult;
use crate::Config;

/// Application lifecycle: owns the validated configuration shared by every
/// service client and the page dispatcher.
pub struct App {
    config: Arc<Config>,
    validation: ValidationResult,
}

impl App {
    /// Create a new application instance from the config file on disk
    pub fn new() -> Result<Self> {
        let (config, validation) = Config::load_validated()?;
        Ok(Self::from_parts(config, validation))
    }

    /// Create an application instance from an already-loaded config
    pub fn with_config(config: Config) -> Result<Self> {
        let (config, validation) = config.into_validated()?;
        Ok(Self::from_parts(config, validation))
    }

    fn from_parts(config: Config, validation: ValidationResult) -> Self {
        tracing::info!(
            "Application configured ({} config warnings)",
            validation.warnings.len()
        );
        Self {
            config: Arc::new(config),
            validation,
        }
    }

    /// Shutdown the application
    pub fn shutdown(&mut self) -> Result<()> {
        tracing::info!("Shutting down application");
        Ok(())
    }

    /// Get reference to application config
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Warnings collected when the config was validated
    pub fn warnings(&self) -> &ValidationResult {
        &self.validation
    }
}
