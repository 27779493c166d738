pub mod app;
pub mod config;
pub mod error;

pub use app::App;
pub use config::{
    ApiConfig, Config, HttpConfig, LocationConfig, LocationMode, SearchConfig, ValidationResult,
};
pub use error::{AppError, NetworkError, ReqwestErrorExt};

use anyhow::Result;

/// Initialize logging. Safe to call more than once; later calls are no-ops.
pub fn init() -> Result<()> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .try_init();

    tracing::info!("Dishcast core initialized");
    Ok(())
}
