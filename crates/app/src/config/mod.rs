//! Storefront configuration

use std::path::PathBuf;

use clap::Args;

use crate::{
    backend::{BackendConfig, DEFAULT_API_URL},
    domain::carts::slot::DEFAULT_SLOT_NAME,
};

pub mod logging;

pub use logging::{LogFormat, LoggingConfig};

/// Directory holding the persisted cart slot when none is configured.
pub const DEFAULT_CART_DIR: &str = ".storefront";

/// Backend connection settings.
#[derive(Debug, Clone, Args)]
pub struct ApiConfig {
    /// Storefront backend base URL
    #[arg(long, env = "STOREFRONT_API_URL", default_value = DEFAULT_API_URL, global = true)]
    pub api_url: String,
}

impl From<&ApiConfig> for BackendConfig {
    fn from(config: &ApiConfig) -> Self {
        Self {
            base_url: config.api_url.clone(),
        }
    }
}

/// Persisted cart settings.
#[derive(Debug, Clone, Args)]
pub struct CartConfig {
    /// Directory holding the persisted cart
    #[arg(long, env = "STOREFRONT_CART_DIR", default_value = DEFAULT_CART_DIR, global = true)]
    pub cart_dir: PathBuf,

    /// Name of the persisted cart slot
    #[arg(long, env = "STOREFRONT_CART_SLOT", default_value = DEFAULT_SLOT_NAME, global = true)]
    pub cart_slot: String,
}

/// Storefront configuration shared by every command.
#[derive(Debug, Clone, Args)]
pub struct StorefrontConfig {
    /// Backend connection settings.
    #[command(flatten)]
    pub api: ApiConfig,

    /// Persisted cart settings.
    #[command(flatten)]
    pub cart: CartConfig,

    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,
}
