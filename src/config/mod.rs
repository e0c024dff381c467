//! Configuration management for Ferry.
//!
//! Ferry reads an optional TOML file with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `FERRY_<SECTION>_<KEY>` environment overrides
//! - Default values for every setting
//! - Validation on load
//!
//! # Configuration Structure
//!
//! - [`ApplicationConfig`] - Log level and dry-run switch
//! - [`ServerConfig`] - FHIR base URL, authentication and TLS
//! - [`TransferConfig`] - Page size, transaction mode, data directory
//! - [`LoggingConfig`] - Optional rolling file logs
//!
//! # Example Configuration
//!
//! ```toml
//! [application]
//! log_level = "info"
//!
//! [server]
//! base_url = "http://localhost:8080/fhir"
//! auth_type = "basic"
//! username = "ferry"
//! password = "${FERRY_FHIR_PASSWORD}"
//!
//! [transfer]
//! page_size = 50
//! transaction_mode = "per-resource"
//! ```
//!
//! # Loading
//!
//! ```rust,no_run
//! use ferry::config::load_config_or_default;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config_or_default(None)?;
//! println!("FHIR server: {}", config.server.base_url);
//! # Ok(())
//! # }
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

// Re-export commonly used types
pub use loader::{load_config, load_config_or_default, DEFAULT_CONFIG_PATH};
pub use schema::{
    ApplicationConfig, AuthType, FerryConfig, LoggingConfig, ServerConfig, TransferConfig,
};
pub use secret::{secret_string, secret_string_opt, SecretString, SecretValue};
