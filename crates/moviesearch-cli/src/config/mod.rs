//! Application configuration module.
//!
//! Manages the TOML config file holding the OMDb credentials and the
//! browser defaults.

#[allow(clippy::module_inception)]
mod config;
mod paths;

#[allow(clippy::module_name_repetitions)]
pub use config::{API_KEY_ENV, AppConfig, resolve_api_key};
pub use paths::resolve_config_path;
