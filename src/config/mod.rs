//! Configuration: band style and demo-host settings.

pub mod loader;

pub use loader::{load_config_file, ConfigError, ConfigFile, ResolvedConfig};
