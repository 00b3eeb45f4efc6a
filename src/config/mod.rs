//! Configuration module
//!
//! Server settings, configured policies and bearer tokens, loaded from TOML
//! files and `SECURE_MEDIA__*` environment variables.

pub mod loader;
pub mod types;

pub use loader::{load_config, load_config_from_str};
pub use types::*;
