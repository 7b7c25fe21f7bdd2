//! Configuration Module
//!
//! Loads and validates configuration from TOML files and the environment.

pub mod loader;

pub use loader::{
    Config, BirdeyeSection, ConfigError, load_config, config_from_env,
};
