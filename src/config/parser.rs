use crate::config::types::Config;
use crate::ConfigError;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Loads and parses a configuration file from the given path
///
/// Sections and keys missing from the file fall back to their defaults.
/// The result is not validated: command-line overrides are applied first,
/// then [`validate`](crate::config::validate) checks the merged settings.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    load_config_with_hash(path).map(|(config, _)| config)
}

/// Loads a configuration and returns both the config and the SHA-256 hash
/// of the file it was read from
///
/// The hash is logged at startup so output tables can be matched to the
/// configuration that produced them.
pub fn load_config_with_hash(path: &Path) -> Result<(Config, String), ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    Ok((config, content_hash(&content)))
}

/// Hex-encoded SHA-256 of configuration text
pub fn content_hash(content: &str) -> String {
    hex::encode(Sha256::digest(content.as_bytes()))
}
