use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Environment variable that supplies the store location
pub const DATABASE_ENV: &str = "REEL_HARVEST_DATABASE";

/// Loads and parses a configuration file from the given path
///
/// The store location is resolved from [`DATABASE_ENV`] first and
/// `[store] database-path` second. Loading fails if neither is set.
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, resolve or validate the configuration
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;

    let mut config: Config = toml::from_str(&content)?;

    let from_env = std::env::var(DATABASE_ENV).ok();
    let resolved = resolve_database_path(from_env, config.store.database_path.take())?;
    config.store.database_path = Some(resolved);

    validate(&config)?;

    Ok(config)
}

/// Picks the store location, environment first
///
/// Empty values count as unset. There is no built-in fallback.
///
/// ```
/// use reel_harvest::config::resolve_database_path;
///
/// let path = resolve_database_path(None, Some("./movies.db".to_string())).unwrap();
/// assert_eq!(path, "./movies.db");
/// assert!(resolve_database_path(None, None).is_err());
/// ```
pub fn resolve_database_path(
    from_env: Option<String>,
    from_file: Option<String>,
) -> Result<String, ConfigError> {
    [from_env, from_file]
        .into_iter()
        .flatten()
        .map(|value| value.trim().to_string())
        .find(|value| !value.is_empty())
        .ok_or(ConfigError::MissingStore)
}

/// Computes a SHA-256 hash of the configuration file content
///
/// This is recorded with every run so runs can be grouped by configuration.
pub fn compute_config_hash(path: &Path) -> Result<String, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    let result = hasher.finalize();
    Ok(hex::encode(result))
}

/// Loads a configuration and returns both the config and its hash
pub fn load_config_with_hash(path: &Path) -> Result<(Config, String), ConfigError> {
    let config = load_config(path)?;
    let hash = compute_config_hash(path)?;
    Ok((config, hash))
}
