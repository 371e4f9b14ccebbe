//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `ROCKETSHOES_API_URL` - Catalog API base URL (default: `http://localhost:3333`)
//! - `ROCKETSHOES_API_TOKEN` - Bearer token sent to the catalog API
//! - `ROCKETSHOES_API_TIMEOUT_SECS` - Per-request timeout (default: 10)
//! - `ROCKETSHOES_PRODUCT_CACHE_TTL_SECS` - Product record cache TTL (default: 300)
//! - `ROCKETSHOES_STORAGE_PATH` - Cart storage file (default: `.rocketshoes/storage.json`)
//! - `ROCKETSHOES_STORAGE_KEY` - Key the cart snapshot is stored under
//!   (default: `@RocketShoes:cart`)

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

/// Default key the cart snapshot is persisted under.
pub const DEFAULT_STORAGE_KEY: &str = "@RocketShoes:cart";

const DEFAULT_API_URL: &str = "http://localhost:3333";
const DEFAULT_STORAGE_PATH: &str = ".rocketshoes/storage.json";

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "xxx",
    "todo",
    "insert",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Catalog API client configuration
    pub catalog: CatalogConfig,
    /// File backing the cart storage
    pub storage_path: PathBuf,
    /// Key the cart snapshot is stored under
    pub storage_key: String,
}

/// Catalog API configuration.
///
/// Implements `Debug` manually to redact the API token.
#[derive(Clone)]
pub struct CatalogConfig {
    /// Base URL of the catalog API (serves `/products/{id}` and `/stock/{id}`)
    pub base_url: Url,
    /// Optional bearer token
    pub api_token: Option<SecretString>,
    /// Per-request timeout
    pub timeout: Duration,
    /// How long product records stay cached
    pub product_cache_ttl: Duration,
}

impl std::fmt::Debug for CatalogConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogConfig")
            .field("base_url", &self.base_url.as_str())
            .field("api_token", &self.api_token.as_ref().map(|_| "[REDACTED]"))
            .field("timeout", &self.timeout)
            .field("product_cache_ttl", &self.product_cache_ttl)
            .finish()
    }
}

impl CatalogConfig {
    /// Configuration for a catalog at `base_url` with default timeouts.
    #[must_use]
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            api_token: None,
            timeout: Duration::from_secs(10),
            product_cache_ttl: Duration::from_secs(300),
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let vars = Vars(&lookup);

        let base_url = parse_base_url(&vars.or_default("ROCKETSHOES_API_URL", DEFAULT_API_URL))?;
        let api_token = vars
            .optional("ROCKETSHOES_API_TOKEN")
            .map(|token| validate_token(&token, "ROCKETSHOES_API_TOKEN").map(|()| token))
            .transpose()?
            .map(SecretString::from);
        let timeout = Duration::from_secs(vars.parsed("ROCKETSHOES_API_TIMEOUT_SECS", 10)?);
        let product_cache_ttl =
            Duration::from_secs(vars.parsed("ROCKETSHOES_PRODUCT_CACHE_TTL_SECS", 300)?);

        let storage_path =
            PathBuf::from(vars.or_default("ROCKETSHOES_STORAGE_PATH", DEFAULT_STORAGE_PATH));
        let storage_key = vars.or_default("ROCKETSHOES_STORAGE_KEY", DEFAULT_STORAGE_KEY);
        if storage_key.trim().is_empty() {
            return Err(ConfigError::InvalidEnvVar(
                "ROCKETSHOES_STORAGE_KEY".to_string(),
                "must not be empty".to_string(),
            ));
        }

        Ok(Self {
            catalog: CatalogConfig {
                base_url,
                api_token,
                timeout,
                product_cache_ttl,
            },
            storage_path,
            storage_key,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

struct Vars<'a, F: Fn(&str) -> Option<String>>(&'a F);

impl<F: Fn(&str) -> Option<String>> Vars<'_, F> {
    /// Get an optional variable, treating blank values as unset.
    fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|value| !value.trim().is_empty())
    }

    /// Get a variable with a default value.
    fn or_default(&self, key: &str, default: &str) -> String {
        self.optional(key).unwrap_or_else(|| default.to_string())
    }

    /// Parse a variable, falling back to `default` when unset.
    fn parsed<T>(&self, key: &str, default: T) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        self.optional(key).map_or(Ok(default), |value| {
            value
                .trim()
                .parse::<T>()
                .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
        })
    }
}

/// Parse the API base URL; only HTTP(S) is accepted.
fn parse_base_url(value: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(value).map_err(|e| {
        ConfigError::InvalidEnvVar("ROCKETSHOES_API_URL".to_string(), e.to_string())
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            "ROCKETSHOES_API_URL".to_string(),
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }
    Ok(url)
}

/// Reject tokens that look like copied placeholders.
fn validate_token(token: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = token.to_lowercase();
    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InvalidEnvVar(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use secrecy::ExposeSecret;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<StorefrontConfig, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        StorefrontConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.catalog.base_url.as_str(), "http://localhost:3333/");
        assert!(config.catalog.api_token.is_none());
        assert_eq!(config.catalog.timeout, Duration::from_secs(10));
        assert_eq!(config.catalog.product_cache_ttl, Duration::from_secs(300));
        assert_eq!(config.storage_path, PathBuf::from(".rocketshoes/storage.json"));
        assert_eq!(config.storage_key, "@RocketShoes:cart");
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("ROCKETSHOES_API_URL", "https://api.rocketshoes.dev/v1"),
            ("ROCKETSHOES_API_TOKEN", "k8Jd02mXqPz71"),
            ("ROCKETSHOES_API_TIMEOUT_SECS", "3"),
            ("ROCKETSHOES_PRODUCT_CACHE_TTL_SECS", "0"),
            ("ROCKETSHOES_STORAGE_PATH", "/tmp/cart.json"),
            ("ROCKETSHOES_STORAGE_KEY", "cart"),
        ])
        .unwrap();

        assert_eq!(
            config.catalog.base_url.as_str(),
            "https://api.rocketshoes.dev/v1"
        );
        assert_eq!(
            config.catalog.api_token.unwrap().expose_secret(),
            "k8Jd02mXqPz71"
        );
        assert_eq!(config.catalog.timeout, Duration::from_secs(3));
        assert_eq!(config.catalog.product_cache_ttl, Duration::ZERO);
        assert_eq!(config.storage_path, PathBuf::from("/tmp/cart.json"));
        assert_eq!(config.storage_key, "cart");
    }

    #[test]
    fn test_blank_values_fall_back_to_defaults() {
        let config = load(&[("ROCKETSHOES_API_TOKEN", "  "), ("ROCKETSHOES_API_URL", "")])
            .unwrap();
        assert!(config.catalog.api_token.is_none());
        assert_eq!(config.catalog.base_url.as_str(), "http://localhost:3333/");
    }

    #[test]
    fn test_invalid_timeout() {
        let err = load(&[("ROCKETSHOES_API_TIMEOUT_SECS", "soon")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(ref key, _) if key == "ROCKETSHOES_API_TIMEOUT_SECS"));
    }

    #[test]
    fn test_invalid_url_scheme() {
        let err = load(&[("ROCKETSHOES_API_URL", "ftp://catalog.local")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(_, _)));
    }

    #[test]
    fn test_placeholder_token_rejected() {
        let result = load(&[("ROCKETSHOES_API_TOKEN", "your-api-token-here")]);
        assert!(result.is_err());
    }

    #[test]
    fn test_catalog_config_debug_redacts_token() {
        let mut config = CatalogConfig::new(Url::parse("http://localhost:3333").unwrap());
        config.api_token = Some(SecretString::from("super_secret_token_value"));

        let debug_output = format!("{config:?}");
        assert!(debug_output.contains("localhost:3333"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("super_secret_token_value"));
    }
}
