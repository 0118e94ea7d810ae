//! Environment configuration.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;

use storefront_observability::LogFormat;
use storefront_search::DEFAULT_DEBOUNCE;

pub const DEFAULT_POSTAL_LOOKUP_URL: &str = "https://viacep.com.br";
pub const DEFAULT_POSTAL_LOOKUP_TIMEOUT: Duration = Duration::from_millis(5000);
pub const DEFAULT_IMAGE_BASE: &str = "/imgs";
pub const DEFAULT_COUNTRY: &str = "Brasil";

#[derive(Debug, Clone, PartialEq)]
pub struct StorefrontConfig {
    pub filter_debounce: Duration,
    pub postal_lookup_url: String,
    pub postal_lookup_timeout: Duration,
    pub image_base: String,
    pub country: String,
    /// Catalog JSON file; the bundled catalog is used when unset.
    pub catalog_path: Option<PathBuf>,
    pub log_format: LogFormat,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            filter_debounce: DEFAULT_DEBOUNCE,
            postal_lookup_url: DEFAULT_POSTAL_LOOKUP_URL.to_string(),
            postal_lookup_timeout: DEFAULT_POSTAL_LOOKUP_TIMEOUT,
            image_base: DEFAULT_IMAGE_BASE.to_string(),
            country: DEFAULT_COUNTRY.to_string(),
            catalog_path: None,
            log_format: LogFormat::default(),
        }
    }
}

impl StorefrontConfig {
    /// Read `STOREFRONT_*` variables, falling back to defaults for unset ones.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_source(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) over an arbitrary key lookup.
    pub fn from_source(var: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let defaults = Self::default();

        let filter_debounce = match var("STOREFRONT_FILTER_DEBOUNCE_MS") {
            Some(ms) => parse_millis("STOREFRONT_FILTER_DEBOUNCE_MS", &ms)?,
            None => {
                tracing::info!("STOREFRONT_FILTER_DEBOUNCE_MS not set, using default: {:?}", defaults.filter_debounce);
                defaults.filter_debounce
            }
        };
        let postal_lookup_timeout = match var("STOREFRONT_POSTAL_LOOKUP_TIMEOUT_MS") {
            Some(ms) => parse_millis("STOREFRONT_POSTAL_LOOKUP_TIMEOUT_MS", &ms)?,
            None => defaults.postal_lookup_timeout,
        };
        let log_format = match var("STOREFRONT_LOG_FORMAT") {
            Some(name) => LogFormat::parse(&name)
                .with_context(|| format!("invalid STOREFRONT_LOG_FORMAT value {name:?} (expected json or pretty)"))?,
            None => defaults.log_format,
        };

        Ok(Self {
            filter_debounce,
            postal_lookup_url: or_default(&var, "STOREFRONT_POSTAL_LOOKUP_URL", defaults.postal_lookup_url),
            postal_lookup_timeout,
            image_base: or_default(&var, "STOREFRONT_IMAGE_BASE", defaults.image_base),
            country: or_default(&var, "STOREFRONT_COUNTRY", defaults.country),
            catalog_path: var("STOREFRONT_CATALOG_PATH")
                .filter(|path| !path.trim().is_empty())
                .map(PathBuf::from),
            log_format,
        })
    }
}

fn or_default(var: &impl Fn(&str) -> Option<String>, key: &str, default: String) -> String {
    match var(key).filter(|value| !value.trim().is_empty()) {
        Some(value) => value,
        None => {
            tracing::info!("{key} not set, using default: {default}");
            default
        }
    }
}

fn parse_millis(key: &str, value: &str) -> anyhow::Result<Duration> {
    let ms: u64 = value
        .trim()
        .parse()
        .with_context(|| format!("invalid {key} value {value:?}"))?;
    Ok(Duration::from_millis(ms))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn source(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn unset_variables_use_defaults() {
        let config = StorefrontConfig::from_source(source(&[])).unwrap();
        assert_eq!(config, StorefrontConfig::default());
        assert_eq!(config.filter_debounce, Duration::from_millis(100));
        assert_eq!(config.country, "Brasil");
        assert!(config.catalog_path.is_none());
    }

    #[test]
    fn variables_override_defaults() {
        let config = StorefrontConfig::from_source(source(&[
            ("STOREFRONT_FILTER_DEBOUNCE_MS", "250"),
            ("STOREFRONT_POSTAL_LOOKUP_URL", "http://localhost:9000"),
            ("STOREFRONT_IMAGE_BASE", "https://cdn.example.com/imgs"),
            ("STOREFRONT_CATALOG_PATH", "/srv/catalog.json"),
            ("STOREFRONT_LOG_FORMAT", "pretty"),
        ]))
        .unwrap();

        assert_eq!(config.filter_debounce, Duration::from_millis(250));
        assert_eq!(config.postal_lookup_url, "http://localhost:9000");
        assert_eq!(config.image_base, "https://cdn.example.com/imgs");
        assert_eq!(config.catalog_path, Some(PathBuf::from("/srv/catalog.json")));
        assert_eq!(config.log_format, LogFormat::Pretty);
    }

    #[test]
    fn malformed_duration_is_an_error_not_a_panic() {
        let err = StorefrontConfig::from_source(source(&[("STOREFRONT_POSTAL_LOOKUP_TIMEOUT_MS", "soon")])).unwrap_err();
        assert!(err.to_string().contains("STOREFRONT_POSTAL_LOOKUP_TIMEOUT_MS"));
    }

    #[test]
    fn unknown_log_format_is_rejected() {
        assert!(StorefrontConfig::from_source(source(&[("STOREFRONT_LOG_FORMAT", "xml")])).is_err());
    }
}
