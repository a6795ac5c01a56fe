use std::{path::PathBuf, str::FromStr, time::Duration};

use url::Url;

pub const DEFAULT_FEATURED_PRICE: &str = "14.99";
pub const DEFAULT_UPLOADS_PAGE_SIZE: usize = 50;
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_SESSION_DIR: &str = ".creator-desk";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing {0}")]
    Missing(&'static str),
    #[error("Invalid {key}: {value}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub features: FeatureConfig,
    pub catalog: CatalogConfig,
    pub uploads: UploadsConfig,
    pub session: SessionConfig,
}

impl AppConfig {
    /// Reads `.env` (if any) and then the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        build_config(|key| std::env::var(key).ok())
    }
}

#[derive(Clone, Debug)]
pub struct ApiConfig {
    pub base_url: Url,
    pub timeout: Duration,
}

#[derive(Clone, Debug)]
pub struct FeatureConfig {
    /// When false the whole subscription surface is omitted and never fetched.
    pub subscriptions_enabled: bool,
}

#[derive(Clone, Debug)]
pub struct CatalogConfig {
    pub featured_price: String,
}

#[derive(Clone, Debug)]
pub struct UploadsConfig {
    pub page_size: usize,
}

#[derive(Clone, Debug)]
pub struct SessionConfig {
    pub store_dir: PathBuf,
}

pub fn build_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    info!("Building AppConfig...");
    let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

    let raw_base = get("DESK_API_BASE_URL").ok_or(ConfigError::Missing("DESK_API_BASE_URL"))?;
    let base_url = Url::parse(&raw_base).map_err(|_| ConfigError::Invalid {
        key: "DESK_API_BASE_URL",
        value: raw_base.clone(),
    })?;
    if !matches!(base_url.scheme(), "http" | "https") {
        return Err(ConfigError::Invalid {
            key: "DESK_API_BASE_URL",
            value: raw_base,
        });
    }

    let timeout_secs = parse_or("DESK_HTTP_TIMEOUT_SECS", get("DESK_HTTP_TIMEOUT_SECS"), DEFAULT_HTTP_TIMEOUT_SECS)?;
    let disable_subscriptions = parse_or("DESK_DISABLE_SUBSCRIPTIONS", get("DESK_DISABLE_SUBSCRIPTIONS"), false)?;
    let page_size = parse_or("DESK_UPLOADS_PAGE_SIZE", get("DESK_UPLOADS_PAGE_SIZE"), DEFAULT_UPLOADS_PAGE_SIZE)?;
    if page_size == 0 {
        return Err(ConfigError::Invalid {
            key: "DESK_UPLOADS_PAGE_SIZE",
            value: "0".to_string(),
        });
    }

    let config = AppConfig {
        api: ApiConfig {
            base_url,
            timeout: Duration::from_secs(timeout_secs),
        },
        features: FeatureConfig {
            subscriptions_enabled: !disable_subscriptions,
        },
        catalog: CatalogConfig {
            featured_price: get("DESK_FEATURED_PRICE").unwrap_or_else(|| DEFAULT_FEATURED_PRICE.to_string()),
        },
        uploads: UploadsConfig { page_size },
        session: SessionConfig {
            store_dir: get("DESK_SESSION_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_SESSION_DIR)),
        },
    };
    info!("AppConfig built");

    Ok(config)
}

fn parse_or<T: FromStr>(key: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError> {
    match raw {
        Some(value) => value.parse::<T>().map_err(|_| ConfigError::Invalid { key, value }),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = build_config(lookup(&[("DESK_API_BASE_URL", "https://api.example.com")])).unwrap();

        assert_eq!(config.api.base_url.as_str(), "https://api.example.com/");
        assert_eq!(config.api.timeout, Duration::from_secs(30));
        assert!(config.features.subscriptions_enabled);
        assert_eq!(config.catalog.featured_price, "14.99");
        assert_eq!(config.uploads.page_size, 50);
        assert_eq!(config.session.store_dir, PathBuf::from(".creator-desk"));
    }

    #[test]
    fn test_missing_base_url_is_fatal() {
        let err = build_config(lookup(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("DESK_API_BASE_URL")));

        let err = build_config(lookup(&[("DESK_API_BASE_URL", "   ")])).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("DESK_API_BASE_URL")));
    }

    #[test]
    fn test_invalid_values() {
        let err = build_config(lookup(&[("DESK_API_BASE_URL", "not a url")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "DESK_API_BASE_URL", .. }));

        let err = build_config(lookup(&[("DESK_API_BASE_URL", "ftp://files.example.com")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "DESK_API_BASE_URL", .. }));

        let err = build_config(lookup(&[
            ("DESK_API_BASE_URL", "https://api.example.com"),
            ("DESK_DISABLE_SUBSCRIPTIONS", "yes"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "DESK_DISABLE_SUBSCRIPTIONS", .. }));

        let err = build_config(lookup(&[
            ("DESK_API_BASE_URL", "https://api.example.com"),
            ("DESK_UPLOADS_PAGE_SIZE", "0"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "DESK_UPLOADS_PAGE_SIZE", .. }));
    }

    #[test]
    fn test_overrides() {
        let config = build_config(lookup(&[
            ("DESK_API_BASE_URL", "http://localhost:8080"),
            ("DESK_DISABLE_SUBSCRIPTIONS", "true"),
            ("DESK_FEATURED_PRICE", "9.99"),
            ("DESK_UPLOADS_PAGE_SIZE", "20"),
            ("DESK_HTTP_TIMEOUT_SECS", "5"),
            ("DESK_SESSION_DIR", "/tmp/desk"),
        ]))
        .unwrap();

        assert!(!config.features.subscriptions_enabled);
        assert_eq!(config.catalog.featured_price, "9.99");
        assert_eq!(config.uploads.page_size, 20);
        assert_eq!(config.api.timeout, Duration::from_secs(5));
        assert_eq!(config.session.store_dir, PathBuf::from("/tmp/desk"));
    }
}
