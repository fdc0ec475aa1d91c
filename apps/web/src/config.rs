//! Web application configuration.
//!
//! Configuration is loaded from environment variables with fallback to defaults.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use picofi_core::Currency;
use picofi_session::DEFAULT_SESSION_TTL;

/// Web application configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebConfig {
    /// Listen address
    pub addr: SocketAddr,

    /// Currency every amount is entered and shown in
    pub currency: Currency,

    /// How long a session lives after it is created
    pub session_ttl: Duration,

    /// Period of the expired-session sweep, `None` when disabled
    pub sweep_interval: Option<Duration>,

    /// Read templates from this directory instead of the embedded set
    pub template_dir: Option<PathBuf>,
}

impl WebConfig {
    pub const DEFAULT_ADDR: &'static str = "127.0.0.1:8080";
    pub const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 300;
    /// Upper bound for the TTL and sweep period (one year).
    pub const MAX_DURATION_SECS: u64 = 365 * 24 * 60 * 60;

    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from any key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let addr = lookup("ADDR")
            .unwrap_or_else(|| Self::DEFAULT_ADDR.to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidValue("ADDR".to_string()))?;

        let currency: Currency = lookup("PICOFI_CURRENCY")
            .map(|v| v.trim().to_ascii_uppercase().parse())
            .transpose()
            .map_err(|_| ConfigError::InvalidValue("PICOFI_CURRENCY".to_string()))?
            .unwrap_or_default();

        let ttl_secs: u64 = lookup("PICOFI_SESSION_TTL_SECS")
            .map(|v| v.trim().parse())
            .transpose()
            .map_err(|_| ConfigError::InvalidValue("PICOFI_SESSION_TTL_SECS".to_string()))?
            .unwrap_or(DEFAULT_SESSION_TTL.as_secs());
        if ttl_secs == 0 || ttl_secs > Self::MAX_DURATION_SECS {
            return Err(ConfigError::InvalidValue("PICOFI_SESSION_TTL_SECS".to_string()));
        }

        let sweep_secs: u64 = lookup("PICOFI_SWEEP_INTERVAL_SECS")
            .map(|v| v.trim().parse())
            .transpose()
            .map_err(|_| ConfigError::InvalidValue("PICOFI_SWEEP_INTERVAL_SECS".to_string()))?
            .unwrap_or(Self::DEFAULT_SWEEP_INTERVAL_SECS);
        if sweep_secs > Self::MAX_DURATION_SECS {
            return Err(ConfigError::InvalidValue("PICOFI_SWEEP_INTERVAL_SECS".to_string()));
        }

        let template_dir = lookup("PICOFI_TEMPLATE_DIR")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from);

        Ok(WebConfig {
            addr,
            currency,
            session_ttl: Duration::from_secs(ttl_secs),
            sweep_interval: (sweep_secs > 0).then(|| Duration::from_secs(sweep_secs)),
            template_dir,
        })
    }
}

impl Default for WebConfig {
    fn default() -> Self {
        WebConfig {
            addr: SocketAddr::from(([127, 0, 0, 1], 8080)),
            currency: Currency::default(),
            session_ttl: DEFAULT_SESSION_TTL,
            sweep_interval: Some(Duration::from_secs(Self::DEFAULT_SWEEP_INTERVAL_SECS)),
            template_dir: None,
        }
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(pairs: &[(&str, &str)]) -> Result<WebConfig, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        WebConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        assert_eq!(load(&[]).unwrap(), WebConfig::default());
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("ADDR", "0.0.0.0:9000"),
            ("PICOFI_CURRENCY", "usd"),
            ("PICOFI_SESSION_TTL_SECS", "60"),
            ("PICOFI_SWEEP_INTERVAL_SECS", "0"),
            ("PICOFI_TEMPLATE_DIR", "/srv/picofi/templates"),
        ])
        .unwrap();

        assert_eq!(config.addr, "0.0.0.0:9000".parse().unwrap());
        assert_eq!(config.currency, Currency::Usd);
        assert_eq!(config.session_ttl, Duration::from_secs(60));
        assert_eq!(config.sweep_interval, None);
        assert_eq!(config.template_dir, Some(PathBuf::from("/srv/picofi/templates")));
    }

    #[test]
    fn test_one_year_is_the_longest_accepted_duration() {
        let config = load(&[
            ("PICOFI_SESSION_TTL_SECS", "31536000"),
            ("PICOFI_SWEEP_INTERVAL_SECS", "31536000"),
        ])
        .unwrap();
        assert_eq!(config.session_ttl, Duration::from_secs(WebConfig::MAX_DURATION_SECS));
        assert_eq!(
            config.sweep_interval,
            Some(Duration::from_secs(WebConfig::MAX_DURATION_SECS))
        );
    }

    #[test]
    fn test_invalid_values() {
        for (key, value) in [
            ("ADDR", "localhost"),
            ("PICOFI_CURRENCY", "BTC"),
            ("PICOFI_SESSION_TTL_SECS", "a day"),
            ("PICOFI_SESSION_TTL_SECS", "0"),
            ("PICOFI_SESSION_TTL_SECS", "31536001"),
            ("PICOFI_SESSION_TTL_SECS", "18446744073709551615"),
            ("PICOFI_SWEEP_INTERVAL_SECS", "-1"),
            ("PICOFI_SWEEP_INTERVAL_SECS", "31536001"),
        ] {
            match load(&[(key, value)]) {
                Err(ConfigError::InvalidValue(name)) => assert_eq!(name, key),
                other => panic!("{key}={value} should be rejected, got {other:?}"),
            }
        }
    }
}
