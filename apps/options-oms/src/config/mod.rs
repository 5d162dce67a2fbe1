//! Configuration module for the order management system.
//!
//! Provides configuration loading, validation, and environment variable
//! interpolation for all OMS components.
//!
//! # Usage
//!
//! ```rust,ignore
//! use options_oms::config::{Config, load_config};
//!
//! // Load from default path (config.yaml)
//! let config = load_config(None)?;
//!
//! // Load from custom path
//! let config = load_config(Some("custom/config.yaml"))?;
//!
//! println!("Fill delay: {:?}", config.execution.fill_delay());
//! ```

mod execution;
mod limits;
mod observability;
mod persistence;
mod recovery;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use execution::{ExecutionConfig, SchedulingRetryConfig};
pub use limits::LimitsConfig;
pub use observability::{LoggingConfig, MetricsConfig, ObservabilityConfig};
pub use persistence::PersistenceConfig;
pub use recovery::RecoveryConfig;

use crate::application::services::OmsSettings;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read configuration file.
    #[error("Failed to read config file '{path}': {source}")]
    ReadError {
        /// Path to the config file.
        path: String,
        /// The underlying IO error.
        source: std::io::Error,
    },

    /// Failed to parse YAML configuration.
    #[error("Failed to parse config YAML: {0}")]
    ParseError(#[from] serde_yaml_bw::Error),

    /// Configuration validation failed.
    #[error("Config validation failed: {0}")]
    ValidationError(String),
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Order execution configuration.
    #[serde(default)]
    pub execution: ExecutionConfig,
    /// Pre-trade limits and commission.
    #[serde(default)]
    pub limits: LimitsConfig,
    /// State persistence configuration.
    #[serde(default)]
    pub persistence: PersistenceConfig,
    /// Stale order recovery configuration.
    #[serde(default)]
    pub recovery: RecoveryConfig,
    /// Observability configuration.
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

impl Config {
    /// Runtime settings for the OMS facade.
    #[must_use]
    pub fn to_oms_settings(&self) -> OmsSettings {
        OmsSettings {
            commission_per_contract: self.limits.commission_per_contract,
            validation: self.limits.to_validation_policy(),
            stale_order_policy: self.recovery.stale_order_policy,
            submitted_grace_period: self.recovery.grace_period(),
            sweep_interval: self.recovery.sweep_interval(),
        }
    }
}

// ============================================
// Configuration Loading
// ============================================

/// Load configuration from a YAML file with environment variable interpolation.
///
/// # Arguments
///
/// * `path` - Optional path to the config file. Defaults to "config.yaml".
///
/// # Errors
///
/// Returns a `ConfigError` if the file cannot be read, parsed, or validated.
pub fn load_config(path: Option<&str>) -> Result<Config, ConfigError> {
    let path = path.unwrap_or("config.yaml");

    // Read the config file
    let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_string(),
        source: e,
    })?;

    load_config_from_string(&contents)
}

/// Load configuration, falling back to defaults when the file does not exist.
///
/// # Errors
///
/// Returns a `ConfigError` if an existing file cannot be read, parsed, or
/// validated.
pub fn load_config_or_default(path: Option<&str>) -> Result<Config, ConfigError> {
    match load_config(path) {
        Err(ConfigError::ReadError { source, .. })
            if source.kind() == std::io::ErrorKind::NotFound =>
        {
            let config = Config::default();
            validate_config(&config)?;
            Ok(config)
        }
        other => other,
    }
}

/// Load configuration from a YAML string (useful for testing).
///
/// # Errors
///
/// Returns a `ConfigError` if the YAML cannot be parsed or validated.
pub fn load_config_from_string(yaml: &str) -> Result<Config, ConfigError> {
    let interpolated = interpolate_env_vars(yaml);
    let config: Config = serde_yaml_bw::from_str(&interpolated)?;
    validate_config(&config)?;
    Ok(config)
}

/// Interpolate environment variables in a string.
///
/// Supports both `${VAR}` and `${VAR:-default}` syntax.
#[allow(clippy::expect_used)] // Regex is compile-time constant
fn interpolate_env_vars(input: &str) -> String {
    use std::sync::OnceLock;

    static ENV_VAR_REGEX: OnceLock<regex::Regex> = OnceLock::new();

    let re = ENV_VAR_REGEX.get_or_init(|| {
        regex::Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)(?::-([^}]*))?\}")
            .expect("env var regex is valid")
    });

    re.replace_all(input, |cap: &regex::Captures<'_>| {
        let default_value = cap.get(2).map(|m| m.as_str());
        match std::env::var(&cap[1]) {
            Ok(v) if !v.is_empty() => v,
            _ => default_value.map_or_else(String::new, str::to_string),
        }
    })
    .into_owned()
}

/// Validate configuration values.
///
/// # Errors
///
/// Returns `ConfigError::ValidationError` naming the first invalid field.
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    let execution = &config.execution;
    if !(0.0..=1.0).contains(&execution.rejection_rate) {
        return Err(ConfigError::ValidationError(
            "execution.rejection_rate must be between 0.0 and 1.0".to_string(),
        ));
    }

    if execution.max_workers == 0 {
        return Err(ConfigError::ValidationError(
            "execution.max_workers must be positive".to_string(),
        ));
    }

    let retry = &execution.scheduling_retry;
    if retry.backoff_multiplier < 1.0 {
        return Err(ConfigError::ValidationError(
            "execution.scheduling_retry.backoff_multiplier must be at least 1.0".to_string(),
        ));
    }

    if !(0.0..=1.0).contains(&retry.jitter_factor) {
        return Err(ConfigError::ValidationError(
            "execution.scheduling_retry.jitter_factor must be between 0.0 and 1.0".to_string(),
        ));
    }

    let limits = &config.limits;
    if limits.max_order_value <= rust_decimal::Decimal::ZERO {
        return Err(ConfigError::ValidationError(
            "limits.max_order_value must be positive".to_string(),
        ));
    }

    if limits.max_spread_width <= rust_decimal::Decimal::ZERO {
        return Err(ConfigError::ValidationError(
            "limits.max_spread_width must be positive".to_string(),
        ));
    }

    if limits.commission_per_contract < rust_decimal::Decimal::ZERO {
        return Err(ConfigError::ValidationError(
            "limits.commission_per_contract cannot be negative".to_string(),
        ));
    }

    if config.recovery.sweep_interval_secs == 0 {
        return Err(ConfigError::ValidationError(
            "recovery.sweep_interval_secs must be positive".to_string(),
        ));
    }

    let valid_formats = ["json", "pretty"];
    if !valid_formats.contains(&config.observability.logging.format.as_str()) {
        return Err(ConfigError::ValidationError(format!(
            "observability.logging.format must be one of: {valid_formats:?}"
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::StaleOrderPolicy;
    use rust_decimal_macros::dec;
    use std::time::Duration;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert!(config.execution.paper_trading);
        assert_eq!(config.execution.fill_delay(), Duration::from_secs(5));
        assert!((config.execution.rejection_rate - 0.02).abs() < f64::EPSILON);
        assert_eq!(config.execution.max_workers, 4);
        assert_eq!(config.limits.max_order_value, dec!(50000));
        assert_eq!(config.limits.commission_per_contract, dec!(0.65));
        assert_eq!(config.limits.max_spread_width, dec!(20));
        assert!(config.limits.market_hours_only);
        assert!(config.persistence.enabled);
        assert_eq!(
            config.persistence.state_file.to_str(),
            Some("./data/oms_state.json")
        );
        assert_eq!(config.recovery.stale_order_policy, StaleOrderPolicy::Manual);
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_load_empty_config_uses_defaults() {
        let config = match load_config_from_string("{}") {
            Ok(c) => c,
            Err(e) => panic!("should load empty config: {e}"),
        };
        assert_eq!(config.execution.fill_delay_ms, 5000);
        assert_eq!(config.recovery.submitted_grace_period_secs, 300);
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let config = load_config_or_default(Some("/nonexistent/oms/config.yaml")).unwrap();
        assert!(config.execution.paper_trading);
    }

    #[test]
    fn test_missing_file_is_error_for_load_config() {
        let Err(err) = load_config(Some("/nonexistent/oms/config.yaml")) else {
            panic!("expected read error");
        };
        assert!(matches!(err, ConfigError::ReadError { .. }));
    }

    #[test]
    fn test_env_var_with_default_when_missing() {
        let input = "format: ${OMS_CONFIG_TEST_NONEXISTENT_VAR:-pretty}";
        assert_eq!(interpolate_env_vars(input), "format: pretty");
    }

    #[test]
    fn test_env_var_without_default_becomes_empty() {
        let input = "listen_addr: ${OMS_CONFIG_TEST_UNLIKELY_TO_EXIST}";
        assert_eq!(interpolate_env_vars(input), "listen_addr: ");
    }

    #[test]
    #[expect(clippy::literal_string_with_formatting_args)] // ${...} is env var syntax
    fn test_env_var_with_default_uses_existing() {
        let input = "path: ${PATH:-default}";
        let result = interpolate_env_vars(input);
        assert_ne!(result, "path: default");
        assert!(result.starts_with("path: "));
    }

    #[test]
    fn test_validation_rejection_rate_out_of_range() {
        let yaml = r"
execution:
  rejection_rate: 1.5
";
        let Err(err) = load_config_from_string(yaml) else {
            panic!("expected error for invalid rejection_rate");
        };
        assert!(err.to_string().contains("rejection_rate"));
    }

    #[test]
    fn test_validation_zero_workers() {
        let yaml = r"
execution:
  max_workers: 0
";
        let Err(err) = load_config_from_string(yaml) else {
            panic!("expected error for zero workers");
        };
        assert!(err.to_string().contains("max_workers"));
    }

    #[test]
    fn test_validation_non_positive_limit() {
        let yaml = r"
limits:
  max_spread_width: 0
";
        let Err(err) = load_config_from_string(yaml) else {
            panic!("expected error for zero spread width");
        };
        assert!(err.to_string().contains("max_spread_width"));
    }

    #[test]
    fn test_validation_invalid_log_format() {
        let yaml = r"
observability:
  logging:
    format: xml
";
        let Err(err) = load_config_from_string(yaml) else {
            panic!("expected error for log format");
        };
        assert!(err.to_string().contains("format"));
    }

    #[test]
    fn test_full_config_parse() {
        let yaml = r#"
execution:
  paper_trading: true
  fill_delay_ms: 250
  rejection_rate: 0.0
  max_workers: 8
  scheduling_retry:
    max_attempts: 3
    initial_backoff_ms: 10

limits:
  max_order_value: 25000
  commission_per_contract: "0.50"
  max_spread_width: 10
  market_hours_only: false

persistence:
  enabled: false
  state_file: /tmp/oms.json

recovery:
  stale_order_policy: EXPIRE
  submitted_grace_period_secs: 60
  sweep_interval_secs: 5

observability:
  logging:
    level: "debug"
    format: "pretty"
  metrics:
    listen_addr: "127.0.0.1:9090"
"#;

        let config = match load_config_from_string(yaml) {
            Ok(c) => c,
            Err(e) => panic!("should load full config: {e}"),
        };

        assert_eq!(config.execution.fill_delay(), Duration::from_millis(250));
        assert_eq!(config.execution.max_workers, 8);
        assert_eq!(config.execution.scheduling_retry.max_attempts, 3);
        assert_eq!(config.limits.max_order_value, dec!(25000));
        assert_eq!(config.limits.commission_per_contract, dec!(0.50));
        assert!(!config.limits.market_hours_only);
        assert!(!config.persistence.enabled);
        assert_eq!(config.recovery.stale_order_policy, StaleOrderPolicy::Expire);
        assert_eq!(config.observability.logging.format, "pretty");
        assert_eq!(
            config.observability.metrics.listen_addr.as_deref(),
            Some("127.0.0.1:9090")
        );

        let settings = config.to_oms_settings();
        assert_eq!(settings.validation.max_spread_width, dec!(10));
        assert_eq!(settings.submitted_grace_period, Duration::from_secs(60));
    }
}
