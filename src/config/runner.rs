//! Runner configuration: optional YAML file plus credentials from the environment

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use crate::exchanges::GateioSpot;
use crate::execution::GateCredentials;
use crate::strategy::MIN_ORDER_VALUE;
use crate::utils::poll::PollPolicy;

/// Env var pointing at the YAML config
pub const CONFIG_PATH_ENV: &str = "GATE_BUY_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "config/gate_market_buy.yaml";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    pub exchange: ExchangeSettings,
    pub order: OrderSettings,
    pub market_wait: MarketWaitSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ExchangeSettings {
    pub base_url: String,
    pub api_key_env: String,
    pub api_secret_env: String,
    /// No timeout when absent
    pub request_timeout_secs: Option<u64>,
}

impl Default for ExchangeSettings {
    fn default() -> Self {
        Self {
            base_url: GateioSpot::BASE.to_string(),
            api_key_env: "API_KEY".to_string(),
            api_secret_env: "SECRET_KEY".to_string(),
            request_timeout_secs: None,
        }
    }
}

impl ExchangeSettings {
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OrderSettings {
    pub min_order_value: f64,
}

impl Default for OrderSettings {
    fn default() -> Self {
        Self {
            min_order_value: MIN_ORDER_VALUE,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MarketWaitSettings {
    pub poll_interval_ms: u64,
    /// Poll forever when absent
    pub max_attempts: Option<u32>,
}

impl Default for MarketWaitSettings {
    fn default() -> Self {
        Self {
            poll_interval_ms: 1000,
            max_attempts: None,
        }
    }
}

impl MarketWaitSettings {
    pub fn poll_policy(&self) -> PollPolicy {
        let policy = PollPolicy::new(Duration::from_millis(self.poll_interval_ms));
        match self.max_attempts {
            Some(max) => policy.with_max_attempts(max),
            None => policy,
        }
    }
}

impl RunnerConfig {
    pub fn from_yaml(text: &str) -> Result<Self> {
        let config: RunnerConfig = serde_yaml::from_str(text).context("Invalid runner config")?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        let min = self.order.min_order_value;
        if !min.is_finite() || min < 0.0 {
            anyhow::bail!("order.min_order_value must be a non-negative number, got {}", min);
        }
        if self.market_wait.poll_interval_ms == 0 {
            anyhow::bail!("market_wait.poll_interval_ms must be at least 1");
        }
        if self.market_wait.max_attempts == Some(0) {
            anyhow::bail!("market_wait.max_attempts must be at least 1");
        }
        Ok(())
    }
}

/// Config path from `GATE_BUY_CONFIG`, else the default location
pub fn config_path() -> String {
    std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string())
}

/// Load the YAML runner config; a missing file means defaults
pub fn load_runner_config(path: &str) -> Result<RunnerConfig> {
    if !Path::new(path).exists() {
        log::info!("No config at {}, using defaults", path);
        return Ok(RunnerConfig::default());
    }

    let text = std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path))?;
    let config = RunnerConfig::from_yaml(&text).with_context(|| format!("Failed to load {}", path))?;
    log::info!("📋 Config loaded from {}", path);
    Ok(config)
}

/// Read API credentials from the environment.
///
/// Missing values are not fatal here; the exchange rejects the first signed
/// call instead.
pub fn load_gate_credentials(config: &RunnerConfig) -> GateCredentials {
    let read = |name: &str| {
        std::env::var(name).unwrap_or_else(|_| {
            log::warn!("⚠️  {} is not set", name);
            String::new()
        })
    };

    GateCredentials::new(
        read(&config.exchange.api_key_env),
        read(&config.exchange.api_secret_env),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RunnerConfig::default();
        assert_eq!(config.exchange.base_url, "https://api.gateio.ws");
        assert_eq!(config.exchange.api_key_env, "API_KEY");
        assert_eq!(config.exchange.api_secret_env, "SECRET_KEY");
        assert_eq!(config.exchange.request_timeout(), None);
        assert_eq!(config.order.min_order_value, 3.0);
        assert_eq!(config.market_wait.poll_policy(), PollPolicy::default());
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = RunnerConfig::from_yaml(
            r#"
exchange:
  request_timeout_secs: 15
market_wait:
  poll_interval_ms: 250
  max_attempts: 40
"#,
        )
        .unwrap();

        assert_eq!(config.exchange.api_key_env, "API_KEY");
        assert_eq!(config.exchange.request_timeout(), Some(Duration::from_secs(15)));
        assert_eq!(config.order.min_order_value, 3.0);

        let policy = config.market_wait.poll_policy();
        assert_eq!(policy.interval, Duration::from_millis(250));
        assert_eq!(policy.max_attempts, Some(40));
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(RunnerConfig::from_yaml("order:\n  min_order_value: -1\n").is_err());
        assert!(RunnerConfig::from_yaml("market_wait:\n  max_attempts: 0\n").is_err());
        assert!(RunnerConfig::from_yaml("market_wait:\n  poll_interval_ms: 0\n").is_err());
        assert!(RunnerConfig::from_yaml("market_wait: soon\n").is_err());
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let config = load_runner_config("does/not/exist.yaml").unwrap();
        assert_eq!(config.order.min_order_value, MIN_ORDER_VALUE);
    }
}
