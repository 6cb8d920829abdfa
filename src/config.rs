//! Pipeline configuration.
//!
//! Provider settings live next to their clients (`GoogleMapsConfig`,
//! `OsrmConfig`); this covers how the planner drives them.

use serde::{Deserialize, Serialize};

use crate::error::{Result, RouteError};

pub const MAX_CONCURRENCY_VAR: &str = "ROUTE_PLANNER_MAX_CONCURRENCY";
pub const RETRY_ATTEMPTS_VAR: &str = "ROUTE_PLANNER_RETRY_ATTEMPTS";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannerConfig {
    /// Upper bound on external calls in flight. 1 keeps the pipeline
    /// strictly sequential.
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,

    /// Extra attempts for retryable failures: network errors, timeouts and
    /// service throttling (geocoding included).
    #[serde(default)]
    pub retry_attempts: u32,
}

const fn default_max_concurrency() -> usize {
    1
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            max_concurrency: default_max_concurrency(),
            retry_attempts: 0,
        }
    }
}

impl PlannerConfig {
    pub fn for_testing() -> Self {
        Self {
            max_concurrency: 4,
            retry_attempts: 0,
        }
    }

    /// Reads overrides from the environment, keeping defaults for unset
    /// variables.
    pub fn from_env() -> Result<Self> {
        Self::from_vars(env_var)
    }

    pub(crate) fn from_vars(lookup: impl Fn(&str) -> Result<Option<String>>) -> Result<Self> {
        let mut config = Self::default();
        if let Some(value) = lookup(MAX_CONCURRENCY_VAR)? {
            config.max_concurrency = parse_var(MAX_CONCURRENCY_VAR, &value)?;
        }
        if let Some(value) = lookup(RETRY_ATTEMPTS_VAR)? {
            config.retry_attempts = parse_var(RETRY_ATTEMPTS_VAR, &value)?;
        }
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_concurrency == 0 {
            return Err(RouteError::config("max_concurrency must be at least 1"));
        }
        Ok(())
    }
}

/// Returns `None` for unset or blank variables.
pub(crate) fn env_var(name: &str) -> Result<Option<String>> {
    match std::env::var(name) {
        Ok(value) if value.trim().is_empty() => Ok(None),
        Ok(value) => Ok(Some(value.trim().to_string())),
        Err(std::env::VarError::NotPresent) => Ok(None),
        Err(std::env::VarError::NotUnicode(_)) => Err(RouteError::config(format!(
            "{name} value is not valid unicode"
        ))),
    }
}

fn parse_var<T: std::str::FromStr>(name: &str, value: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| RouteError::config(format!("{name}={value:?} is not a valid number")))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn test_default_config() {
        let config = PlannerConfig::default();
        assert_eq!(config.max_concurrency, 1);
        assert_eq!(config.retry_attempts, 0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_concurrency_is_rejected() {
        let config = PlannerConfig {
            max_concurrency: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(RouteError::Config(_))));
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let config: PlannerConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, PlannerConfig::default());

        let config: PlannerConfig = serde_json::from_str(r#"{"max_concurrency": 8}"#).unwrap();
        assert_eq!(config.max_concurrency, 8);
        assert_eq!(config.retry_attempts, 0);
    }

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Result<Option<String>> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect();
        move |name: &str| Ok(vars.get(name).cloned())
    }

    #[test]
    fn test_from_vars_applies_overrides() {
        let config = PlannerConfig::from_vars(lookup(&[
            (MAX_CONCURRENCY_VAR, "6"),
            (RETRY_ATTEMPTS_VAR, "2"),
        ]))
        .unwrap();
        assert_eq!(config.max_concurrency, 6);
        assert_eq!(config.retry_attempts, 2);
    }

    #[test]
    fn test_from_vars_keeps_defaults_for_unset() {
        let config = PlannerConfig::from_vars(lookup(&[])).unwrap();
        assert_eq!(config, PlannerConfig::default());
    }

    #[test]
    fn test_from_vars_rejects_bad_values() {
        let err = PlannerConfig::from_vars(lookup(&[(RETRY_ATTEMPTS_VAR, "-1")])).unwrap_err();
        assert!(err.to_string().contains(RETRY_ATTEMPTS_VAR));

        let err = PlannerConfig::from_vars(lookup(&[(MAX_CONCURRENCY_VAR, "0")])).unwrap_err();
        assert!(matches!(err, RouteError::Config(_)));
    }

    #[test]
    fn test_env_var_unset_is_none() {
        assert_eq!(env_var("ROUTE_PLANNER_UNSET_FOR_TESTS").unwrap(), None);
    }

    #[test]
    fn test_parse_var_reports_name() {
        let err = parse_var::<usize>(MAX_CONCURRENCY_VAR, "many").unwrap_err();
        assert!(err.to_string().contains(MAX_CONCURRENCY_VAR));
    }
}
