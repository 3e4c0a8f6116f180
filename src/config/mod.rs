use dashmap::DashMap;
use std::env;
use std::sync::Arc;

pub const CONTROLLER_PARAM_KEY: &str = "ALLO_CONTROLLER_PARAM";
pub const ACTION_PARAM_KEY: &str = "ALLO_ACTION_PARAM";

/// Configuration service
///
/// Values set explicitly take precedence. A service made by [`new`](Self::new)
/// falls back to the process environment, read per lookup and never copied.
#[derive(Clone, Default)]
pub struct ConfigService {
    config: Arc<DashMap<String, String>>,
    read_env: bool,
}

impl ConfigService {
    /// Configuration backed by the process environment.
    pub fn new() -> Self {
        Self {
            config: Arc::default(),
            read_env: true,
        }
    }

    /// Configuration holding only `values`, ignoring the environment.
    pub fn with_values<K, V>(values: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let service = Self::default();
        for (key, value) in values {
            service.set(key.as_ref(), value.as_ref());
        }
        service
    }

    pub fn get(&self, key: &str) -> Option<String> {
        match self.config.get(key) {
            Some(value) => Some(value.clone()),
            None if self.read_env => env::var(key).ok(),
            None => None,
        }
    }

    pub fn get_or(&self, key: &str, default: &str) -> String {
        self.get(key)
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| default.to_string())
    }

    pub fn set(&self, key: &str, value: &str) {
        self.config.insert(key.to_string(), value.to_string());
    }
}

/// Names of the route parameters that override the routed controller and action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchConfig {
    pub controller_param: String,
    pub action_param: String,
}

impl DispatchConfig {
    pub fn from_config(config: &ConfigService) -> Self {
        Self {
            controller_param: config.get_or(CONTROLLER_PARAM_KEY, "controller"),
            action_param: config.get_or(ACTION_PARAM_KEY, "action"),
        }
    }

    pub fn from_env() -> Self {
        Self::from_config(&ConfigService::new())
    }
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            controller_param: "controller".to_string(),
            action_param: "action".to_string(),
        }
    }
}
