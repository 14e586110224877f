// SPDX-License-Identifier: MIT OR Apache-2.0

//! Environment variable configuration provider.
//!
//! This module provides a provider that reads configuration values from
//! environment variables. A double underscore in a variable name stands for the
//! key delimiter, so `DATABASE__HOST` becomes `DATABASE:HOST`.

use crate::domain::config_key::strip_prefix_ignore_case;
use crate::domain::{ConfigData, ConfigKey, ProviderData, Result, KEY_DELIMITER};
use crate::ports::{ConfigProvider, ConfigSource};
use crate::service::ConfigBuilder;
use std::env;
use std::sync::Arc;

/// Maximum length for environment variable keys (prevents DoS)
const MAX_ENV_KEY_LEN: usize = 512;

/// Maximum length for environment variable values (prevents DoS)
const MAX_ENV_VALUE_LEN: usize = 1048576; // 1MB

const NAME: &str = "env";

/// Configuration provider for environment variables.
///
/// With a prefix, only variables whose names start with it (ignoring case) are
/// read, and the prefix is removed from the key.
///
/// # Examples
///
/// ```rust
/// use layercfg::adapters::EnvVarProvider;
/// use layercfg::ports::ConfigProvider;
///
/// let provider = EnvVarProvider::from_vars(
///     Some("MYAPP_"),
///     [("MYAPP_DATABASE__HOST", "localhost"), ("OTHER", "x")],
/// );
/// provider.load().unwrap();
///
/// assert_eq!(provider.try_get("database:host"), Some(Some("localhost".to_string())));
/// assert_eq!(provider.try_get("other"), None);
/// ```
#[derive(Debug, Default)]
pub struct EnvVarProvider {
    /// Optional prefix to filter environment variables
    prefix: Option<String>,
    /// Fixed variables used instead of the process environment
    vars: Option<Vec<(String, String)>>,
    data: ProviderData,
}

impl EnvVarProvider {
    /// Creates a provider over every variable of the process.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a provider over the variables starting with `prefix`.
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: Some(prefix.into()),
            ..Self::default()
        }
    }

    /// Creates a provider over an explicit variable list instead of the process
    /// environment.
    pub fn from_vars<I, K, V>(prefix: Option<&str>, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            prefix: prefix.map(str::to_string),
            vars: Some(
                vars.into_iter()
                    .map(|(key, value)| (key.into(), value.into()))
                    .collect(),
            ),
            data: ProviderData::new(),
        }
    }

    fn read_vars(&self) -> Result<ConfigData> {
        let vars: Box<dyn Iterator<Item = (String, String)> + '_> = match &self.vars {
            Some(vars) => Box::new(vars.iter().cloned()),
            None => Box::new(env::vars()),
        };

        let mut data = ConfigData::new();
        for (name, value) in vars {
            // Validate input sizes to prevent DoS
            if name.len() > MAX_ENV_KEY_LEN || value.len() > MAX_ENV_VALUE_LEN {
                tracing::debug!(
                    "Skipping oversized environment variable: key_len={}, value_len={} (max key={}, max value={})",
                    name.len(),
                    value.len(),
                    MAX_ENV_KEY_LEN,
                    MAX_ENV_VALUE_LEN
                );
                continue;
            }

            let name = match &self.prefix {
                Some(prefix) => match strip_prefix_ignore_case(&name, prefix) {
                    Some(stripped) => stripped,
                    None => continue,
                },
                None => name.as_str(),
            };

            // Names are case-sensitive on Unix; the last of several case variants wins.
            let key = ConfigKey::from(normalize(name));
            if data.contains_key(&key) {
                tracing::debug!("Environment variable '{}' overrides an earlier case variant", name);
            }
            data.insert(key, Some(value));
        }

        Ok(data)
    }
}

fn normalize(name: &str) -> String {
    name.replace("__", &KEY_DELIMITER.to_string())
}

impl ConfigProvider for EnvVarProvider {
    fn name(&self) -> &str {
        NAME
    }

    fn data(&self) -> &ProviderData {
        &self.data
    }

    fn load(&self) -> Result<()> {
        let data = self.read_vars()?;
        tracing::debug!(
            "Loaded {} environment variables (prefix={:?})",
            data.len(),
            self.prefix
        );
        self.data.replace(data);
        Ok(())
    }
}

/// Source for an [`EnvVarProvider`].
#[derive(Debug, Clone, Default)]
pub struct EnvVarSource {
    prefix: Option<String>,
}

impl EnvVarSource {
    /// Reads every variable of the process.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads the variables starting with `prefix`.
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: Some(prefix.into()),
        }
    }
}

impl ConfigSource for EnvVarSource {
    fn build(&self, _builder: &ConfigBuilder) -> Result<Arc<dyn ConfigProvider>> {
        Ok(Arc::new(match &self.prefix {
            Some(prefix) => EnvVarProvider::with_prefix(prefix.clone()),
            None => EnvVarProvider::new(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Helper to set and clean up environment variables
    struct EnvGuard {
        keys: Vec<String>,
    }

    impl EnvGuard {
        fn new() -> Self {
            EnvGuard { keys: Vec::new() }
        }

        fn set(&mut self, key: &str, value: &str) {
            env::set_var(key, value);
            self.keys.push(key.to_string());
        }
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            for key in &self.keys {
                env::remove_var(key);
            }
        }
    }

    fn loaded(provider: EnvVarProvider) -> EnvVarProvider {
        provider.load().unwrap();
        provider
    }

    #[test]
    fn test_env_provider_name() {
        assert_eq!(EnvVarProvider::new().name(), "env");
    }

    #[test]
    fn test_env_provider_reads_process_env() {
        let mut guard = EnvGuard::new();
        guard.set("LAYERCFG_TEST_READ__INNER", "test_value");

        let provider = loaded(EnvVarProvider::new());

        assert_eq!(
            provider.try_get("layercfg_test_read:inner"),
            Some(Some("test_value".to_string()))
        );
    }

    #[test]
    fn test_env_provider_missing_var() {
        let provider = loaded(EnvVarProvider::from_vars(None, [("A", "1")]));
        assert_eq!(provider.try_get("NONEXISTENT_VAR_12345"), None);
    }

    #[test]
    fn test_env_provider_prefix_is_stripped_ignoring_case() {
        let provider = loaded(EnvVarProvider::from_vars(
            Some("myapp_"),
            [("MYAPP_DATABASE__HOST", "localhost"), ("OTHER_VAR", "no")],
        ));

        assert_eq!(
            provider.try_get("Database:Host"),
            Some(Some("localhost".to_string()))
        );
        assert_eq!(provider.try_get("OTHER_VAR"), None);
        assert_eq!(provider.data().len(), 1);
    }

    #[test]
    fn test_env_provider_single_underscore_kept() {
        let provider = loaded(EnvVarProvider::from_vars(None, [("MY_VAR", "value")]));
        assert_eq!(provider.try_get("my_var"), Some(Some("value".to_string())));
    }

    #[test]
    fn test_env_provider_last_case_variant_wins() {
        let provider = loaded(EnvVarProvider::from_vars(
            None,
            [("HTTP_PROXY", "http://upper"), ("http_proxy", "http://lower")],
        ));

        assert_eq!(provider.data().len(), 1);
        assert_eq!(
            provider.try_get("Http_Proxy"),
            Some(Some("http://lower".to_string()))
        );
    }

    #[test]
    fn test_env_provider_skips_oversized() {
        let big = "x".repeat(MAX_ENV_VALUE_LEN + 1);
        let provider = loaded(EnvVarProvider::from_vars(None, [("BIG", big.as_str())]));
        assert!(provider.data().is_empty());
    }

    #[test]
    fn test_env_provider_reload() {
        let mut guard = EnvGuard::new();
        guard.set("LAYERCFG_RELOAD_TEST", "initial");

        let provider = loaded(EnvVarProvider::with_prefix("LAYERCFG_RELOAD_"));
        assert_eq!(provider.try_get("TEST"), Some(Some("initial".to_string())));

        guard.set("LAYERCFG_RELOAD_TEST", "updated");
        provider.load().unwrap();

        assert_eq!(provider.try_get("TEST"), Some(Some("updated".to_string())));
    }
}
