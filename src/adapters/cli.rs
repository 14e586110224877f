// SPDX-License-Identifier: MIT OR Apache-2.0

//! Command-line argument configuration provider.
//!
//! This module provides a provider that reads configuration values from
//! command-line arguments. Supported forms:
//! - `key=value`
//! - `--key=value` and `--key value`
//! - `/key=value` and `/key value`
//! - `-k value` and `-k=value`, only for switches declared in a switch mapping
//!
//! Arguments that match none of these (positional arguments) are ignored.

use crate::domain::config_key::keys_equal;
use crate::domain::{insert_unique, ConfigData, ConfigError, ProviderData, Result};
use crate::ports::{ConfigProvider, ConfigSource};
use crate::service::ConfigBuilder;
use std::sync::Arc;

const NAME: &str = "cli";

/// Configuration provider for command-line arguments.
///
/// The arguments are parsed on every load; a key given twice is a duplicate
/// key error.
///
/// # Examples
///
/// ```rust
/// use layercfg::adapters::CommandLineProvider;
/// use layercfg::ports::ConfigProvider;
///
/// let provider = CommandLineProvider::new(["--Server:Port", "8080", "-v=debug"])
///     .with_switch_mappings([("-v", "Logging:Level")])
///     .unwrap();
/// provider.load().unwrap();
///
/// assert_eq!(provider.try_get("server:port"), Some(Some("8080".to_string())));
/// assert_eq!(provider.try_get("logging:level"), Some(Some("debug".to_string())));
/// ```
#[derive(Debug, Default)]
pub struct CommandLineProvider {
    args: Vec<String>,
    switch_mappings: Vec<(String, String)>,
    data: ProviderData,
}

impl CommandLineProvider {
    /// Creates a provider over `args`, which must not include the program name.
    pub fn new<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            args: args.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Creates a provider over the arguments of the current process.
    pub fn from_env_args() -> Self {
        Self::new(std::env::args().skip(1))
    }

    /// Maps switches such as `-v` or `--verbose` to configuration keys.
    ///
    /// Every switch must start with `-` or `--`, and no switch may be mapped
    /// twice (ignoring case).
    pub fn with_switch_mappings<I, K, V>(mut self, mappings: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.switch_mappings = validate_switch_mappings(mappings)?;
        Ok(self)
    }

    fn mapped_key(&self, switch: &str) -> Option<&str> {
        self.switch_mappings
            .iter()
            .find(|(candidate, _)| keys_equal(candidate, switch))
            .map(|(_, key)| key.as_str())
    }

    fn parse(&self) -> Result<ConfigData> {
        let mut data = ConfigData::new();
        let mut args = self.args.iter();

        while let Some(arg) = args.next() {
            let (arg, prefix_len) = if arg.starts_with("--") {
                (arg.clone(), 2)
            } else if arg.starts_with('-') {
                (arg.clone(), 1)
            } else if let Some(rest) = arg.strip_prefix('/') {
                (format!("--{}", rest), 2)
            } else {
                (arg.clone(), 0)
            };

            let (key, value) = match arg.find('=') {
                None => {
                    if prefix_len == 0 {
                        tracing::debug!("Ignoring positional argument '{}'", arg);
                        continue;
                    }
                    let key = self.resolve_switch(&arg, prefix_len)?;
                    match args.next() {
                        Some(value) => (key, value.clone()),
                        None => {
                            tracing::debug!("Ignoring switch '{}' without a value", arg);
                            continue;
                        }
                    }
                }
                Some(separator) => {
                    let key = if prefix_len == 0 {
                        arg[..separator].to_string()
                    } else {
                        self.resolve_switch(&arg[..separator], prefix_len)?
                    };
                    (key, arg[separator + 1..].to_string())
                }
            };

            insert_unique(&mut data, NAME, key, Some(value))?;
        }

        Ok(data)
    }

    /// Resolves a switch (without any `=value` part) to its configuration key.
    fn resolve_switch(&self, switch: &str, prefix_len: usize) -> Result<String> {
        if let Some(key) = self.mapped_key(switch) {
            return Ok(key.to_string());
        }
        if prefix_len == 1 {
            return Err(ConfigError::SourceError {
                source_name: NAME.to_string(),
                message: format!("The short switch '{}' is not defined in the switch mappings", switch),
                source: None,
            });
        }
        Ok(switch[prefix_len..].to_string())
    }
}

fn validate_switch_mappings<I, K, V>(mappings: I) -> Result<Vec<(String, String)>>
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    let mut validated: Vec<(String, String)> = Vec::new();
    for (switch, key) in mappings {
        let switch = switch.into();
        if !switch.starts_with('-') {
            return Err(ConfigError::SourceError {
                source_name: NAME.to_string(),
                message: format!("The switch mapping '{}' must start with '-' or '--'", switch),
                source: None,
            });
        }
        if validated.iter().any(|(existing, _)| keys_equal(existing, &switch)) {
            return Err(ConfigError::SourceError {
                source_name: NAME.to_string(),
                message: format!("The switch mapping '{}' is defined more than once", switch),
                source: None,
            });
        }
        validated.push((switch, key.into()));
    }
    Ok(validated)
}

impl ConfigProvider for CommandLineProvider {
    fn name(&self) -> &str {
        NAME
    }

    fn data(&self) -> &ProviderData {
        &self.data
    }

    fn load(&self) -> Result<()> {
        let data = self.parse()?;
        tracing::debug!("Parsed {} command-line entries", data.len());
        self.data.replace(data);
        Ok(())
    }
}

/// Source for a [`CommandLineProvider`].
#[derive(Debug, Clone, Default)]
pub struct CommandLineSource {
    args: Vec<String>,
    switch_mappings: Vec<(String, String)>,
}

impl CommandLineSource {
    /// Creates a source over `args`.
    pub fn new<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            args: args.into_iter().map(Into::into).collect(),
            switch_mappings: Vec::new(),
        }
    }

    /// Creates a source over the arguments of the current process.
    pub fn from_env_args() -> Self {
        Self::new(std::env::args().skip(1))
    }

    /// Adds switch mappings; validated when the provider is built.
    pub fn with_switch_mappings<I, K, V>(mut self, mappings: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.switch_mappings.extend(
            mappings
                .into_iter()
                .map(|(switch, key)| (switch.into(), key.into())),
        );
        self
    }

    /// Creates a source from arguments already parsed by `clap`.
    ///
    /// `keys` maps argument ids to configuration keys. Arguments that were not
    /// supplied are skipped; for arguments supplied several times the last
    /// occurrence is used.
    ///
    /// ```rust
    /// use clap::{Arg, Command};
    /// use layercfg::adapters::CommandLineSource;
    /// use layercfg::prelude::*;
    ///
    /// let matches = Command::new("app")
    ///     .arg(Arg::new("port").long("port"))
    ///     .get_matches_from(["app", "--port", "8080"]);
    ///
    /// let root = ConfigBuilder::new()
    ///     .add(CommandLineSource::from_arg_matches(&matches, [("port", "Server:Port")]))
    ///     .build()
    ///     .unwrap();
    /// assert_eq!(root.get("server:port").as_deref(), Some("8080"));
    /// ```
    pub fn from_arg_matches<'a, I>(matches: &clap::ArgMatches, keys: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut args = Vec::new();
        for (id, key) in keys {
            let raw = matches.try_get_raw(id).ok().flatten();
            if let Some(value) = raw.and_then(|values| values.last()) {
                args.push(format!("--{}={}", key, value.to_string_lossy()));
            }
        }
        Self::new(args)
    }
}

impl ConfigSource for CommandLineSource {
    fn build(&self, _builder: &ConfigBuilder) -> Result<Arc<dyn ConfigProvider>> {
        let provider = CommandLineProvider::new(self.args.clone())
            .with_switch_mappings(self.switch_mappings.clone())?;
        Ok(Arc::new(provider))
    }
}
