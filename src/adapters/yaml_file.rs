// SPDX-License-Identifier: MIT OR Apache-2.0

//! YAML file configuration provider.
//!
//! This module provides the YAML parser and the source type for YAML files.

use crate::adapters::file::FileSource;
use crate::domain::{config_path, insert_unique, ConfigData, ConfigError, Result};
use crate::ports::ConfigParser;
use directories::ProjectDirs;
use serde_yaml::Value;

/// File name used by `YamlFileSource::from_default_location`.
pub const DEFAULT_FILE_NAME: &str = "config.yaml";

/// YAML parser implementation.
///
/// This parser converts YAML documents into flat key/value maps, joining nested
/// names with `:`.
///
/// # Examples
///
/// ```rust
/// use layercfg::adapters::YamlParser;
/// use layercfg::ports::ConfigParser;
/// use layercfg::domain::ConfigKey;
///
/// let parser = YamlParser::new();
/// let yaml_content = "database:\n  host: localhost\n  port: 5432";
/// let result = parser.parse(yaml_content, "example").unwrap();
/// assert_eq!(
///     result.get(&ConfigKey::from("database:host")),
///     Some(&Some("localhost".to_string()))
/// );
/// ```
#[derive(Debug, Clone, Default)]
pub struct YamlParser;

impl YamlParser {
    /// Creates a new YAML parser.
    pub fn new() -> Self {
        YamlParser
    }

    fn flatten(value: &Value, prefix: &str, source_name: &str, out: &mut ConfigData) -> Result<()> {
        match value {
            Value::Mapping(map) if map.is_empty() => {
                insert_unique(out, source_name, prefix, None)?;
            }
            Value::Mapping(map) => {
                for (key, val) in map {
                    let key = Self::key_text(key, prefix)?;
                    let path = if prefix.is_empty() {
                        key
                    } else {
                        config_path::combine([prefix, key.as_str()])
                    };
                    Self::flatten(val, &path, source_name, out)?;
                }
            }
            Value::Sequence(seq) if seq.is_empty() => {
                insert_unique(out, source_name, prefix, None)?;
            }
            Value::Sequence(seq) => {
                for (i, val) in seq.iter().enumerate() {
                    let path = config_path::combine([prefix, i.to_string().as_str()]);
                    Self::flatten(val, &path, source_name, out)?;
                }
            }
            Value::Tagged(tagged) => Self::flatten(&tagged.value, prefix, source_name, out)?,
            scalar => {
                insert_unique(out, source_name, prefix, Some(Self::scalar_text(scalar)))?;
            }
        }
        Ok(())
    }

    fn key_text(key: &Value, parent: &str) -> Result<String> {
        match key {
            Value::String(s) => Ok(s.clone()),
            Value::Number(n) => Ok(n.to_string()),
            Value::Bool(b) => Ok(b.to_string()),
            _ => Err(ConfigError::ParseError {
                message: format!("Unsupported mapping key under '{}': {:?}", parent, key),
                source: None,
            }),
        }
    }

    fn scalar_text(value: &Value) -> String {
        match value {
            Value::String(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            _ => String::new(),
        }
    }
}

impl ConfigParser for YamlParser {
    fn parse(&self, content: &str, source_name: &str) -> Result<ConfigData> {
        let value: Value = serde_yaml::from_str(content).map_err(|e| ConfigError::ParseError {
            message: format!("Failed to parse YAML in '{}': {}", source_name, e),
            source: Some(Box::new(e)),
        })?;

        let mut result = ConfigData::new();
        match &value {
            Value::Null => {}
            Value::Mapping(map) if map.is_empty() => {}
            Value::Mapping(_) => Self::flatten(&value, "", source_name, &mut result)?,
            _ => {
                return Err(ConfigError::ParseError {
                    message: format!("Top-level YAML in '{}' must be a mapping", source_name),
                    source: None,
                })
            }
        }
        Ok(result)
    }

    fn supported_extensions(&self) -> &[&str] {
        &["yaml", "yml"]
    }
}

/// Source for a YAML configuration file.
///
/// # Examples
///
/// ```rust,no_run
/// use layercfg::adapters::YamlFileSource;
/// use layercfg::prelude::*;
///
/// # fn main() -> Result<()> {
/// let root = ConfigBuilder::new()
///     .add(YamlFileSource::new("/etc/myapp/config.yaml").optional(true))
///     .build()?;
/// # Ok(())
/// # }
/// ```
pub type YamlFileSource = FileSource<YamlParser>;

impl FileSource<YamlParser> {
    /// Creates a source for `config.yaml` in the per-user configuration
    /// directory of the application, as determined by the `directories` crate.
    ///
    /// Returns `None` when no home directory can be determined.
    pub fn from_default_location(
        qualifier: &str,
        organization: &str,
        application: &str,
    ) -> Option<Self> {
        Self::with_filename(qualifier, organization, application, DEFAULT_FILE_NAME)
    }

    /// Like `from_default_location`, with a custom file name.
    pub fn with_filename(
        qualifier: &str,
        organization: &str,
        application: &str,
        filename: &str,
    ) -> Option<Self> {
        let proj_dirs = ProjectDirs::from(qualifier, organization, application)?;
        Some(Self::new(proj_dirs.config_dir().join(filename)))
    }
}
