// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration parser trait definition.
//!
//! This module defines the `ConfigParser` trait, which provides an interface for
//! turning the text of a configuration file into the flat key space used by
//! providers.

use crate::domain::{ConfigData, Result};

/// A trait for parsing configuration files.
///
/// Parsers flatten nested structures by joining names with `:`. For example,
/// a YAML document like:
///
/// ```yaml
/// database:
///   host: localhost
///   ports: [5432, 5433]
/// ```
///
/// is parsed into:
/// - `database:host` -> `"localhost"`
/// - `database:ports:0` -> `"5432"`
/// - `database:ports:1` -> `"5433"`
///
/// Sequence items become numeric segments. Empty mappings and sequences become
/// keys without a value so the section still exists. A parser must fail with
/// [`ConfigError::DuplicateKey`](crate::domain::ConfigError::DuplicateKey) when the
/// same flattened key appears twice, compared case-insensitively.
///
/// # Examples
///
/// ```rust
/// use layercfg::domain::{insert_unique, ConfigData, Result};
/// use layercfg::ports::ConfigParser;
///
/// struct LineParser;
///
/// impl ConfigParser for LineParser {
///     fn parse(&self, content: &str, source_name: &str) -> Result<ConfigData> {
///         let mut data = ConfigData::new();
///         for line in content.lines() {
///             if let Some((key, value)) = line.split_once('=') {
///                 insert_unique(&mut data, source_name, key.trim(), Some(value.trim().to_string()))?;
///             }
///         }
///         Ok(data)
///     }
///
///     fn supported_extensions(&self) -> &[&str] {
///         &["lines"]
///     }
/// }
///
/// let data = LineParser.parse("a:b = 1", "test").unwrap();
/// assert_eq!(data.len(), 1);
/// assert!(LineParser.parse("a = 1\nA = 2", "test").is_err());
/// ```
pub trait ConfigParser: Send + Sync {
    /// Parses configuration content into a flat key/value map.
    ///
    /// `source_name` identifies the document in error messages.
    fn parse(&self, content: &str, source_name: &str) -> Result<ConfigData>;

    /// Returns the file extensions (without the leading dot) this parser reads.
    fn supported_extensions(&self) -> &[&str];
}
