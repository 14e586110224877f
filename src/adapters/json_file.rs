// SPDX-License-Identifier: MIT OR Apache-2.0

//! JSON file configuration provider.

use crate::adapters::file::FileSource;
use crate::domain::{config_path, insert_unique, ConfigData, ConfigError, Result};
use crate::ports::ConfigParser;
use serde::de::{self, Deserialize, Deserializer, MapAccess, SeqAccess, Visitor};
use std::fmt;

/// A parsed JSON document.
///
/// Object members are kept as a list in document order, so a key repeated
/// within one object reaches the flattener twice instead of being collapsed.
#[derive(Debug)]
enum Node {
    Null,
    Scalar(String),
    Array(Vec<Node>),
    Object(Vec<(String, Node)>),
}

impl<'de> Deserialize<'de> for Node {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(NodeVisitor)
    }
}

struct NodeVisitor;

impl<'de> Visitor<'de> for NodeVisitor {
    type Value = Node;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("any JSON value")
    }

    fn visit_unit<E: de::Error>(self) -> std::result::Result<Node, E> {
        Ok(Node::Null)
    }

    fn visit_none<E: de::Error>(self) -> std::result::Result<Node, E> {
        Ok(Node::Null)
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> std::result::Result<Node, E> {
        Ok(Node::Scalar(v.to_string()))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> std::result::Result<Node, E> {
        Ok(Node::Scalar(v.to_string()))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<Node, E> {
        Ok(Node::Scalar(v.to_string()))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> std::result::Result<Node, E> {
        // Same text serde_json gives a float, e.g. `1000.0` rather than `1000`.
        let text = serde_json::Number::from_f64(v)
            .map(|n| n.to_string())
            .unwrap_or_else(|| v.to_string());
        Ok(Node::Scalar(text))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<Node, E> {
        Ok(Node::Scalar(v.to_string()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> std::result::Result<Node, E> {
        Ok(Node::Scalar(v))
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> std::result::Result<Node, A::Error> {
        let mut items = Vec::new();
        while let Some(item) = seq.next_element::<Node>()? {
            items.push(item);
        }
        Ok(Node::Array(items))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> std::result::Result<Node, A::Error> {
        let mut members = Vec::new();
        while let Some((key, value)) = map.next_entry::<String, Node>()? {
            members.push((key, value));
        }
        Ok(Node::Object(members))
    }
}

/// JSON parser implementation.
///
/// Objects are flattened into `:`-joined paths and array elements are keyed by
/// their index. `null` becomes an empty string; an empty object or array is
/// kept as a key without a value. A key that appears twice in one object, in
/// any casing, is a [`ConfigError::DuplicateKey`].
///
/// # Examples
///
/// ```rust
/// use layercfg::adapters::JsonParser;
/// use layercfg::ports::ConfigParser;
/// use layercfg::domain::ConfigKey;
///
/// let parser = JsonParser::new();
/// let data = parser.parse(r#"{"server": {"ports": [80, 443]}}"#, "example").unwrap();
/// assert_eq!(
///     data.get(&ConfigKey::from("server:ports:1")),
///     Some(&Some("443".to_string()))
/// );
/// ```
#[derive(Debug, Clone, Default)]
pub struct JsonParser;

impl JsonParser {
    /// Creates a new JSON parser.
    pub fn new() -> Self {
        JsonParser
    }

    fn flatten(node: Node, prefix: &str, source_name: &str, out: &mut ConfigData) -> Result<()> {
        match node {
            Node::Object(members) if members.is_empty() => insert_unique(out, source_name, prefix, None),
            Node::Object(members) => {
                for (key, child) in members {
                    let path = if prefix.is_empty() {
                        key
                    } else {
                        config_path::combine([prefix, key.as_str()])
                    };
                    Self::flatten(child, &path, source_name, out)?;
                }
                Ok(())
            }
            Node::Array(items) if items.is_empty() => insert_unique(out, source_name, prefix, None),
            Node::Array(items) => {
                for (i, child) in items.into_iter().enumerate() {
                    let path = config_path::combine([prefix, i.to_string().as_str()]);
                    Self::flatten(child, &path, source_name, out)?;
                }
                Ok(())
            }
            Node::Null => insert_unique(out, source_name, prefix, Some(String::new())),
            Node::Scalar(text) => insert_unique(out, source_name, prefix, Some(text)),
        }
    }
}

impl ConfigParser for JsonParser {
    fn parse(&self, content: &str, source_name: &str) -> Result<ConfigData> {
        if content.trim().is_empty() {
            return Ok(ConfigData::new());
        }

        let node: Node = serde_json::from_str(content).map_err(|e| ConfigError::ParseError {
            message: format!("Failed to parse JSON in '{}': {}", source_name, e),
            source: Some(Box::new(e)),
        })?;

        let mut result = ConfigData::new();
        match node {
            Node::Object(members) if members.is_empty() => {}
            Node::Object(members) => {
                Self::flatten(Node::Object(members), "", source_name, &mut result)?
            }
            _ => {
                return Err(ConfigError::ParseError {
                    message: format!("Top-level JSON in '{}' must be an object", source_name),
                    source: None,
                })
            }
        }
        Ok(result)
    }

    fn supported_extensions(&self) -> &[&str] {
        &["json"]
    }
}

/// Source for a JSON configuration file.
pub type JsonFileSource = FileSource<JsonParser>;
