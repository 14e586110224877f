// SPDX-License-Identifier: MIT OR Apache-2.0

//! Path-scoped views over a configuration root.

use crate::domain::config_path;
use crate::domain::{ChangeToken, Result};
use crate::ports::Configuration;
use crate::service::ConfigRoot;
use std::fmt;

/// A section of the configuration tree: a root plus an absolute path.
///
/// Sections hold no data. Every read goes through the root at call time, so a
/// section observes reloads and writes made after it was created. A section
/// for a path nothing defines is valid and simply empty.
#[derive(Clone)]
pub struct ConfigSection {
    root: ConfigRoot,
    path: String,
}

impl ConfigSection {
    pub(crate) fn new(root: ConfigRoot, path: String) -> Self {
        Self { root, path }
    }

    /// The last segment of the path.
    pub fn key(&self) -> &str {
        config_path::last_segment(&self.path)
    }

    /// Writes the section's own value into every provider.
    pub fn set_value(&self, value: Option<&str>) -> Result<()> {
        self.root.set(&self.path, value)
    }

    /// Returns `true` if the section has a value or any children.
    pub fn exists(&self) -> bool {
        self.value().is_some() || !self.children().is_empty()
    }

    /// Returns every key below this section that has a value.
    ///
    /// With `relative` set, keys are reported relative to the section.
    pub fn entries(&self, relative: bool) -> Vec<(String, String)> {
        let strip = if relative { Some(self.path.as_str()) } else { None };
        collect_entries(self, strip)
    }

    /// The root this section reads through.
    pub fn root(&self) -> &ConfigRoot {
        &self.root
    }

    fn absolute(&self, key: &str) -> String {
        config_path::combine([self.path.as_str(), key])
    }
}

impl Configuration for ConfigSection {
    fn get(&self, key: &str) -> Option<String> {
        self.root.get(&self.absolute(key))
    }

    fn set(&self, key: &str, value: Option<&str>) -> Result<()> {
        self.root.set(&self.absolute(key), value)
    }

    fn section(&self, key: &str) -> ConfigSection {
        ConfigSection::new(self.root.clone(), self.absolute(key))
    }

    fn children(&self) -> Vec<ConfigSection> {
        self.root.children_of(Some(&self.path))
    }

    fn reload_token(&self) -> ChangeToken {
        self.root.reload_token()
    }

    fn value(&self) -> Option<String> {
        self.root.get(&self.path)
    }

    fn path(&self) -> &str {
        &self.path
    }
}

impl fmt::Debug for ConfigSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigSection")
            .field("path", &self.path)
            .field("value", &self.value())
            .finish()
    }
}

/// Walks the tree below `node` depth first and collects every valued key.
///
/// A node's own value is included. With `strip` set, that prefix (and the
/// delimiter after it) is removed from the reported keys.
pub(crate) fn collect_entries(
    node: &dyn Configuration,
    strip: Option<&str>,
) -> Vec<(String, String)> {
    let mut out = Vec::new();
    let mut pending = node.children();
    if let Some(value) = node.value() {
        out.push((relative_key(node.path(), strip), value));
    }
    while let Some(section) = pending.pop() {
        if let Some(value) = section.value() {
            out.push((relative_key(section.path(), strip), value));
        }
        pending.extend(section.children());
    }
    out
}

fn relative_key(path: &str, strip: Option<&str>) -> String {
    match strip {
        Some(prefix) if path.len() > prefix.len() => path[prefix.len() + 1..].to_string(),
        Some(_) => String::new(),
        None => path.to_string(),
    }
}
