// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ports layer containing trait definitions.
//!
//! This module contains the traits that define the seams of the configuration
//! system: the provider contract, the builder-facing source factory, the tree
//! view shared by root and sections, and the file parser and watcher
//! primitives the file adapters are built on.

pub mod configuration;
pub mod parser;
pub mod provider;
pub mod source;
pub mod watcher;

// Re-export commonly used types
pub use configuration::Configuration;
pub use parser::ConfigParser;
pub use provider::ConfigProvider;
pub use source::ConfigSource;
pub use watcher::{ConfigWatcher, WatchCallback};
