// SPDX-License-Identifier: MIT OR Apache-2.0

//! Service layer: the composite root, its section views and the builder that
//! assembles them from sources.

pub mod builder;
pub mod config_root;
pub mod section;

// Re-export commonly used types
pub use builder::{BuilderProperties, ConfigBuilder};
pub use config_root::{ConfigRoot, DebugEntry};
pub use section::ConfigSection;
