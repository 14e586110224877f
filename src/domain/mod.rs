// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain layer containing core types.
//!
//! This module contains the key model, the change-notification primitive and the
//! error types. It is independent of any provider or file format and defines the
//! fundamental concepts used throughout the library.

pub mod change_token;
pub mod config_key;
pub mod config_path;
pub mod errors;
pub mod provider_data;

// Re-export commonly used types
pub use change_token::{
    on_change, ChangeRegistration, ChangeSubscription, ChangeToken, ReloadTrigger,
};
pub use config_key::{compare_keys, compare_segments, keys_equal, ConfigKey};
pub use config_path::KEY_DELIMITER;
pub use errors::{ConfigError, Result};
pub use provider_data::{insert_unique, ConfigData, ProviderData};
