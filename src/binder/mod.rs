// SPDX-License-Identifier: MIT OR Apache-2.0

//! Object binder: projects the configuration tree onto typed values.
//!
//! Binding is driven by the [`Bind`] trait. Every bindable type declares a
//! [`TargetKind`] and answers three questions:
//!
//! - how to create an empty instance ([`Bind::activate`]),
//! - how to convert a leaf string into a value ([`Bind::convert`]), and
//! - how to bind a node's children into an existing instance
//!   ([`Bind::bind_children`]).
//!
//! Scalars, `Option`, the standard collections and string-keyed maps are
//! implemented here. Structs describe their members with an
//! [`ObjectDescriptor`] and get their `Bind` implementation from
//! [`bind_object!`](crate::bind_object). Trait objects are marked with
//! [`bind_abstract!`](crate::bind_abstract), which makes creating one from
//! configuration an activation error.
//!
//! # Examples
//!
//! ```rust
//! use layercfg::bind_object;
//! use layercfg::prelude::*;
//!
//! #[derive(Debug, Default)]
//! struct Server {
//!     host: String,
//!     port: u16,
//!     tags: Vec<String>,
//! }
//!
//! bind_object!(Server {
//!     "Host" => host,
//!     "Port" => port,
//!     "Tags" => tags,
//! });
//!
//! # fn main() -> Result<()> {
//! let root = ConfigBuilder::new()
//!     .with_in_memory([
//!         ("server:host", "example.org"),
//!         ("server:port", "8080"),
//!         ("server:tags:0", "edge"),
//!         ("server:tags:1", "eu"),
//!     ])
//!     .build()?;
//!
//! let server: Server = root.section("server").get_as()?.unwrap_or_default();
//! assert_eq!(server.host, "example.org");
//! assert_eq!(server.port, 8080);
//! assert_eq!(server.tags, vec!["edge", "eu"]);
//! # Ok(())
//! # }
//! ```

mod containers;
pub mod convert;
mod descriptor;
mod extension;
mod options;

pub use descriptor::{BindObject, ObjectDescriptor};
pub use extension::ConfigurationBinder;
pub use options::BinderOptions;

use crate::domain::Result;
use crate::ports::Configuration;

/// The shape of a bindable type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetKind {
    /// Converted from a single leaf string.
    Scalar,
    /// A struct bound member by member through an [`ObjectDescriptor`].
    Object,
    /// A fixed-size sequence that grows by one slot per child.
    Array,
    /// A growable collection that receives one element per child.
    Collection,
    /// A string-keyed map that receives one entry per child.
    Dictionary,
    /// One level of optional wrapping around another kind.
    Optional,
    /// A trait object; it can be bound into but never created.
    Abstract,
}

/// A type that can be bound from configuration.
pub trait Bind: Sized {
    /// The shape of the type.
    const KIND: TargetKind;

    /// Creates an empty instance to bind children into.
    ///
    /// Fails with [`ConfigError::Activation`](crate::domain::ConfigError::Activation)
    /// for types that cannot be created this way.
    fn activate() -> Result<Self>;

    /// Converts a leaf value.
    ///
    /// Returns `None` when the type has no string conversion, in which case the
    /// binder falls back to the node's children. `path` identifies the node in
    /// error messages.
    fn convert(value: &str, path: &str) -> Option<Result<Self>> {
        let _ = (value, path);
        None
    }

    /// Binds the children of `node` into `self`.
    fn bind_children(&mut self, node: &dyn Configuration, options: &BinderOptions) -> Result<()> {
        let _ = (node, options);
        Ok(())
    }
}

/// Object-safe binding, used to bind into trait objects.
///
/// Traits registered with [`bind_abstract!`](crate::bind_abstract) must have
/// `DynBind` as a supertrait. It is implemented for every [`Bind`] type.
pub trait DynBind {
    /// Binds the children of `node` into `self`.
    fn bind_dyn(&mut self, node: &dyn Configuration, options: &BinderOptions) -> Result<()>;
}

impl<T: Bind> DynBind for T {
    fn bind_dyn(&mut self, node: &dyn Configuration, options: &BinderOptions) -> Result<()> {
        bind_in_place(self, node, options)
    }
}

/// Binds `node` into an existing value.
///
/// A leaf value the type can convert replaces `target`. Otherwise the node's
/// children are bound into `target`. A node with neither leaves `target`
/// untouched.
pub fn bind_value<T: Bind>(
    target: &mut T,
    node: &dyn Configuration,
    options: &BinderOptions,
) -> Result<()> {
    if let Some(value) = node.value() {
        if let Some(converted) = T::convert(&value, node.path()) {
            *target = converted?;
            return Ok(());
        }
    }
    bind_in_place(target, node, options)
}

/// Creates a value from `node`.
///
/// Returns `Ok(None)` when the node has neither a convertible value nor
/// children.
pub fn create_value<T: Bind>(node: &dyn Configuration, options: &BinderOptions) -> Result<Option<T>> {
    if let Some(value) = node.value() {
        if let Some(converted) = T::convert(&value, node.path()) {
            return converted.map(Some);
        }
    }
    if node.children().is_empty() {
        return Ok(None);
    }
    let mut instance = T::activate()?;
    instance.bind_children(node, options)?;
    Ok(Some(instance))
}

/// Binds the children of `node` into `target`, ignoring any leaf value.
pub(crate) fn bind_in_place<T: Bind>(
    target: &mut T,
    node: &dyn Configuration,
    options: &BinderOptions,
) -> Result<()> {
    if T::KIND == TargetKind::Scalar || node.children().is_empty() {
        return Ok(());
    }
    target.bind_children(node, options)
}

/// Returns `true` if `node` has a value or any children.
pub(crate) fn has_data(node: &dyn Configuration) -> bool {
    node.value().is_some() || !node.children().is_empty()
}
