// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-type binding descriptors for structs.

use super::{bind_in_place, bind_value, has_data, Bind, BinderOptions};
use crate::domain::{keys_equal, ConfigError, Result};
use crate::ports::Configuration;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

type Constructor<T> = Box<dyn Fn() -> Result<T> + Send + Sync>;
type BindFn<T> = Box<dyn Fn(&mut T, &dyn Configuration, &BinderOptions) -> Result<()> + Send + Sync>;

struct Property<T> {
    name: String,
    non_public: bool,
    bind: BindFn<T>,
}

/// A type whose members are bound through an [`ObjectDescriptor`].
///
/// Pair an implementation with [`bind_object!`](crate::bind_object) to make the
/// type [`Bind`].
pub trait BindObject: Sized + 'static {
    /// Describes how to construct the type and which members to bind.
    fn descriptor() -> ObjectDescriptor<Self>;
}

/// The constructor and ordered member list of a bindable struct.
///
/// Each member is bound against the child section named after it. Names match
/// case-insensitively. A member is one of:
///
/// - [`field`](Self::field): a mutable field, replaced by a leaf value or
///   bound into when the section has children;
/// - [`read_only`](Self::read_only): bound into in place only, and skipped
///   while it is `None`;
/// - [`accessors`](Self::accessors): a getter/setter pair;
/// - [`shared`](Self::shared): a static cell shared by every instance.
///
/// Members added with [`base`](Self::base) come from an embedded value's own
/// descriptor. They are skipped when a member of the same name was added
/// earlier.
///
/// # Examples
///
/// ```rust
/// use layercfg::binder::{BindObject, ObjectDescriptor};
/// use layercfg::bind_object;
///
/// #[derive(Default)]
/// struct Limits {
///     max_connections: u32,
///     name: Option<String>,
/// }
///
/// impl BindObject for Limits {
///     fn descriptor() -> ObjectDescriptor<Self> {
///         ObjectDescriptor::new()
///             .constructor(Limits::default)
///             .field("MaxConnections", |l: &mut Limits| &mut l.max_connections)
///             .field("Name", |l: &mut Limits| &mut l.name)
///     }
/// }
///
/// bind_object!(Limits);
/// ```
pub struct ObjectDescriptor<T> {
    type_name: &'static str,
    constructor: Option<Constructor<T>>,
    properties: Vec<Property<T>>,
}

impl<T: 'static> ObjectDescriptor<T> {
    /// Creates an empty descriptor without a constructor.
    pub fn new() -> Self {
        Self {
            type_name: std::any::type_name::<T>(),
            constructor: None,
            properties: Vec::new(),
        }
    }

    /// Sets an infallible constructor.
    pub fn constructor<F>(mut self, constructor: F) -> Self
    where
        F: Fn() -> T + Send + Sync + 'static,
    {
        self.constructor = Some(Box::new(move || Ok(constructor())));
        self
    }

    /// Sets a fallible constructor. Its errors surface as activation errors.
    pub fn try_constructor<F>(mut self, constructor: F) -> Self
    where
        F: Fn() -> Result<T> + Send + Sync + 'static,
    {
        self.constructor = Some(Box::new(constructor));
        self
    }

    /// Adds a mutable field.
    pub fn field<U, F>(self, name: &str, get: F) -> Self
    where
        U: Bind,
        F: Fn(&mut T) -> &mut U + Send + Sync + 'static,
    {
        self.push(name, move |target, node, options| bind_value(get(target), node, options))
    }

    /// Adds a member that can only be bound into, never replaced.
    pub fn read_only<U, F>(self, name: &str, get: F) -> Self
    where
        U: Bind,
        F: Fn(&mut T) -> Option<&mut U> + Send + Sync + 'static,
    {
        self.push(name, move |target, node, options| match get(target) {
            Some(current) => bind_in_place(current, node, options),
            None => Ok(()),
        })
    }

    /// Adds a member read through `get` and written back through `set`.
    ///
    /// The setter runs only when the section has data.
    pub fn accessors<U, G, S>(self, name: &str, get: G, set: S) -> Self
    where
        U: Bind,
        G: Fn(&T) -> U + Send + Sync + 'static,
        S: Fn(&mut T, U) + Send + Sync + 'static,
    {
        self.push(name, move |target, node, options| {
            if !has_data(node) {
                return Ok(());
            }
            let mut current = get(target);
            bind_value(&mut current, node, options)?;
            set(target, current);
            Ok(())
        })
    }

    /// Adds a member stored in a static cell.
    pub fn shared<U>(self, name: &str, cell: &'static RwLock<U>) -> Self
    where
        U: Bind + Send + Sync + 'static,
    {
        self.push(name, move |_target, node, options| {
            let mut value = cell.write().unwrap_or_else(PoisonError::into_inner);
            bind_value(&mut *value, node, options)
        })
    }

    /// Marks the most recently added member as non-public.
    ///
    /// Non-public members are bound only with
    /// [`BinderOptions::bind_non_public_properties`].
    pub fn non_public(mut self) -> Self {
        if let Some(property) = self.properties.last_mut() {
            property.non_public = true;
        }
        self
    }

    /// Adds the members of an embedded value reached through `get`.
    pub fn base<B, F>(mut self, get: F) -> Self
    where
        B: BindObject,
        F: Fn(&mut T) -> &mut B + Send + Sync + 'static,
    {
        let get = Arc::new(get);
        for inherited in B::descriptor().properties {
            if self.properties.iter().any(|p| keys_equal(&p.name, &inherited.name)) {
                continue;
            }
            let get = Arc::clone(&get);
            let bind = inherited.bind;
            self.properties.push(Property {
                name: inherited.name,
                non_public: inherited.non_public,
                bind: Box::new(
                    move |target: &mut T, node: &dyn Configuration, options: &BinderOptions| {
                        bind((*get)(target), node, options)
                    },
                ),
            });
        }
        self
    }

    fn push<F>(mut self, name: &str, bind: F) -> Self
    where
        F: Fn(&mut T, &dyn Configuration, &BinderOptions) -> Result<()> + Send + Sync + 'static,
    {
        self.properties.push(Property {
            name: name.to_string(),
            non_public: false,
            bind: Box::new(bind),
        });
        self
    }

    fn eligible(&self, non_public: bool) -> impl Iterator<Item = &Property<T>> + '_ {
        self.properties
            .iter()
            .filter(move |p| !p.non_public || non_public)
    }

    /// Creates a new instance with the registered constructor.
    pub fn activate(&self) -> Result<T> {
        let constructor = self.constructor.as_ref().ok_or_else(|| {
            ConfigError::activation(self.type_name, "no parameterless constructor is registered")
        })?;
        constructor().map_err(|e| ConfigError::Activation {
            type_name: self.type_name.to_string(),
            message: "constructor failed".to_string(),
            source: Some(Box::new(e)),
        })
    }

    /// Binds every eligible member of `target` from the matching child of `node`.
    pub fn bind(&self, target: &mut T, node: &dyn Configuration, options: &BinderOptions) -> Result<()> {
        let non_public = options.bind_non_public_properties;
        if options.error_on_unknown_configuration {
            let unknown: Vec<String> = node
                .children()
                .iter()
                .map(|child| child.key().to_string())
                .filter(|key| !self.eligible(non_public).any(|p| keys_equal(&p.name, key)))
                .collect();
            if !unknown.is_empty() {
                return Err(ConfigError::UnknownConfiguration {
                    type_name: self.type_name.to_string(),
                    keys: unknown,
                });
            }
        }

        for property in self.eligible(non_public) {
            let section = node.section(&property.name);
            (property.bind)(target, &section, options)?;
        }
        Ok(())
    }
}

impl<T: 'static> Default for ObjectDescriptor<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for ObjectDescriptor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.properties.iter().map(|p| p.name.as_str()).collect();
        f.debug_struct("ObjectDescriptor")
            .field("type_name", &self.type_name)
            .field("has_constructor", &self.constructor.is_some())
            .field("properties", &names)
            .finish()
    }
}

/// Implements [`Bind`] for a struct.
///
/// With a type alone, the type must implement
/// [`BindObject`]. With a field list, the macro also
/// writes the `BindObject` impl, using `Default` as the constructor and binding
/// each listed field under the given name.
///
/// ```rust
/// use layercfg::bind_object;
///
/// #[derive(Default)]
/// struct Database {
///     url: String,
///     pool_size: u32,
/// }
///
/// bind_object!(Database {
///     "Url" => url,
///     "PoolSize" => pool_size,
/// });
/// ```
#[macro_export]
macro_rules! bind_object {
    ($t:ident { $($name:literal => $field:ident),* $(,)? }) => {
        impl $crate::binder::BindObject for $t {
            fn descriptor() -> $crate::binder::ObjectDescriptor<Self> {
                $crate::binder::ObjectDescriptor::new()
                    .constructor(<$t as ::std::default::Default>::default)
                    $(.field($name, |target: &mut $t| &mut target.$field))*
            }
        }

        $crate::bind_object!($t);
    };
    ($t:ty) => {
        impl $crate::binder::Bind for $t {
            const KIND: $crate::binder::TargetKind = $crate::binder::TargetKind::Object;

            fn activate() -> $crate::domain::Result<Self> {
                <$t as $crate::binder::BindObject>::descriptor().activate()
            }

            fn bind_children(
                &mut self,
                node: &dyn $crate::ports::Configuration,
                options: &$crate::binder::BinderOptions,
            ) -> $crate::domain::Result<()> {
                <$t as $crate::binder::BindObject>::descriptor().bind(self, node, options)
            }
        }
    };
}

/// Implements [`Bind`] for boxed trait objects.
///
/// Configuration can be bound into an existing box, which forwards to the
/// concrete type through [`DynBind`](crate::binder::DynBind). Creating a new box
/// fails with an activation error. The trait must have `DynBind` as a
/// supertrait.
///
/// ```rust
/// use layercfg::bind_abstract;
/// use layercfg::binder::DynBind;
///
/// trait Handler: DynBind + Send {}
///
/// bind_abstract!(dyn Handler);
/// ```
#[macro_export]
macro_rules! bind_abstract {
    ($($t:ty),+ $(,)?) => {$(
        impl $crate::binder::Bind for ::std::boxed::Box<$t> {
            const KIND: $crate::binder::TargetKind = $crate::binder::TargetKind::Abstract;

            fn activate() -> $crate::domain::Result<Self> {
                Err($crate::domain::ConfigError::activation(
                    stringify!($t),
                    "cannot create an instance of an abstract type",
                ))
            }

            fn bind_children(
                &mut self,
                node: &dyn $crate::ports::Configuration,
                options: &$crate::binder::BinderOptions,
            ) -> $crate::domain::Result<()> {
                $crate::binder::DynBind::bind_dyn(&mut **self, node, options)
            }
        }
    )+};
}
