// SPDX-License-Identifier: MIT OR Apache-2.0

//! `Bind` implementations for `Option` and the standard containers.

use super::{bind_in_place, create_value, Bind, BinderOptions, TargetKind};
use crate::domain::Result;
use crate::ports::Configuration;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::hash::{BuildHasher, Hash};

/// Binds every child of `node` as a new `T`, dropping the ones that fail.
fn collect_items<T: Bind>(node: &dyn Configuration, options: &BinderOptions) -> Vec<T> {
    node.children()
        .iter()
        .filter_map(|child| match create_value::<T>(child, options) {
            Ok(item) => item,
            Err(e) => {
                tracing::debug!("Skipping element {}: {}", child.path(), e);
                None
            }
        })
        .collect()
}

impl<T: Bind> Bind for Option<T> {
    const KIND: TargetKind = TargetKind::Optional;

    fn activate() -> Result<Self> {
        Ok(None)
    }

    fn convert(value: &str, path: &str) -> Option<Result<Self>> {
        // An empty value is `None` only for inner types that cannot take it.
        match T::convert(value, path) {
            Some(Ok(converted)) => Some(Ok(Some(converted))),
            _ if value.is_empty() => Some(Ok(None)),
            other => other.map(|converted| converted.map(Some)),
        }
    }

    fn bind_children(&mut self, node: &dyn Configuration, options: &BinderOptions) -> Result<()> {
        match self {
            Some(inner) => bind_in_place(inner, node, options),
            None if T::KIND == TargetKind::Scalar => Ok(()),
            None => {
                let mut inner = T::activate()?;
                inner.bind_children(node, options)?;
                *self = Some(inner);
                Ok(())
            }
        }
    }
}

impl<T: Bind> Bind for Vec<T> {
    const KIND: TargetKind = TargetKind::Collection;

    fn activate() -> Result<Self> {
        Ok(Vec::new())
    }

    fn bind_children(&mut self, node: &dyn Configuration, options: &BinderOptions) -> Result<()> {
        self.extend(collect_items::<T>(node, options));
        Ok(())
    }
}

impl<T: Bind> Bind for VecDeque<T> {
    const KIND: TargetKind = TargetKind::Collection;

    fn activate() -> Result<Self> {
        Ok(VecDeque::new())
    }

    fn bind_children(&mut self, node: &dyn Configuration, options: &BinderOptions) -> Result<()> {
        self.extend(collect_items::<T>(node, options));
        Ok(())
    }
}

impl<T, S> Bind for HashSet<T, S>
where
    T: Bind + Eq + Hash,
    S: BuildHasher + Default,
{
    const KIND: TargetKind = TargetKind::Collection;

    fn activate() -> Result<Self> {
        Ok(HashSet::default())
    }

    fn bind_children(&mut self, node: &dyn Configuration, options: &BinderOptions) -> Result<()> {
        self.extend(collect_items::<T>(node, options));
        Ok(())
    }
}

impl<T: Bind + Ord> Bind for BTreeSet<T> {
    const KIND: TargetKind = TargetKind::Collection;

    fn activate() -> Result<Self> {
        Ok(BTreeSet::new())
    }

    fn bind_children(&mut self, node: &dyn Configuration, options: &BinderOptions) -> Result<()> {
        self.extend(collect_items::<T>(node, options));
        Ok(())
    }
}

/// Arrays grow by one slot per child. Existing elements are kept in front; a
/// child that fails to bind leaves its slot at `T::default()`.
impl<T: Bind + Default> Bind for Box<[T]> {
    const KIND: TargetKind = TargetKind::Array;

    fn activate() -> Result<Self> {
        Ok(Box::default())
    }

    fn bind_children(&mut self, node: &dyn Configuration, options: &BinderOptions) -> Result<()> {
        let children = node.children();
        let mut items = std::mem::take(self).into_vec();
        items.reserve(children.len());

        for child in &children {
            let item = match create_value::<T>(child, options) {
                Ok(item) => item.unwrap_or_default(),
                Err(e) => {
                    tracing::debug!("Leaving array slot {} empty: {}", child.path(), e);
                    T::default()
                }
            };
            items.push(item);
        }

        *self = items.into_boxed_slice();
        Ok(())
    }
}

impl<V, S> Bind for HashMap<String, V, S>
where
    V: Bind,
    S: BuildHasher + Default,
{
    const KIND: TargetKind = TargetKind::Dictionary;

    fn activate() -> Result<Self> {
        Ok(HashMap::default())
    }

    fn bind_children(&mut self, node: &dyn Configuration, options: &BinderOptions) -> Result<()> {
        for child in node.children() {
            if let Some(item) = create_value::<V>(&child, options)? {
                self.insert(child.key().to_string(), item);
            }
        }
        Ok(())
    }
}

impl<V: Bind> Bind for BTreeMap<String, V> {
    const KIND: TargetKind = TargetKind::Dictionary;

    fn activate() -> Result<Self> {
        Ok(BTreeMap::new())
    }

    fn bind_children(&mut self, node: &dyn Configuration, options: &BinderOptions) -> Result<()> {
        for child in node.children() {
            if let Some(item) = create_value::<V>(&child, options)? {
                self.insert(child.key().to_string(), item);
            }
        }
        Ok(())
    }
}
