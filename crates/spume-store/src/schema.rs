//! Attribute schema: name → stable buffer slot, per attribute kind.
//!
//! The [`AttributeSchema`] is the "phone book" of a container. It holds
//! two registries, one for scalar names and one for vector names, each an
//! `IndexSet` so that a name's slot is simply its insertion position. The
//! schema is sealed at construction; slots never move afterwards.

use indexmap::IndexSet;
use spume_core::{AttributeKind, AttributeSlot, StoreError};

use crate::config::DuplicatePolicy;

/// Name registries for scalar and vector attributes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AttributeSchema {
    floats: IndexSet<String>,
    vec3s: IndexSet<String>,
}

impl AttributeSchema {
    /// Build a schema from scalar and vector name lists.
    ///
    /// Slots are assigned in list order. Duplicates are handled according
    /// to `policy`.
    pub fn new<F, V>(
        float_names: F,
        vec3_names: V,
        policy: DuplicatePolicy,
    ) -> Result<Self, StoreError>
    where
        F: IntoIterator,
        F::Item: Into<String>,
        V: IntoIterator,
        V::Item: Into<String>,
    {
        Ok(Self {
            floats: build_registry(AttributeKind::Float, float_names, policy)?,
            vec3s: build_registry(AttributeKind::Vec3, vec3_names, policy)?,
        })
    }

    fn registry(&self, kind: AttributeKind) -> &IndexSet<String> {
        match kind {
            AttributeKind::Float => &self.floats,
            AttributeKind::Vec3 => &self.vec3s,
        }
    }

    /// Number of registered attributes of `kind`.
    pub fn len(&self, kind: AttributeKind) -> usize {
        self.registry(kind).len()
    }

    /// Whether no attributes of either kind are registered.
    pub fn is_empty(&self) -> bool {
        self.floats.is_empty() && self.vec3s.is_empty()
    }

    /// Number of scalar attributes.
    pub fn float_attribute_amount(&self) -> usize {
        self.floats.len()
    }

    /// Number of vector attributes.
    pub fn vec3_attribute_amount(&self) -> usize {
        self.vec3s.len()
    }

    /// Resolve `name` to its slot in the `kind` registry.
    ///
    /// # Errors
    ///
    /// [`StoreError::UnknownAttribute`] if `name` was never registered for
    /// `kind`.
    pub fn index_of(&self, kind: AttributeKind, name: &str) -> Result<AttributeSlot, StoreError> {
        self.registry(kind)
            .get_index_of(name)
            .map(|i| AttributeSlot(i as u32))
            .ok_or_else(|| StoreError::UnknownAttribute {
                kind,
                name: name.to_string(),
            })
    }

    /// Slot of a scalar attribute.
    pub fn float_index(&self, name: &str) -> Result<AttributeSlot, StoreError> {
        self.index_of(AttributeKind::Float, name)
    }

    /// Slot of a vector attribute.
    pub fn vec3_index(&self, name: &str) -> Result<AttributeSlot, StoreError> {
        self.index_of(AttributeKind::Vec3, name)
    }

    /// Whether `name` is registered for `kind`.
    pub fn contains(&self, kind: AttributeKind, name: &str) -> bool {
        self.registry(kind).contains(name)
    }

    /// The name registered at `slot`, if any.
    pub fn name_of(&self, kind: AttributeKind, slot: AttributeSlot) -> Option<&str> {
        self.registry(kind).get_index(slot.index()).map(String::as_str)
    }

    /// Registered names of `kind`, in slot order.
    pub fn names(&self, kind: AttributeKind) -> impl Iterator<Item = &str> {
        self.registry(kind).iter().map(String::as_str)
    }

    /// Scalar attribute names, in slot order.
    pub fn float_names(&self) -> impl Iterator<Item = &str> {
        self.names(AttributeKind::Float)
    }

    /// Vector attribute names, in slot order.
    pub fn vec3_names(&self) -> impl Iterator<Item = &str> {
        self.names(AttributeKind::Vec3)
    }
}

fn build_registry<I>(
    kind: AttributeKind,
    names: I,
    policy: DuplicatePolicy,
) -> Result<IndexSet<String>, StoreError>
where
    I: IntoIterator,
    I::Item: Into<String>,
{
    let mut registry = IndexSet::new();
    for name in names {
        let name = name.into();
        if registry.contains(&name) {
            match policy {
                DuplicatePolicy::FirstWins => {
                    tracing::warn!(%kind, name = %name, "dropping duplicate attribute name");
                }
                DuplicatePolicy::Reject => {
                    return Err(StoreError::DuplicateAttribute { kind, name });
                }
            }
            continue;
        }
        registry.insert(name);
    }
    Ok(registry)
}
