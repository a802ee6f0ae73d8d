//! Lookup table for the built-in type catalog.
//!
//! Maps scalar OIDs to their array OIDs and back, and type names to OIDs.

use alloc::format;
use alloc::string::String;
use hashbrown::HashMap;
use pqbin_core::{DataType, Oid};

/// Catalog entry of one type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeInfo {
    pub oid: Oid,
    pub name: String,
    /// Element type, for array types.
    pub element: Option<Oid>,
    /// Array type, for scalar types that have one.
    pub array: Option<Oid>,
}

/// Catalog of built-in scalar and array types.
#[derive(Debug, Default)]
pub struct TypeRegistry {
    by_oid: HashMap<Oid, TypeInfo>,
    by_name: HashMap<String, Oid>,
}

impl TypeRegistry {
    /// Creates a registry holding every catalog type and its array type.
    pub fn builtin() -> Self {
        let mut registry = Self::default();
        for data_type in DataType::ALL {
            let array = data_type.array_oid();
            registry.insert(TypeInfo {
                oid: data_type.oid(),
                name: data_type.name().into(),
                element: None,
                array,
            });
            if let Some(array_oid) = array {
                registry.insert(TypeInfo {
                    oid: array_oid,
                    name: format!("{}[]", data_type.name()),
                    element: Some(data_type.oid()),
                    array: None,
                });
            }
        }
        registry
    }

    fn insert(&mut self, info: TypeInfo) {
        self.by_name.insert(info.name.clone(), info.oid);
        self.by_oid.insert(info.oid, info);
    }

    /// Returns the number of registered types.
    #[inline]
    pub fn len(&self) -> usize {
        self.by_oid.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.by_oid.is_empty()
    }

    #[inline]
    pub fn get(&self, oid: Oid) -> Option<&TypeInfo> {
        self.by_oid.get(&oid)
    }

    pub fn by_name(&self, name: &str) -> Option<&TypeInfo> {
        self.by_name.get(name).and_then(|oid| self.by_oid.get(oid))
    }

    /// Returns the array type whose elements are `element`.
    pub fn array_of(&self, element: Oid) -> Option<Oid> {
        self.get(element)?.array
    }

    /// Returns the element type of the array type `array`.
    pub fn element_of(&self, array: Oid) -> Option<Oid> {
        self.get(array)?.element
    }

    /// Returns true if `oid` is a registered array type.
    pub fn is_array(&self, oid: Oid) -> bool {
        self.element_of(oid).is_some()
    }
}
