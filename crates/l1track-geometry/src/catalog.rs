//! Module descriptor lookup.

use std::collections::HashMap;

use l1track_errors::GeometryError;
use serde::{Deserialize, Serialize};

use crate::module::{ModuleDescriptor, ModuleId};

/// Lookup of module descriptors by id.
///
/// Implementations must be safe to share read-only across worker threads.
pub trait ModuleCatalog: Send + Sync {
    /// Get the descriptor of a module.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::ModuleNotFound` if the id is unknown.
    fn module(&self, id: ModuleId) -> Result<&ModuleDescriptor, GeometryError>;
}

impl<C: ModuleCatalog + ?Sized> ModuleCatalog for &C {
    fn module(&self, id: ModuleId) -> Result<&ModuleDescriptor, GeometryError> {
        (**self).module(id)
    }
}

/// In-memory descriptor table.
///
/// Serialised as a plain list of descriptors.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<ModuleDescriptor>", into = "Vec<ModuleDescriptor>")]
pub struct ModuleTable {
    modules: HashMap<ModuleId, ModuleDescriptor>,
}

impl ModuleTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and register a descriptor.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::InvalidDescriptor` if validation fails, or
    /// `GeometryError::DuplicateModule` if the id is already registered.
    pub fn insert(&mut self, descriptor: ModuleDescriptor) -> Result<(), GeometryError> {
        descriptor.validate()?;
        if self.modules.contains_key(&descriptor.id) {
            return Err(GeometryError::DuplicateModule(descriptor.id.0));
        }
        self.modules.insert(descriptor.id, descriptor);
        Ok(())
    }

    /// Build a table from descriptors.
    ///
    /// # Errors
    ///
    /// Fails on the first invalid or duplicate descriptor.
    pub fn from_descriptors(
        descriptors: impl IntoIterator<Item = ModuleDescriptor>,
    ) -> Result<Self, GeometryError> {
        let mut table = Self::new();
        for descriptor in descriptors {
            table.insert(descriptor)?;
        }
        Ok(table)
    }

    /// Number of registered modules.
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// Iterate over the registered descriptors in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &ModuleDescriptor> {
        self.modules.values()
    }
}

impl ModuleCatalog for ModuleTable {
    fn module(&self, id: ModuleId) -> Result<&ModuleDescriptor, GeometryError> {
        self.modules
            .get(&id)
            .ok_or(GeometryError::ModuleNotFound(id.0))
    }
}

impl TryFrom<Vec<ModuleDescriptor>> for ModuleTable {
    type Error = GeometryError;

    fn try_from(descriptors: Vec<ModuleDescriptor>) -> Result<Self, Self::Error> {
        Self::from_descriptors(descriptors)
    }
}

impl From<ModuleTable> for Vec<ModuleDescriptor> {
    fn from(table: ModuleTable) -> Self {
        let mut descriptors: Vec<_> = table.modules.into_values().collect();
        descriptors.sort_by_key(|d| d.id);
        descriptors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layer::DetectorLayer;
    use crate::module::ModuleType;

    fn descriptor(id: u32) -> ModuleDescriptor {
        ModuleDescriptor {
            id: ModuleId(id),
            layer: DetectorLayer::Barrel { layer: 2 },
            module_type: ModuleType::Ps,
            min_r: 35.8,
            max_r: 36.0,
            min_phi: 0.1,
            max_phi: 0.1,
            min_z: -5.0,
            max_z: -5.0,
            strip_pitch: 0.01,
            strip_length: 0.1467,
            sensor_width: 9.6,
            n_strips: 960,
        }
    }

    #[test]
    fn test_lookup() -> Result<(), GeometryError> {
        let table = ModuleTable::from_descriptors([descriptor(1), descriptor(2)])?;
        assert_eq!(table.len(), 2);
        assert_eq!(table.module(ModuleId(2))?.id, ModuleId(2));
        assert_eq!(
            table.module(ModuleId(3)),
            Err(GeometryError::ModuleNotFound(3))
        );
        Ok(())
    }

    #[test]
    fn test_duplicate_rejected() {
        let result = ModuleTable::from_descriptors([descriptor(5), descriptor(5)]);
        assert_eq!(result, Err(GeometryError::DuplicateModule(5)));
    }

    #[test]
    fn test_invalid_rejected_on_insert() {
        let mut table = ModuleTable::new();
        let mut bad = descriptor(9);
        bad.n_strips = 0;
        assert!(table.insert(bad).is_err());
        assert!(table.is_empty());
    }

    #[test]
    fn test_catalog_by_reference() -> Result<(), GeometryError> {
        fn lookup<C: ModuleCatalog>(catalog: C, id: u32) -> Result<u32, GeometryError> {
            Ok(catalog.module(ModuleId(id))?.n_strips)
        }
        let table = ModuleTable::from_descriptors([descriptor(11)])?;
        assert_eq!(lookup(&table, 11)?, 960);
        Ok(())
    }
}
