//! Namespace root: the adapter's top-level folder and its fixed containers.

use csa_core::config::defaults;
use csa_core::{AddressSpace, NodeHandle};
use tracing::info;

use crate::document::RootSettings;
use crate::error::{MappingError, Result};
use crate::registry::FolderRegistry;

/// Handles of the root folder and the default containers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NamespaceRoot {
    pub root: NodeHandle,
    /// Default destination for variables no rule maps.
    pub variables: NodeHandle,
    pub constants: NodeHandle,
}

impl NamespaceRoot {
    /// Create the root folder below the address space's base folder, then
    /// `Variables` and `Constants` below it.
    pub fn build<A: AddressSpace>(
        registry: &mut FolderRegistry<A>,
        settings: &RootSettings,
    ) -> Result<Self> {
        let base = registry.space().base_folder();
        let root = registry
            .create_folder(base, &settings.root_folder, &settings.description)
            .ok_or_else(|| {
                MappingError::Namespace(format!(
                    "cannot create root folder '{}'",
                    settings.root_folder
                ))
            })?;

        let variables = Self::container(registry, root, defaults::VARIABLES_FOLDER)?;
        let constants = Self::container(registry, root, defaults::CONSTANTS_FOLDER)?;

        info!(
            category = "namespace",
            root = %settings.root_folder,
            id = %root,
            "Namespace root created"
        );

        Ok(Self {
            root,
            variables,
            constants,
        })
    }

    fn container<A: AddressSpace>(
        registry: &mut FolderRegistry<A>,
        root: NodeHandle,
        name: &str,
    ) -> Result<NodeHandle> {
        registry
            .create_folder(root, name, "")
            .ok_or_else(|| MappingError::Namespace(format!("cannot create '{}' container", name)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use csa_core::MemoryAddressSpace;

    #[test]
    fn test_build_root() {
        let mut registry = FolderRegistry::new(MemoryAddressSpace::new());
        let settings = RootSettings {
            root_folder: "Plant".to_string(),
            description: "Test plant".to_string(),
            ..Default::default()
        };

        let ns = NamespaceRoot::build(&mut registry, &settings).unwrap();

        let base = registry.space().base_folder();
        assert_eq!(registry.exists(base, "Plant"), Some(ns.root));
        assert_eq!(registry.exists(ns.root, "Variables"), Some(ns.variables));
        assert_eq!(registry.exists(ns.root, "Constants"), Some(ns.constants));
        assert_eq!(registry.len(), 3);
        assert_eq!(registry.get(ns.root).unwrap().description, "Test plant");
    }
}
