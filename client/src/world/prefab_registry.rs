use std::collections::HashMap;

use tether_shared::{EntityLayout, EntityType};

use crate::world::{entity::Entity, error::RegistryError};

type Factory = Box<dyn Fn() -> Entity>;

struct Prefab {
    factory: Factory,
    layout: EntityLayout,
}

/// Factories for the entity types this client can spawn, keyed by type.
///
/// Each factory is run once at registration so the type's layout is known
/// before any instance exists; create requests advertise it to the server.
#[derive(Default)]
pub struct PrefabRegistry {
    prefabs: HashMap<EntityType, Prefab>,
}

impl PrefabRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers or replaces the factory for `entity_type`.
    pub fn register<F>(&mut self, entity_type: EntityType, factory: F) -> Result<(), RegistryError>
    where
        F: Fn() -> Entity + 'static,
    {
        let mut template = factory();
        template.discover_properties()?;
        let layout = template.layout().cloned().unwrap_or_default();

        self.prefabs.insert(
            entity_type,
            Prefab {
                factory: Box::new(factory),
                layout,
            },
        );
        Ok(())
    }

    /// A fresh, unattached instance with its properties discovered.
    pub fn resolve(&self, entity_type: EntityType) -> Result<Entity, RegistryError> {
        let prefab = self
            .prefabs
            .get(&entity_type)
            .ok_or(RegistryError::UnknownPrefab { entity_type })?;

        let mut entity = (prefab.factory)();
        entity.discover_properties()?;
        Ok(entity)
    }

    pub fn layout(&self, entity_type: EntityType) -> Option<&EntityLayout> {
        self.prefabs.get(&entity_type).map(|prefab| &prefab.layout)
    }

    pub fn contains(&self, entity_type: EntityType) -> bool {
        self.prefabs.contains_key(&entity_type)
    }
}
