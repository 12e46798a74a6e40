use thiserror::Error;

use tether_shared::{EntityId, EntityType, StaticId};

/// Errors raised by a single entity while it is attached, packed or applied
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EntityError {
    /// `discover_properties` must run before the entity can be attached
    #[error("Entity of type {entity_type} has not discovered its properties")]
    PropertiesNotDiscovered {
        entity_type: EntityType,
    },

    /// The entity already has a network identity
    #[error("Entity {entity_id} is already attached")]
    AlreadyAttached {
        entity_id: EntityId,
    },

    /// The operation needs a network identity the entity does not have yet
    #[error("Entity of type {entity_type} is not attached")]
    NotAttached {
        entity_type: EntityType,
    },

    /// More cells than a delta group can address
    #[error("Entity of type {entity_type} declares {count} properties, more than a delta can carry")]
    TooManyProperties {
        entity_type: EntityType,
        count: usize,
    },

    /// A delta declared a different number of cells than this entity has.
    /// The two peers disagree on the entity's layout.
    #[error("Entity {entity_id} has {expected} properties but the delta carries {found}")]
    PropertyCountMismatch {
        entity_id: EntityId,
        expected: u16,
        found: u16,
    },

    /// A cell value in a delta could not be decoded
    #[error("Delta for entity {entity_id} is malformed or truncated")]
    MalformedDelta {
        entity_id: EntityId,
    },
}

/// Errors raised by the entity registry
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RegistryError {
    /// No factory is registered for the entity type
    #[error("No prefab registered for entity type {entity_type}")]
    UnknownPrefab {
        entity_type: EntityType,
    },

    /// The server announced an id that is already live
    #[error("Entity {entity_id} already exists")]
    DuplicateEntity {
        entity_id: EntityId,
    },

    /// A scene entity was registered twice under the same provisional id
    #[error("Static entity {static_id} is already registered")]
    DuplicateStaticEntity {
        static_id: StaticId,
    },

    #[error(transparent)]
    Entity(#[from] EntityError),
}
