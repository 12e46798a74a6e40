pub mod behaviour;
pub mod entity;
pub mod entity_registry;
pub mod error;
pub mod prefab_registry;
pub mod replication_timer;
pub mod scene_host;
