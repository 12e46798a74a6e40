//! # Tether Client
//! The client half of the tether replication protocol. A `Client` joins a
//! room, keeps the room's entities in sync through delta replication of
//! their properties, and routes room and entity events.

#![deny(trivial_numeric_casts, unstable_features, unused_import_braces)]

pub use tether_shared::{
    decode_payload, encode_payload, Authority, BitReader, BitWrite, BitWriter, EntityAuthority,
    EntityId, EntityLayout, EntityType, EventCode, EventTarget, ExecutionMode, Ignored,
    MessageReader, MessageWriter, Operation, Outcome, PeerId, Property, PropertyCell,
    PropertyLayout, ProtocolError, Rejection, Serde, SerdeErr, StaticId,
};

mod client;
mod client_config;
mod error;
mod listener;
mod room;
mod transport;
mod world;

pub use client::Client;
pub use client_config::ClientConfig;
pub use error::ClientError;
pub use listener::NetworkListener;
pub use room::{player::Player, room::Room};
pub use transport::Transport;
pub use world::{
    behaviour::{Behaviour, EntityContext},
    entity::{Entity, EntityBuilder},
    entity_registry::EntityRegistry,
    error::{EntityError, RegistryError},
    prefab_registry::PrefabRegistry,
    replication_timer::ReplicationTimer,
    scene_host::SceneHost,
};
