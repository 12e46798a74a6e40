pub mod helpers;
pub mod local_transport;

pub use helpers::*;
pub use local_transport::{LocalTransport, ServerInbox};
pub use test_protocol::{
    character_entity, health_entity, prefabs, transform_entity, Health, Transform, HEALTH_ENTITY,
    TRANSFORM_ENTITY,
};
