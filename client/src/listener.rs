use tether_shared::{EventCode, PeerId};

use crate::{
    room::{player::Player, room::Room},
    world::entity::Entity,
};

/// Callbacks raised while the client processes incoming frames. Every method
/// defaults to doing nothing.
pub trait NetworkListener {
    fn on_room_joined(&mut self, _room: &Room) {}

    fn on_join_failed(&mut self, _reason: &str) {}

    fn on_room_left(&mut self) {}

    fn on_player_joined(&mut self, _player: &Player) {}

    fn on_player_left(&mut self, _player: &Player) {}

    /// The room owner changed. Every entity has already moved to the new owner.
    fn on_ownership_changed(&mut self, _owner: &Player) {}

    fn on_scene_load(&mut self, _scene: &str) {}

    fn on_entity_created(&mut self, _entity: &Entity) {}

    /// The entity is already detached and removed from the registry.
    fn on_entity_destroyed(&mut self, _entity: &Entity) {}

    fn on_entity_owner_changed(&mut self, _entity: &Entity) {}

    /// A room-scoped event, from the server or raised locally.
    fn on_event(&mut self, _sender: PeerId, _code: EventCode, _payload: &[u8]) {}

    fn on_entity_event(
        &mut self,
        _entity: &Entity,
        _sender: PeerId,
        _code: EventCode,
        _payload: &[u8],
    ) {
    }

    /// Replicated state was applied to the entity.
    fn on_entity_state(&mut self, _entity: &Entity) {}
}

/// A listener that ignores everything.
impl NetworkListener for () {}
