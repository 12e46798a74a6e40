use std::collections::HashMap;

use log::{debug, info, warn};

use tether_shared::{
    encode_payload, EntityAuthority, EntityId, EntityLayout, EntityType, EventCode,
    ExecutionMode, Ignored, MessageWriter, Operation, Outcome, PeerId, Rejection, Serde,
    StaticId,
};

use crate::{
    listener::NetworkListener,
    room::player::Player,
    transport::Transport,
    world::{entity::Entity, error::EntityError},
};

/// The joined room: its roster, and the frames a member can send to it.
///
/// Players are indexed by peer id, by stable id and in join order. A player
/// is in all three indexes or in none.
pub struct Room {
    id: String,
    min_players: u16,
    max_players: u16,
    owner_id: String,
    local_id: String,
    order: Vec<PeerId>,
    by_peer: HashMap<PeerId, Player>,
    by_id: HashMap<String, PeerId>,
}

impl Room {
    pub fn new(id: &str, owner_id: &str, local_id: &str, min_players: u16, max_players: u16) -> Self {
        Self {
            id: id.to_string(),
            min_players,
            max_players,
            owner_id: owner_id.to_string(),
            local_id: local_id.to_string(),
            order: Vec::new(),
            by_peer: HashMap::new(),
            by_id: HashMap::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn min_players(&self) -> u16 {
        self.min_players
    }

    pub fn max_players(&self) -> u16 {
        self.max_players
    }

    // Roster

    pub fn owner(&self) -> Option<&Player> {
        self.player(&self.owner_id)
    }

    pub fn local_player(&self) -> Option<&Player> {
        self.player(&self.local_id)
    }

    pub fn player(&self, player_id: &str) -> Option<&Player> {
        self.by_id
            .get(player_id)
            .and_then(|peer_id| self.by_peer.get(peer_id))
    }

    pub fn player_by_peer(&self, peer_id: PeerId) -> Option<&Player> {
        self.by_peer.get(&peer_id)
    }

    /// Players in join order
    pub fn players(&self) -> impl Iterator<Item = &Player> {
        self.order
            .iter()
            .filter_map(move |peer_id| self.by_peer.get(peer_id))
    }

    pub fn player_count(&self) -> usize {
        self.order.len()
    }

    pub fn add_player(&mut self, peer_id: PeerId, player_id: &str, name: &str) -> Outcome {
        if self.by_peer.contains_key(&peer_id) || self.by_id.contains_key(player_id) {
            warn!(
                "Room {}: player {} (peer {}) is already in the roster",
                self.id, player_id, peer_id
            );
            return Outcome::Rejected(Rejection::DuplicatePlayer {
                peer_id,
                player_id: player_id.to_string(),
            });
        }

        let player = Player::new(
            peer_id,
            player_id,
            name,
            player_id == self.owner_id,
            player_id == self.local_id,
        );
        info!("Room {}: {} joined as peer {}", self.id, player_id, peer_id);

        self.order.push(peer_id);
        self.by_id.insert(player_id.to_string(), peer_id);
        self.by_peer.insert(peer_id, player);
        Outcome::Applied
    }

    pub fn remove_player(&mut self, player_id: &str) -> Option<Player> {
        let Some(peer_id) = self.by_id.remove(player_id) else {
            debug!("Room {}: unknown player {} left", self.id, player_id);
            return None;
        };
        self.order.retain(|peer| *peer != peer_id);
        let player = self.by_peer.remove(&peer_id);
        info!("Room {}: {} left", self.id, player_id);
        player
    }

    /// Makes `player_id` the room owner and clears the flag on everyone else.
    pub fn on_ownership_changed(&mut self, player_id: &str) -> Outcome {
        if !self.by_id.contains_key(player_id) {
            debug!("Room {}: ownership moved to unknown player {}", self.id, player_id);
            return Outcome::Ignored(Ignored::UnknownPlayer {
                player_id: player_id.to_string(),
            });
        }

        self.owner_id = player_id.to_string();
        for player in self.by_peer.values_mut() {
            let is_owner = player.id() == player_id;
            player.set_owner(is_owner);
        }
        info!("Room {}: {} is now the owner", self.id, player_id);
        Outcome::Applied
    }

    // Outgoing

    /// Asks the server to switch scene. Only the room owner may.
    pub fn load_scene(
        &self,
        scene: &str,
        writer: &mut MessageWriter,
        transport: &mut dyn Transport,
    ) -> Outcome {
        match self.local_player() {
            Some(local) if local.is_owner() => {}
            Some(_) => {
                warn!("Only the room owner can load a scene, ignoring '{}'", scene);
                return Outcome::Rejected(Rejection::NotRoomOwner);
            }
            None => {
                warn!("Cannot load scene '{}' before the local player joined", scene);
                return Outcome::Rejected(Rejection::NoLocalPlayer);
            }
        }

        writer
            .begin(Operation::LoadScene)
            .write(&scene.to_string());
        transport.send(writer.bytes());
        Outcome::Applied
    }

    pub fn scene_loaded(&self, writer: &mut MessageWriter, transport: &mut dyn Transport) {
        writer.begin(Operation::SceneIsLoaded);
        transport.send(writer.bytes());
    }

    pub fn create_entity<P: Serde>(
        &self,
        entity_type: EntityType,
        authority: EntityAuthority,
        layout: &EntityLayout,
        spawn_payload: &P,
        writer: &mut MessageWriter,
        transport: &mut dyn Transport,
    ) {
        writer
            .begin(Operation::CreateEntity)
            .write(&entity_type)
            .write(&authority)
            .write(layout)
            .write_payload(&encode_payload(spawn_payload));
        transport.send(writer.bytes());
    }

    /// Announces a scene entity under its provisional id.
    pub fn create_static_entity<P: Serde>(
        &self,
        entity: &Entity,
        static_id: StaticId,
        spawn_payload: &P,
        writer: &mut MessageWriter,
        transport: &mut dyn Transport,
    ) {
        writer
            .begin(Operation::CreateStaticEntity)
            .write(&entity.entity_type())
            .write(&entity.authority())
            .write(&static_id);
        entity.write_layout(writer);
        writer.write_payload(&encode_payload(spawn_payload));
        transport.send(writer.bytes());
    }

    pub fn destroy_entity<P: Serde>(
        &self,
        entity_id: EntityId,
        destroy_payload: &P,
        writer: &mut MessageWriter,
        transport: &mut dyn Transport,
    ) {
        writer
            .begin(Operation::DestroyEntity)
            .write(&entity_id)
            .write_payload(&encode_payload(destroy_payload));
        transport.send(writer.bytes());
    }

    /// Raises a room-scoped event. A local invocation sees the payload region
    /// of the built frame, so it matches what the server receives byte for byte.
    pub fn send_event<P: Serde>(
        &self,
        code: EventCode,
        payload: &P,
        mode: ExecutionMode,
        writer: &mut MessageWriter,
        transport: &mut dyn Transport,
        listener: &mut dyn NetworkListener,
    ) -> Outcome {
        let sender = self.local_player().map(Player::peer_id);
        if mode.invokes_locally() && sender.is_none() {
            warn!("Event {} needs a local player to run locally", code);
            return Outcome::Rejected(Rejection::NoLocalPlayer);
        }

        writer
            .begin(Operation::ReplicateEvent)
            .write(&code)
            .write(&mode)
            .write_payload(&encode_payload(payload));

        if let Some(sender) = sender.filter(|_| mode.invokes_locally()) {
            listener.on_event(sender, code, writer.payload());
        }

        if mode.sends_to_server() {
            transport.send(writer.bytes());
        }

        Outcome::Applied
    }

    /// Pushes the entity's full state right away, outside the replication
    /// tick. Dirty cells stay dirty for the next batch.
    pub fn send_entity_state(
        &self,
        entity: &Entity,
        writer: &mut MessageWriter,
        transport: &mut dyn Transport,
    ) -> Result<(), EntityError> {
        writer.begin(Operation::ReplicateEntityState);
        entity.write_snapshot(writer)?;
        transport.send(writer.bytes());
        Ok(())
    }
}
