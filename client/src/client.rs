use std::time::Duration;

use log::{debug, info, warn};

use tether_shared::{
    EntityAuthority, EntityId, EntityType, EventCode, EventTarget, ExecutionMode, Ignored,
    MessageReader, MessageWriter, Operation, Outcome, PeerId, ProtocolError, Rejection, Serde,
    StaticId,
};

use crate::{
    client_config::ClientConfig,
    error::ClientError,
    listener::NetworkListener,
    room::room::Room,
    transport::Transport,
    world::{
        entity::Entity, entity_registry::EntityRegistry, error::RegistryError,
        prefab_registry::PrefabRegistry, scene_host::SceneHost,
    },
};

/// Client can join a room, receive frames from its server, replicate owned
/// entities and raise events
pub struct Client<T: Transport, L: NetworkListener> {
    config: ClientConfig,
    transport: T,
    listener: L,
    scene_host: Option<Box<dyn SceneHost>>,
    writer: MessageWriter,
    room: Option<Room>,
    registry: EntityRegistry,
}

impl<T: Transport, L: NetworkListener> Client<T, L> {
    /// Create a new Client
    pub fn new(config: ClientConfig, transport: T, listener: L, prefabs: PrefabRegistry) -> Self {
        let registry = EntityRegistry::new(&config, prefabs);
        Self {
            config,
            transport,
            listener,
            scene_host: None,
            writer: MessageWriter::new(),
            room: None,
            registry,
        }
    }

    /// Sets the scene graph that pre-placed entities are collected from and
    /// new entities are instantiated into
    pub fn with_scene_host<S: SceneHost + 'static>(mut self, scene_host: S) -> Self {
        self.scene_host = Some(Box::new(scene_host));
        self
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn room(&self) -> Option<&Room> {
        self.room.as_ref()
    }

    pub fn is_in_room(&self) -> bool {
        self.room.is_some()
    }

    pub fn registry(&self) -> &EntityRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut EntityRegistry {
        &mut self.registry
    }

    pub fn entity(&self, entity_id: EntityId) -> Option<&Entity> {
        self.registry.entity(entity_id)
    }

    pub fn entity_mut(&mut self, entity_id: EntityId) -> Option<&mut Entity> {
        self.registry.entity_mut(entity_id)
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    pub fn listener(&self) -> &L {
        &self.listener
    }

    pub fn listener_mut(&mut self) -> &mut L {
        &mut self.listener
    }

    // Tick

    /// Runs every entity's per-update hooks, then advances the replication
    /// tick by `elapsed`. Returns how many entities were replicated when the
    /// tick fired.
    pub fn update(&mut self, elapsed: Duration) -> Option<usize> {
        if self.room.is_none() {
            return None;
        }
        self.registry.tick();
        self.registry
            .update(elapsed, &mut self.writer, &mut self.transport)
    }

    // Incoming

    /// Decodes one frame from the server and routes it. A frame that cannot be
    /// decoded is dropped whole and the error returned; the session goes on.
    pub fn receive(&mut self, frame: &[u8]) -> Result<(), ClientError> {
        let result = self.process(frame);
        if let Err(error) = &result {
            warn!("Dropping incoming frame: {}", error);
        }
        result
    }

    fn process(&mut self, frame: &[u8]) -> Result<(), ClientError> {
        let mut reader = MessageReader::new(frame)?;
        match reader.operation() {
            Operation::JoinSuccess => self.on_join_success(&mut reader),
            Operation::JoinFailed => {
                let reason = reader.read::<String>()?;
                info!("Join failed: {}", reason);
                self.listener.on_join_failed(&reason);
                Ok(())
            }
            Operation::PlayerJoined => self.on_player_joined(&mut reader),
            Operation::PlayerLeft => self.on_player_left(&mut reader),
            Operation::OwnershipChanged => self.on_ownership_changed(&mut reader),
            Operation::LoadScene => {
                let scene = reader.read::<String>()?;
                info!("Loading scene {}", scene);
                self.registry.cleanup();
                self.listener.on_scene_load(&scene);
                Ok(())
            }
            Operation::CreateEntity => self.on_create_entity(&mut reader),
            Operation::CreateStaticEntity => self.on_create_static_entity(&mut reader),
            Operation::DestroyEntity => {
                let entity_id = reader.read::<EntityId>()?;
                let payload = reader.payload();
                if let Some(entity) = self.registry.destroy(entity_id, payload) {
                    self.listener.on_entity_destroyed(&entity);
                }
                Ok(())
            }
            Operation::EntityOwnershipChanged => self.on_entity_owner_changed(&mut reader),
            Operation::ReplicateEvent => {
                let code = reader.read::<EventCode>()?;
                let sender = reader.read::<PeerId>()?;
                let payload = reader.payload();
                self.listener.on_event(sender, code, payload);
                Ok(())
            }
            Operation::ReplicateEntityEvent => {
                let entity_id = reader.read::<EntityId>()?;
                let code = reader.read::<EventCode>()?;
                let sender = reader.read::<PeerId>()?;
                let payload = reader.payload();
                let outcome = self
                    .registry
                    .on_entity_event(entity_id, sender, code, payload);
                if let (Outcome::Applied, Some(entity)) = (outcome, self.registry.entity(entity_id)) {
                    self.listener.on_entity_event(entity, sender, code, payload);
                }
                Ok(())
            }
            Operation::ReplicateEntityState => {
                let entity_id = reader.read::<EntityId>()?;
                self.apply_state(entity_id, &mut reader).map(|_| ())
            }
            Operation::ReplicateEntityStateBatch => {
                let count = reader.read::<u16>()?;
                self.registry.check_state_batch(count, reader.clone())?;
                for _ in 0..count {
                    let entity_id = reader.read::<EntityId>()?;
                    if self.apply_state(entity_id, &mut reader)?.is_ignored() {
                        debug!(
                            "Rest of the state batch skipped after unknown entity {}",
                            entity_id
                        );
                        break;
                    }
                }
                Ok(())
            }
            operation @ (Operation::LeaveRoom | Operation::SceneIsLoaded) => {
                Err(ProtocolError::UnexpectedOperation { operation }.into())
            }
        }
    }

    fn on_join_success(&mut self, reader: &mut MessageReader) -> Result<(), ClientError> {
        let room_id = reader.read::<String>()?;
        let owner_id = reader.read::<String>()?;
        let local_id = reader.read::<String>()?;
        let min_players = reader.read::<u16>()?;
        let max_players = reader.read::<u16>()?;

        if self.room.is_some() {
            self.registry.cleanup();
        }

        let room = Room::new(&room_id, &owner_id, &local_id, min_players, max_players);
        info!("Joined room {}", room_id);
        self.listener.on_room_joined(&room);
        self.room = Some(room);
        Ok(())
    }

    fn on_player_joined(&mut self, reader: &mut MessageReader) -> Result<(), ClientError> {
        let peer_id = reader.read::<PeerId>()?;
        let player_id = reader.read::<String>()?;
        let name = reader.read::<String>()?;

        let Some(room) = &mut self.room else {
            debug!("Player {} joined while not in a room, ignoring", player_id);
            return Ok(());
        };
        if room.add_player(peer_id, &player_id, &name).is_applied() {
            if let Some(player) = room.player(&player_id) {
                self.listener.on_player_joined(player);
            }
        }
        Ok(())
    }

    fn on_player_left(&mut self, reader: &mut MessageReader) -> Result<(), ClientError> {
        let player_id = reader.read::<String>()?;

        let Some(room) = &mut self.room else {
            debug!("Player {} left while not in a room, ignoring", player_id);
            return Ok(());
        };
        if let Some(player) = room.remove_player(&player_id) {
            self.listener.on_player_left(&player);
        }
        Ok(())
    }

    fn on_ownership_changed(&mut self, reader: &mut MessageReader) -> Result<(), ClientError> {
        let player_id = reader.read::<String>()?;

        let Some(room) = &mut self.room else {
            debug!("Ownership change while not in a room, ignoring");
            return Ok(());
        };
        if !room.on_ownership_changed(&player_id).is_applied() {
            return Ok(());
        }
        if let Some(owner) = room.owner() {
            self.registry.on_ownership_changed(owner, room.local_player());
            self.listener.on_ownership_changed(owner);
        }
        Ok(())
    }

    fn on_create_entity(&mut self, reader: &mut MessageReader) -> Result<(), ClientError> {
        let entity_type = reader.read::<EntityType>()?;
        let authority = reader.read::<EntityAuthority>()?;
        let entity_id = reader.read::<EntityId>()?;
        let creator_peer = reader.read::<PeerId>()?;
        let payload = reader.payload();

        let Some(room) = &self.room else {
            debug!("Entity {} created while not in a room, ignoring", entity_id);
            return Ok(());
        };
        let Some(creator) = room.player_by_peer(creator_peer).cloned() else {
            debug!("Entity {} created by unknown peer {}, ignoring", entity_id, creator_peer);
            return Ok(());
        };

        let entity = self
            .registry
            .create(entity_id, entity_type, authority, creator, payload, room)?;
        if let Some(scene_host) = &mut self.scene_host {
            scene_host.instantiate(entity);
        }
        self.listener.on_entity_created(entity);
        Ok(())
    }

    fn on_create_static_entity(&mut self, reader: &mut MessageReader) -> Result<(), ClientError> {
        let entity_type = reader.read::<EntityType>()?;
        let authority = reader.read::<EntityAuthority>()?;
        let static_id = reader.read::<StaticId>()?;
        let entity_id = reader.read::<EntityId>()?;
        let creator_peer = reader.read::<PeerId>()?;
        let payload = reader.payload();

        let Some(room) = &self.room else {
            debug!("Static entity {} created while not in a room, ignoring", static_id);
            return Ok(());
        };
        let Some(creator) = room.player_by_peer(creator_peer).cloned() else {
            debug!("Static entity {} created by unknown peer {}, ignoring", static_id, creator_peer);
            return Ok(());
        };

        let outcome = self.registry.resolve_static(
            static_id,
            entity_id,
            entity_type,
            authority,
            creator,
            payload,
            room,
        )?;
        if let (Outcome::Applied, Some(entity)) = (outcome, self.registry.entity(entity_id)) {
            self.listener.on_entity_created(entity);
        }
        Ok(())
    }

    fn on_entity_owner_changed(&mut self, reader: &mut MessageReader) -> Result<(), ClientError> {
        let entity_id = reader.read::<EntityId>()?;
        let owner_peer = reader.read::<PeerId>()?;

        let Some(room) = &self.room else {
            debug!("Entity {} changed owner while not in a room, ignoring", entity_id);
            return Ok(());
        };
        let Some(owner) = room.player_by_peer(owner_peer).cloned() else {
            debug!("Entity {} moved to unknown peer {}, ignoring", entity_id, owner_peer);
            return Ok(());
        };

        let outcome = self
            .registry
            .change_entity_owner(entity_id, owner, room.local_player());
        if let (Outcome::Applied, Some(entity)) = (outcome, self.registry.entity(entity_id)) {
            self.listener.on_entity_owner_changed(entity);
        }
        Ok(())
    }

    fn apply_state(
        &mut self,
        entity_id: EntityId,
        reader: &mut MessageReader,
    ) -> Result<Outcome, ClientError> {
        let outcome = self.registry.on_entity_state(entity_id, reader)?;
        if let (Outcome::Applied, Some(entity)) = (&outcome, self.registry.entity(entity_id)) {
            self.listener.on_entity_state(entity);
        }
        Ok(outcome)
    }

    // Outgoing

    /// Leaves the room: tells the server, detaches every entity and drops the
    /// roster.
    pub fn leave_room(&mut self) -> Outcome {
        let Some(room) = self.room.take() else {
            return Outcome::Rejected(Rejection::NotInRoom);
        };

        self.writer.begin(Operation::LeaveRoom);
        self.transport.send(self.writer.bytes());
        self.registry.cleanup();
        info!("Left room {}", room.id());
        self.listener.on_room_left();
        Outcome::Applied
    }

    pub fn load_scene(&mut self, scene: &str) -> Outcome {
        let Some(room) = &self.room else {
            return Outcome::Rejected(Rejection::NotInRoom);
        };
        room.load_scene(scene, &mut self.writer, &mut self.transport)
    }

    pub fn scene_loaded(&mut self) -> Outcome {
        let Some(room) = &self.room else {
            return Outcome::Rejected(Rejection::NotInRoom);
        };
        room.scene_loaded(&mut self.writer, &mut self.transport);
        Outcome::Applied
    }

    /// Registers the scene host's root entities as static entities and, when
    /// the local player owns the room, announces them.
    pub fn collect_scene_entities(&mut self) -> Result<usize, ClientError> {
        let Some(room) = &self.room else {
            warn!("Cannot collect scene entities outside a room");
            return Ok(0);
        };
        let Some(scene_host) = &mut self.scene_host else {
            warn!("Cannot collect scene entities without a scene host");
            return Ok(0);
        };

        let count = self.registry.collect_scene_entities(
            scene_host.as_mut(),
            room,
            &mut self.writer,
            &mut self.transport,
        )?;
        Ok(count)
    }

    /// Asks the server to spawn an entity of a registered prefab type.
    pub fn create_entity<P: Serde>(
        &mut self,
        entity_type: EntityType,
        authority: EntityAuthority,
        spawn_payload: &P,
    ) -> Result<Outcome, ClientError> {
        let Some(room) = &self.room else {
            return Ok(Outcome::Rejected(Rejection::NotInRoom));
        };
        let layout = self
            .registry
            .prefabs()
            .layout(entity_type)
            .ok_or(RegistryError::UnknownPrefab { entity_type })?;

        room.create_entity(
            entity_type,
            authority,
            layout,
            spawn_payload,
            &mut self.writer,
            &mut self.transport,
        );
        Ok(Outcome::Applied)
    }

    pub fn destroy_entity<P: Serde>(&mut self, entity_id: EntityId, destroy_payload: &P) -> Outcome {
        let Some(room) = &self.room else {
            return Outcome::Rejected(Rejection::NotInRoom);
        };
        if !self.registry.contains(entity_id) {
            debug!("Destroy requested for unknown entity {}, ignoring", entity_id);
            return Outcome::Ignored(Ignored::UnknownEntity { entity_id });
        }
        room.destroy_entity(entity_id, destroy_payload, &mut self.writer, &mut self.transport);
        Outcome::Applied
    }

    pub fn send_event<P: Serde>(&mut self, code: EventCode, payload: &P, mode: ExecutionMode) -> Outcome {
        let Some(room) = &self.room else {
            return Outcome::Rejected(Rejection::NotInRoom);
        };
        room.send_event(
            code,
            payload,
            mode,
            &mut self.writer,
            &mut self.transport,
            &mut self.listener,
        )
    }

    /// Raises an event on an entity. A local invocation reaches the entity's
    /// behaviours and then the listener, both with the payload bytes of the
    /// frame the server would get.
    pub fn send_entity_event<P: Serde>(
        &mut self,
        entity_id: EntityId,
        code: EventCode,
        payload: &P,
        target: EventTarget,
        mode: ExecutionMode,
    ) -> Outcome {
        let Some(room) = &self.room else {
            return Outcome::Rejected(Rejection::NotInRoom);
        };
        let Some(entity) = self.registry.entity_mut(entity_id) else {
            debug!("Event {} for unknown entity {}, ignoring", code, entity_id);
            return Outcome::Ignored(Ignored::UnknownEntity { entity_id });
        };
        let local_player = room.local_player();
        let outcome = entity.replicate_event(
            code,
            payload,
            target,
            mode,
            local_player,
            &mut self.writer,
            &mut self.transport,
        );

        if let (Outcome::Applied, Some(sender)) = (&outcome, local_player) {
            if mode.invokes_locally() {
                self.listener
                    .on_entity_event(entity, sender.peer_id(), code, self.writer.payload());
            }
        }
        outcome
    }

    /// Pushes the entity's full state now, outside the replication tick.
    pub fn send_entity_state(&mut self, entity_id: EntityId) -> Result<Outcome, ClientError> {
        let Some(room) = &self.room else {
            return Ok(Outcome::Rejected(Rejection::NotInRoom));
        };
        let Some(entity) = self.registry.entity(entity_id) else {
            debug!("State push for unknown entity {}, ignoring", entity_id);
            return Ok(Outcome::Ignored(Ignored::UnknownEntity { entity_id }));
        };
        room.send_entity_state(entity, &mut self.writer, &mut self.transport)?;
        Ok(Outcome::Applied)
    }
}
