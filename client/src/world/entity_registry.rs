use std::{collections::HashMap, time::Duration};

use log::{debug, info, trace, warn};

use tether_shared::{
    EntityAuthority, EntityId, EntityType, EventCode, Ignored, MessageReader, MessageWriter,
    Operation, Outcome, PeerId, StaticId,
};

use crate::{
    client_config::ClientConfig,
    error::ClientError,
    room::{player::Player, room::Room},
    transport::Transport,
    world::{
        entity::Entity, error::RegistryError, prefab_registry::PrefabRegistry,
        replication_timer::ReplicationTimer, scene_host::SceneHost,
    },
};

/// Provisional ids handed to scene entities count up from here, exclusive.
const STATIC_ID_BASE: StaticId = 1;

/// Every entity the client knows about, and the replication tick for the ones
/// it owns.
///
/// Live entities are indexed by network id, in insertion order, and (for the
/// locally owned ones) in an owned list that the tick walks. Scene entities
/// wait in a pending map under their provisional id until the server assigns
/// them a network id.
pub struct EntityRegistry {
    entities: HashMap<EntityId, Entity>,
    order: Vec<EntityId>,
    owned: Vec<EntityId>,
    pending_static: HashMap<StaticId, Entity>,
    prefabs: PrefabRegistry,
    timer: ReplicationTimer,
}

impl EntityRegistry {
    pub fn new(config: &ClientConfig, prefabs: PrefabRegistry) -> Self {
        Self {
            entities: HashMap::new(),
            order: Vec::new(),
            owned: Vec::new(),
            pending_static: HashMap::new(),
            prefabs,
            timer: ReplicationTimer::new(config.replication_interval()),
        }
    }

    pub fn prefabs(&self) -> &PrefabRegistry {
        &self.prefabs
    }

    pub fn prefabs_mut(&mut self) -> &mut PrefabRegistry {
        &mut self.prefabs
    }

    // Lookup

    pub fn entity(&self, entity_id: EntityId) -> Option<&Entity> {
        self.entities.get(&entity_id)
    }

    pub fn entity_mut(&mut self, entity_id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(&entity_id)
    }

    pub fn contains(&self, entity_id: EntityId) -> bool {
        self.entities.contains_key(&entity_id)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Live entity ids in insertion order
    pub fn ids(&self) -> &[EntityId] {
        &self.order
    }

    /// Locally owned entity ids in insertion order
    pub fn owned_ids(&self) -> &[EntityId] {
        &self.owned
    }

    pub fn pending_static(&self, static_id: StaticId) -> Option<&Entity> {
        self.pending_static.get(&static_id)
    }

    pub fn pending_static_count(&self) -> usize {
        self.pending_static.len()
    }

    // Static entities

    pub fn register_static(
        &mut self,
        static_id: StaticId,
        mut entity: Entity,
    ) -> Result<(), RegistryError> {
        if self.pending_static.contains_key(&static_id) {
            return Err(RegistryError::DuplicateStaticEntity { static_id });
        }
        entity.discover_properties()?;
        entity.set_static_id(static_id);
        self.pending_static.insert(static_id, entity);
        Ok(())
    }

    /// Takes the scene's root entities, gives each a provisional id in root
    /// order and, when the local player owns the room, announces them to the
    /// server. Returns how many were registered.
    pub fn collect_scene_entities(
        &mut self,
        scene_host: &mut dyn SceneHost,
        room: &Room,
        writer: &mut MessageWriter,
        transport: &mut dyn Transport,
    ) -> Result<usize, RegistryError> {
        let entities = scene_host.root_entities();
        info!("Found {} scene entities", entities.len());

        let announce = room.local_player().is_some_and(Player::is_owner);
        let mut static_id = STATIC_ID_BASE;
        let mut registered = 0;

        for mut entity in entities {
            let Some(next) = static_id.checked_add(1) else {
                warn!("Ran out of provisional ids, {} scene entities left out", registered);
                break;
            };
            static_id = next;

            entity.discover_properties()?;
            if announce {
                room.create_static_entity(&entity, static_id, &(), writer, transport);
            }
            self.register_static(static_id, entity)?;
            registered += 1;
        }

        Ok(registered)
    }

    /// Gives a pending scene entity its network identity. An unknown
    /// provisional id is a race with the server and is ignored.
    #[allow(clippy::too_many_arguments)]
    pub fn resolve_static(
        &mut self,
        static_id: StaticId,
        entity_id: EntityId,
        entity_type: EntityType,
        authority: EntityAuthority,
        creator: Player,
        spawn_payload: &[u8],
        room: &Room,
    ) -> Result<Outcome, RegistryError> {
        if self.entities.contains_key(&entity_id) {
            return Err(RegistryError::DuplicateEntity { entity_id });
        }
        let Some(mut entity) = self.pending_static.remove(&static_id) else {
            debug!("Static entity {} is not pending, ignoring", static_id);
            return Ok(Outcome::Ignored(Ignored::UnknownStaticEntity { static_id }));
        };

        entity.set_authority(authority);
        let attached = entity
            .discover_properties()
            .and_then(|_| {
                entity.attach(room.local_player(), entity_type, creator, entity_id, spawn_payload)
            });
        if let Err(error) = attached {
            self.pending_static.insert(static_id, entity);
            return Err(error.into());
        }

        self.insert(entity_id, entity);
        Ok(Outcome::Applied)
    }

    // Dynamic entities

    /// Instantiates `entity_type` from its prefab and attaches it under
    /// `entity_id`.
    pub fn create(
        &mut self,
        entity_id: EntityId,
        entity_type: EntityType,
        authority: EntityAuthority,
        creator: Player,
        spawn_payload: &[u8],
        room: &Room,
    ) -> Result<&Entity, RegistryError> {
        if self.entities.contains_key(&entity_id) {
            return Err(RegistryError::DuplicateEntity { entity_id });
        }

        let mut entity = self.prefabs.resolve(entity_type)?;
        entity.set_authority(authority);
        entity.attach(room.local_player(), entity_type, creator, entity_id, spawn_payload)?;

        self.insert(entity_id, entity);
        self.entities
            .get(&entity_id)
            .ok_or(RegistryError::DuplicateEntity { entity_id })
    }

    fn insert(&mut self, entity_id: EntityId, entity: Entity) {
        if entity.is_mine() {
            self.owned.push(entity_id);
        }
        self.order.push(entity_id);
        self.entities.insert(entity_id, entity);
    }

    /// Detaches and removes the entity, handing it back to the caller.
    pub fn destroy(&mut self, entity_id: EntityId, destroy_payload: &[u8]) -> Option<Entity> {
        let Some(mut entity) = self.entities.remove(&entity_id) else {
            debug!("Destroy for unknown entity {}, ignoring", entity_id);
            return None;
        };
        self.order.retain(|id| *id != entity_id);
        self.owned.retain(|id| *id != entity_id);

        let _ = entity.detach(destroy_payload);
        Some(entity)
    }

    // Routing

    pub fn on_entity_event(
        &mut self,
        entity_id: EntityId,
        sender: PeerId,
        code: EventCode,
        payload: &[u8],
    ) -> Outcome {
        match self.entities.get_mut(&entity_id) {
            Some(entity) => {
                entity.process_event(sender, code, payload);
                Outcome::Applied
            }
            None => {
                debug!("Event {} for unknown entity {}, ignoring", code, entity_id);
                Outcome::Ignored(Ignored::UnknownEntity { entity_id })
            }
        }
    }

    /// Applies the rest of a delta group whose id the caller has read. When
    /// the entity is unknown the group is left unread: its length cannot be
    /// known without the entity's layout.
    pub fn on_entity_state(
        &mut self,
        entity_id: EntityId,
        reader: &mut MessageReader,
    ) -> Result<Outcome, RegistryError> {
        let Some(entity) = self.entities.get_mut(&entity_id) else {
            debug!("State for unknown entity {}, ignoring", entity_id);
            return Ok(Outcome::Ignored(Ignored::UnknownEntity { entity_id }));
        };

        entity.apply_delta(reader)?;
        Ok(Outcome::Applied)
    }

    /// Checks a state batch whose count the caller has read, without applying
    /// anything. Stops where applying would stop: at the first unknown entity.
    pub fn check_state_batch(
        &self,
        count: u16,
        mut reader: MessageReader,
    ) -> Result<(), ClientError> {
        for _ in 0..count {
            let entity_id = reader.read::<EntityId>()?;
            let Some(entity) = self.entities.get(&entity_id) else {
                return Ok(());
            };
            entity.check_delta(&mut reader)?;
        }
        Ok(())
    }

    pub fn change_entity_owner(
        &mut self,
        entity_id: EntityId,
        owner: Player,
        local_player: Option<&Player>,
    ) -> Outcome {
        let Some(entity) = self.entities.get_mut(&entity_id) else {
            debug!("Owner change for unknown entity {}, ignoring", entity_id);
            return Outcome::Ignored(Ignored::UnknownEntity { entity_id });
        };

        entity.change_owner(owner, local_player);
        self.rebuild_owned();
        Outcome::Applied
    }

    /// The room owner changed: every live entity follows.
    pub fn on_ownership_changed(&mut self, owner: &Player, local_player: Option<&Player>) {
        for entity in self.entities.values_mut() {
            entity.change_owner(owner.clone(), local_player);
        }
        self.rebuild_owned();
    }

    fn rebuild_owned(&mut self) {
        let entities = &self.entities;
        self.owned = self
            .order
            .iter()
            .copied()
            .filter(|id| entities.get(id).is_some_and(Entity::is_mine))
            .collect();
    }

    /// Runs every live entity's per-update hooks, in insertion order.
    pub fn tick(&mut self) {
        for entity_id in &self.order {
            if let Some(entity) = self.entities.get_mut(entity_id) {
                entity.tick();
            }
        }
    }

    // Replication

    /// Advances the tick. Returns the number of entities replicated when the
    /// tick fired, `None` otherwise.
    pub fn update(
        &mut self,
        elapsed: Duration,
        writer: &mut MessageWriter,
        transport: &mut dyn Transport,
    ) -> Option<usize> {
        if !self.timer.tick(elapsed) {
            return None;
        }
        Some(self.replicate(writer, transport))
    }

    /// Packs every owned, auto-replicated, dirty entity into one batch frame
    /// and sends it.
    ///
    /// A tick with no changed entity sends no frame at all rather than a
    /// batch with a zero count. Receivers apply nothing for either, so only
    /// the traffic differs.
    pub fn replicate(&mut self, writer: &mut MessageWriter, transport: &mut dyn Transport) -> usize {
        writer.begin(Operation::ReplicateEntityStateBatch);
        let slot = writer.reserve_u16();
        let mut changed: u16 = 0;

        for entity_id in &self.owned {
            let Some(entity) = self.entities.get_mut(entity_id) else {
                continue;
            };
            if !entity.auto_replication() {
                continue;
            }
            if changed == u16::MAX {
                warn!("Replication batch is full, remaining entities wait for the next tick");
                break;
            }
            match entity.pack_delta(writer) {
                Ok(true) => changed += 1,
                Ok(false) => {}
                Err(error) => warn!("Skipping entity {} in replication: {}", entity_id, error),
            }
        }

        if changed == 0 {
            return 0;
        }
        if writer.patch_u16(slot, changed).is_err() {
            warn!("Could not write the replication batch count, batch dropped");
            return 0;
        }

        trace!("Replicating {} entities", changed);
        transport.send(writer.bytes());
        usize::from(changed)
    }

    /// Detaches every live entity and forgets everything, pending scene
    /// entities included. The tick starts over.
    pub fn cleanup(&mut self) {
        for entity_id in &self.order {
            if let Some(entity) = self.entities.get_mut(entity_id) {
                let _ = entity.detach(&[]);
            }
        }

        self.entities.clear();
        self.order.clear();
        self.owned.clear();
        self.pending_static.clear();
        self.timer.reset();
    }
}
