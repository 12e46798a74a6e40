use std::fmt;

use log::warn;

use tether_shared::{
    decode_payload, encode_payload, EntityAuthority, EntityId, EntityLayout, EntityType,
    EventCode, EventTarget, ExecutionMode, MessageReader, MessageWriter, Operation, Outcome,
    Ignored, PeerId, Rejection, Serde, SerdeErr, StaticId,
};

use crate::{
    room::player::Player,
    transport::Transport,
    world::{
        behaviour::{Behaviour, EntityContext},
        error::EntityError,
    },
};

/// A replicated object: an ordered set of behaviours, and through them an
/// ordered set of property cells, plus identity, ownership and authority.
///
/// The cell order is discovered once from the behaviours and is the order
/// deltas travel in. It never changes for the lifetime of the entity.
pub struct Entity {
    id: Option<EntityId>,
    entity_type: EntityType,
    static_id: Option<StaticId>,
    owner: Option<Player>,
    authority: EntityAuthority,
    attached: bool,
    detached: bool,
    is_mine: bool,
    auto_replication: bool,
    behaviours: Vec<Box<dyn Behaviour>>,
    layout: Option<EntityLayout>,
    spawn_payload: Vec<u8>,
    destroy_payload: Vec<u8>,
}

impl Entity {
    pub fn builder(entity_type: EntityType) -> EntityBuilder {
        EntityBuilder::new(entity_type)
    }

    // Identity

    pub fn id(&self) -> Option<EntityId> {
        self.id
    }

    pub fn entity_type(&self) -> EntityType {
        self.entity_type
    }

    pub fn static_id(&self) -> Option<StaticId> {
        self.static_id
    }

    pub(crate) fn set_static_id(&mut self, static_id: StaticId) {
        self.static_id = Some(static_id);
    }

    /// Identifies the owning player. The role flags on the returned value are
    /// those the player had when ownership last moved; ask the room for the
    /// current ones.
    pub fn owner(&self) -> Option<&Player> {
        self.owner.as_ref()
    }

    pub fn authority(&self) -> EntityAuthority {
        self.authority
    }

    pub(crate) fn set_authority(&mut self, authority: EntityAuthority) {
        self.authority = authority;
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    pub fn is_detached(&self) -> bool {
        self.detached
    }

    pub fn is_mine(&self) -> bool {
        self.is_mine
    }

    pub fn auto_replication(&self) -> bool {
        self.auto_replication
    }

    pub fn set_auto_replication(&mut self, auto_replication: bool) {
        self.auto_replication = auto_replication;
    }

    /// Whether the local player may change this entity's replicated state
    pub fn can_mutate_state(&self) -> bool {
        self.attached && !self.detached && self.authority.permits_state(self.is_mine)
    }

    /// Whether the local player may raise events on this entity
    pub fn can_trigger_events(&self) -> bool {
        self.attached && !self.detached && self.authority.permits_events(self.is_mine)
    }

    // Behaviours

    pub fn behaviour<B: Behaviour>(&self) -> Option<&B> {
        self.behaviours
            .iter()
            .find_map(|behaviour| behaviour.as_any().downcast_ref::<B>())
    }

    pub fn behaviour_mut<B: Behaviour>(&mut self) -> Option<&mut B> {
        self.behaviours
            .iter_mut()
            .find_map(|behaviour| behaviour.as_any_mut().downcast_mut::<B>())
    }

    // Layout

    /// Walks the behaviours in order and records the layout of every cell.
    /// Runs once; later calls keep the first result.
    pub fn discover_properties(&mut self) -> Result<(), EntityError> {
        if self.layout.is_some() {
            return Ok(());
        }

        let mut layout = EntityLayout::default();
        for behaviour in &self.behaviours {
            behaviour.visit_properties(&mut |cell| layout.push(cell.layout()));
        }

        if layout.len() > usize::from(u16::MAX) {
            return Err(EntityError::TooManyProperties {
                entity_type: self.entity_type,
                count: layout.len(),
            });
        }

        self.layout = Some(layout);
        Ok(())
    }

    pub fn layout(&self) -> Option<&EntityLayout> {
        self.layout.as_ref()
    }

    /// Hash of the discovered layout, comparable across builds
    pub fn schema_hash(&self) -> Option<u64> {
        self.layout.as_ref().map(EntityLayout::schema_hash)
    }

    pub fn property_count(&self) -> u16 {
        match &self.layout {
            Some(layout) => u16::try_from(layout.len()).unwrap_or(u16::MAX),
            None => {
                let mut count: u16 = 0;
                for behaviour in &self.behaviours {
                    behaviour.visit_properties(&mut |_| count = count.saturating_add(1));
                }
                count
            }
        }
    }

    /// Writes the discovered layout, or an empty one before discovery.
    pub fn write_layout(&self, writer: &mut MessageWriter) {
        match &self.layout {
            Some(layout) => writer.write(layout),
            None => writer.write(&EntityLayout::default()),
        };
    }

    // Lifecycle

    /// Gives the entity its network identity and owner, numbers its cells and
    /// tells every behaviour.
    pub fn attach(
        &mut self,
        local_player: Option<&Player>,
        entity_type: EntityType,
        owner: Player,
        id: EntityId,
        spawn_payload: &[u8],
    ) -> Result<(), EntityError> {
        if self.attached {
            return Err(EntityError::AlreadyAttached {
                entity_id: self.id.unwrap_or(id),
            });
        }
        if self.layout.is_none() {
            return Err(EntityError::PropertiesNotDiscovered {
                entity_type: self.entity_type,
            });
        }

        self.id = Some(id);
        self.entity_type = entity_type;
        self.is_mine = local_player == Some(&owner);
        self.owner = Some(owner);
        self.spawn_payload = spawn_payload.to_vec();
        self.attached = true;

        let mut index: u16 = 0;
        for behaviour in &mut self.behaviours {
            behaviour.visit_properties_mut(&mut |cell| {
                cell.attach(index);
                index = index.wrapping_add(1);
            });
        }

        if let Some(owner) = &self.owner {
            let context = EntityContext {
                id,
                entity_type: self.entity_type,
                owner,
                is_mine: self.is_mine,
            };
            for behaviour in &mut self.behaviours {
                behaviour.on_attached(&context, &self.spawn_payload);
            }
        }

        Ok(())
    }

    /// Moves the entity to a new owner. `local_player` is the room's local
    /// player as of now. Dirty cells stay dirty.
    pub fn change_owner(&mut self, owner: Player, local_player: Option<&Player>) {
        self.is_mine = local_player == Some(&owner);
        self.owner = Some(owner);

        if let (Some(id), Some(owner)) = (self.id, &self.owner) {
            let context = EntityContext {
                id,
                entity_type: self.entity_type,
                owner,
                is_mine: self.is_mine,
            };
            for behaviour in &mut self.behaviours {
                behaviour.on_owner_changed(&context);
            }
        }
    }

    /// Records the destroy payload and lets the behaviours release what they
    /// hold. A second call changes nothing.
    pub fn detach(&mut self, destroy_payload: &[u8]) -> Outcome {
        if self.detached {
            return Outcome::Ignored(Ignored::AlreadyDetached);
        }

        self.detached = true;
        self.destroy_payload = destroy_payload.to_vec();

        if let (Some(id), Some(owner)) = (self.id, &self.owner) {
            let context = EntityContext {
                id,
                entity_type: self.entity_type,
                owner,
                is_mine: self.is_mine,
            };
            for behaviour in &mut self.behaviours {
                behaviour.on_detached(&context, &self.destroy_payload);
            }
        }

        Outcome::Applied
    }

    pub fn spawn_payload<P: Serde + Default>(&self) -> Result<P, SerdeErr> {
        decode_payload(&self.spawn_payload)
    }

    pub fn destroy_payload<P: Serde + Default>(&self) -> Result<P, SerdeErr> {
        decode_payload(&self.destroy_payload)
    }

    /// Runs the per-update hook of every behaviour: the owned tick on the
    /// local player's entities, the proxy tick on everyone else's.
    pub fn tick(&mut self) {
        if !self.attached || self.detached {
            return;
        }
        let (Some(id), Some(owner)) = (self.id, &self.owner) else {
            return;
        };

        let context = EntityContext {
            id,
            entity_type: self.entity_type,
            owner,
            is_mine: self.is_mine,
        };
        for behaviour in &mut self.behaviours {
            if context.is_mine {
                behaviour.on_entity_tick(&context);
            } else {
                behaviour.on_proxy_tick(&context);
            }
        }
    }

    // Replication

    /// Whether any cell is waiting to be replicated
    pub fn is_dirty(&self) -> bool {
        let mut dirty = false;
        for behaviour in &self.behaviours {
            behaviour.visit_properties(&mut |cell| dirty |= cell.is_dirty());
        }
        dirty
    }

    /// Writes a delta group holding the dirty cells and clears them. Writes
    /// nothing and returns `false` when no cell is dirty.
    pub fn pack_delta(&mut self, writer: &mut MessageWriter) -> Result<bool, EntityError> {
        let id = self.require_id()?;
        if !self.is_dirty() {
            return Ok(false);
        }

        writer.write(&id).write(&self.property_count());
        let bits = writer.bit_writer();
        for behaviour in &mut self.behaviours {
            behaviour.visit_properties_mut(&mut |cell| cell.pack(bits));
        }

        Ok(true)
    }

    /// Writes a delta group with every cell present. Dirty flags are left as
    /// they are, so the next batch still carries pending changes.
    pub fn write_snapshot(&self, writer: &mut MessageWriter) -> Result<(), EntityError> {
        let id = self.require_id()?;

        writer.write(&id).write(&self.property_count());
        let bits = writer.bit_writer();
        for behaviour in &self.behaviours {
            behaviour.visit_properties(&mut |cell| cell.write_full(bits));
        }

        Ok(())
    }

    /// Reads past a delta group whose id the caller already read, checking it
    /// would apply cleanly. No cell changes.
    pub fn check_delta(&self, reader: &mut MessageReader) -> Result<(), EntityError> {
        let entity_id = self.read_cell_count(reader)?;

        let bits = reader.bit_reader();
        let mut failed = false;
        for behaviour in &self.behaviours {
            behaviour.visit_properties(&mut |cell| {
                if !failed && cell.skip(bits).is_err() {
                    failed = true;
                }
            });
        }

        if failed {
            return Err(EntityError::MalformedDelta { entity_id });
        }
        Ok(())
    }

    /// Applies a delta group whose id the caller already read. The group must
    /// carry exactly as many cells as this entity has. The group is checked
    /// whole first, so a malformed one leaves every cell as it was.
    pub fn apply_delta(&mut self, reader: &mut MessageReader) -> Result<(), EntityError> {
        self.check_delta(&mut reader.clone())?;
        let entity_id = self.read_cell_count(reader)?;

        let bits = reader.bit_reader();
        let mut failed = false;
        for behaviour in &mut self.behaviours {
            behaviour.visit_properties_mut(&mut |cell| {
                if !failed && cell.apply(bits).is_err() {
                    failed = true;
                }
            });
        }

        if failed {
            return Err(EntityError::MalformedDelta { entity_id });
        }
        Ok(())
    }

    // Events

    /// Raises an event addressed to this entity.
    ///
    /// The frame is always built; `LocalOnly` hands its payload region to the
    /// behaviours without sending, `LocalAndServer` hands over the same bytes
    /// and then sends the frame. A local run is credited to `local_player`.
    #[allow(clippy::too_many_arguments)]
    pub fn replicate_event<P: Serde>(
        &mut self,
        code: EventCode,
        payload: &P,
        target: EventTarget,
        mode: ExecutionMode,
        local_player: Option<&Player>,
        writer: &mut MessageWriter,
        transport: &mut dyn Transport,
    ) -> Outcome {
        let Some(id) = self.id else {
            warn!(
                "Event {} raised on entity of type {} before it was attached",
                code, self.entity_type
            );
            return Outcome::Rejected(Rejection::NotAttached);
        };

        let sender = local_player.map(Player::peer_id);
        if mode.invokes_locally() && sender.is_none() {
            warn!("Event {} on entity {} needs a local player to run locally", code, id);
            return Outcome::Rejected(Rejection::NoLocalPlayer);
        }

        writer
            .begin(Operation::ReplicateEntityEvent)
            .write(&id)
            .write(&code)
            .write(&mode)
            .write(&target)
            .write_payload(&encode_payload(payload));

        if let Some(sender) = sender.filter(|_| mode.invokes_locally()) {
            let bytes = writer.payload();
            for behaviour in &mut self.behaviours {
                behaviour.on_event(sender, code, bytes);
            }
        }

        if mode.sends_to_server() {
            transport.send(writer.bytes());
        }

        Outcome::Applied
    }

    /// Hands an incoming event to every behaviour, in order.
    pub fn process_event(&mut self, sender: PeerId, code: EventCode, payload: &[u8]) {
        for behaviour in &mut self.behaviours {
            behaviour.on_event(sender, code, payload);
        }
    }

    fn read_cell_count(&self, reader: &mut MessageReader) -> Result<EntityId, EntityError> {
        let entity_id = self.require_id()?;

        let found = reader
            .read::<u16>()
            .map_err(|_| EntityError::MalformedDelta { entity_id })?;
        let expected = self.property_count();
        if found != expected {
            return Err(EntityError::PropertyCountMismatch {
                entity_id,
                expected,
                found,
            });
        }
        Ok(entity_id)
    }

    fn require_id(&self) -> Result<EntityId, EntityError> {
        self.id.ok_or(EntityError::NotAttached {
            entity_type: self.entity_type,
        })
    }
}

impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entity")
            .field("id", &self.id)
            .field("entity_type", &self.entity_type)
            .field("static_id", &self.static_id)
            .field("owner", &self.owner)
            .field("authority", &self.authority)
            .field("attached", &self.attached)
            .field("detached", &self.detached)
            .field("is_mine", &self.is_mine)
            .field("behaviours", &self.behaviours.len())
            .finish()
    }
}

/// Declares an entity: its type, its behaviours in order, its authority.
pub struct EntityBuilder {
    entity_type: EntityType,
    authority: EntityAuthority,
    auto_replication: bool,
    behaviours: Vec<Box<dyn Behaviour>>,
}

impl EntityBuilder {
    fn new(entity_type: EntityType) -> Self {
        Self {
            entity_type,
            authority: EntityAuthority::default(),
            auto_replication: true,
            behaviours: Vec::new(),
        }
    }

    /// Appends a behaviour. Its cells follow the cells of every behaviour
    /// added before it.
    pub fn with_behaviour<B: Behaviour>(mut self, behaviour: B) -> Self {
        self.behaviours.push(Box::new(behaviour));
        self
    }

    pub fn with_authority(mut self, authority: EntityAuthority) -> Self {
        self.authority = authority;
        self
    }

    pub fn with_auto_replication(mut self, auto_replication: bool) -> Self {
        self.auto_replication = auto_replication;
        self
    }

    pub fn build(self) -> Entity {
        Entity {
            id: None,
            entity_type: self.entity_type,
            static_id: None,
            owner: None,
            authority: self.authority,
            attached: false,
            detached: false,
            is_mine: false,
            auto_replication: self.auto_replication,
            behaviours: self.behaviours,
            layout: None,
            spawn_payload: Vec::new(),
            destroy_payload: Vec::new(),
        }
    }
}
