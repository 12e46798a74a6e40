/// Server-side frame builders for E2E testing
/// Builds the frames a server would send, and turns client requests into the
/// announcements a server would broadcast back

use tether_client::{
    encode_payload, EntityAuthority, EntityId, EntityLayout, EntityType, EventCode, EventTarget,
    ExecutionMode, MessageReader, MessageWriter, Operation, PeerId, Serde, StaticId,
};

/// A client request as the server decodes it
#[derive(Clone, Debug, PartialEq)]
pub enum ClientRequest {
    LeaveRoom,
    LoadScene(String),
    SceneIsLoaded,
    CreateEntity {
        entity_type: EntityType,
        authority: EntityAuthority,
        layout: EntityLayout,
        payload: Vec<u8>,
    },
    CreateStaticEntity {
        entity_type: EntityType,
        authority: EntityAuthority,
        static_id: StaticId,
        layout: EntityLayout,
        payload: Vec<u8>,
    },
    DestroyEntity {
        entity_id: EntityId,
        payload: Vec<u8>,
    },
    Event {
        code: EventCode,
        mode: ExecutionMode,
        payload: Vec<u8>,
    },
    EntityEvent {
        entity_id: EntityId,
        code: EventCode,
        mode: ExecutionMode,
        target: EventTarget,
        payload: Vec<u8>,
    },
    /// State frames travel unchanged in both directions
    State(Vec<u8>),
}

pub struct TestServer {
    writer: MessageWriter,
}

impl Default for TestServer {
    fn default() -> Self {
        Self::new()
    }
}

impl TestServer {
    pub fn new() -> Self {
        Self {
            writer: MessageWriter::new(),
        }
    }

    fn build(&mut self, operation: Operation, body: impl FnOnce(&mut MessageWriter)) -> Vec<u8> {
        self.writer.begin(operation);
        body(&mut self.writer);
        self.writer.bytes().to_vec()
    }

    // Room

    pub fn join_success(
        &mut self,
        room_id: &str,
        owner_id: &str,
        local_id: &str,
        min_players: u16,
        max_players: u16,
    ) -> Vec<u8> {
        self.build(Operation::JoinSuccess, |writer| {
            writer
                .write(&room_id.to_string())
                .write(&owner_id.to_string())
                .write(&local_id.to_string())
                .write(&min_players)
                .write(&max_players);
        })
    }

    pub fn join_failed(&mut self, reason: &str) -> Vec<u8> {
        self.build(Operation::JoinFailed, |writer| {
            writer.write(&reason.to_string());
        })
    }

    pub fn player_joined(&mut self, peer_id: PeerId, player_id: &str, name: &str) -> Vec<u8> {
        self.build(Operation::PlayerJoined, |writer| {
            writer
                .write(&peer_id)
                .write(&player_id.to_string())
                .write(&name.to_string());
        })
    }

    pub fn player_left(&mut self, player_id: &str) -> Vec<u8> {
        self.build(Operation::PlayerLeft, |writer| {
            writer.write(&player_id.to_string());
        })
    }

    pub fn ownership_changed(&mut self, player_id: &str) -> Vec<u8> {
        self.build(Operation::OwnershipChanged, |writer| {
            writer.write(&player_id.to_string());
        })
    }

    pub fn load_scene(&mut self, scene: &str) -> Vec<u8> {
        self.build(Operation::LoadScene, |writer| {
            writer.write(&scene.to_string());
        })
    }

    // Entities

    pub fn create_entity<P: Serde>(
        &mut self,
        entity_type: EntityType,
        authority: EntityAuthority,
        entity_id: u16,
        creator: PeerId,
        spawn_payload: &P,
    ) -> Vec<u8> {
        self.build(Operation::CreateEntity, |writer| {
            writer
                .write(&entity_type)
                .write(&authority)
                .write(&EntityId::new(entity_id))
                .write(&creator)
                .write_payload(&encode_payload(spawn_payload));
        })
    }

    #[allow(clippy::too_many_arguments)]
    pub fn create_static_entity<P: Serde>(
        &mut self,
        entity_type: EntityType,
        authority: EntityAuthority,
        static_id: StaticId,
        entity_id: u16,
        creator: PeerId,
        spawn_payload: &P,
    ) -> Vec<u8> {
        self.build(Operation::CreateStaticEntity, |writer| {
            writer
                .write(&entity_type)
                .write(&authority)
                .write(&static_id)
                .write(&EntityId::new(entity_id))
                .write(&creator)
                .write_payload(&encode_payload(spawn_payload));
        })
    }

    pub fn destroy_entity<P: Serde>(&mut self, entity_id: u16, destroy_payload: &P) -> Vec<u8> {
        self.build(Operation::DestroyEntity, |writer| {
            writer
                .write(&EntityId::new(entity_id))
                .write_payload(&encode_payload(destroy_payload));
        })
    }

    pub fn entity_ownership_changed(&mut self, entity_id: u16, owner: PeerId) -> Vec<u8> {
        self.build(Operation::EntityOwnershipChanged, |writer| {
            writer.write(&EntityId::new(entity_id)).write(&owner);
        })
    }

    // Events

    pub fn event(&mut self, code: EventCode, sender: PeerId, payload: &[u8]) -> Vec<u8> {
        self.build(Operation::ReplicateEvent, |writer| {
            writer.write(&code).write(&sender).write_payload(payload);
        })
    }

    pub fn entity_event(
        &mut self,
        entity_id: u16,
        code: EventCode,
        sender: PeerId,
        payload: &[u8],
    ) -> Vec<u8> {
        self.build(Operation::ReplicateEntityEvent, |writer| {
            writer
                .write(&EntityId::new(entity_id))
                .write(&code)
                .write(&sender)
                .write_payload(payload);
        })
    }

    // Relaying client requests

    /// Decodes a frame sent by a client
    pub fn decode(frame: &[u8]) -> ClientRequest {
        let mut reader = MessageReader::new(frame).unwrap();
        match reader.operation() {
            Operation::LeaveRoom => ClientRequest::LeaveRoom,
            Operation::LoadScene => ClientRequest::LoadScene(reader.read().unwrap()),
            Operation::SceneIsLoaded => ClientRequest::SceneIsLoaded,
            Operation::CreateEntity => ClientRequest::CreateEntity {
                entity_type: reader.read().unwrap(),
                authority: reader.read().unwrap(),
                layout: reader.read().unwrap(),
                payload: reader.payload().to_vec(),
            },
            Operation::CreateStaticEntity => ClientRequest::CreateStaticEntity {
                entity_type: reader.read().unwrap(),
                authority: reader.read().unwrap(),
                static_id: reader.read().unwrap(),
                layout: reader.read().unwrap(),
                payload: reader.payload().to_vec(),
            },
            Operation::DestroyEntity => ClientRequest::DestroyEntity {
                entity_id: reader.read().unwrap(),
                payload: reader.payload().to_vec(),
            },
            Operation::ReplicateEvent => ClientRequest::Event {
                code: reader.read().unwrap(),
                mode: reader.read().unwrap(),
                payload: reader.payload().to_vec(),
            },
            Operation::ReplicateEntityEvent => ClientRequest::EntityEvent {
                entity_id: reader.read().unwrap(),
                code: reader.read().unwrap(),
                mode: reader.read().unwrap(),
                target: reader.read().unwrap(),
                payload: reader.payload().to_vec(),
            },
            Operation::ReplicateEntityState | Operation::ReplicateEntityStateBatch => {
                ClientRequest::State(frame.to_vec())
            }
            operation => panic!("{:?} is never sent by a client", operation),
        }
    }

    /// Turns a create request into the announcement every client receives
    pub fn accept_create(&mut self, request: &ClientRequest, entity_id: u16, creator: PeerId) -> Vec<u8> {
        match request {
            ClientRequest::CreateEntity {
                entity_type,
                authority,
                payload,
                ..
            } => self.build(Operation::CreateEntity, |writer| {
                writer
                    .write(entity_type)
                    .write(authority)
                    .write(&EntityId::new(entity_id))
                    .write(&creator)
                    .write_payload(payload);
            }),
            ClientRequest::CreateStaticEntity {
                entity_type,
                authority,
                static_id,
                payload,
                ..
            } => self.build(Operation::CreateStaticEntity, |writer| {
                writer
                    .write(entity_type)
                    .write(authority)
                    .write(static_id)
                    .write(&EntityId::new(entity_id))
                    .write(&creator)
                    .write_payload(payload);
            }),
            other => panic!("{:?} is not a create request", other),
        }
    }

    /// Forwards an entity event request to the other room members
    pub fn relay_entity_event(&mut self, request: &ClientRequest, sender: PeerId) -> Vec<u8> {
        match request {
            ClientRequest::EntityEvent {
                entity_id,
                code,
                payload,
                ..
            } => self.entity_event(entity_id.value(), *code, sender, payload),
            other => panic!("{:?} is not an entity event", other),
        }
    }
}
