/// Test client wrapper
/// Owns a `Client` wired to a local transport and a recording listener

use std::ops::{Deref, DerefMut};

use tether_client::{Client, ClientConfig, EntityAuthority, EntityId, EntityType, PeerId};

use crate::{
    helpers::{
        recording_listener::RecordingListener,
        test_scene::TestScene,
        test_server::{ClientRequest, TestServer},
    },
    local_transport::{LocalTransport, ServerInbox},
    test_protocol::prefabs,
};

pub const ROOM_ID: &str = "room";
pub const ALICE: (PeerId, &str) = (1, "A");
pub const BOB: (PeerId, &str) = (2, "B");

pub struct TestClient {
    pub client: Client<LocalTransport, RecordingListener>,
    pub inbox: ServerInbox,
    pub server: TestServer,
}

impl TestClient {
    pub fn new() -> Self {
        Self::with_config(ClientConfig::default())
    }

    pub fn with_config(config: ClientConfig) -> Self {
        let (transport, inbox) = LocalTransport::new();
        Self {
            client: Client::new(config, transport, RecordingListener::new(), prefabs()),
            inbox,
            server: TestServer::new(),
        }
    }

    pub fn with_scene(scene: TestScene) -> Self {
        let (transport, inbox) = LocalTransport::new();
        let client = Client::new(
            ClientConfig::default(),
            transport,
            RecordingListener::new(),
            prefabs(),
        )
        .with_scene_host(scene);
        Self {
            client,
            inbox,
            server: TestServer::new(),
        }
    }

    /// A client in room "room", owned by A, with A (peer 1) and B (peer 2)
    /// joined. `local_id` picks which of them this client is.
    pub fn joined(local_id: &str) -> Self {
        let mut test_client = Self::new();
        test_client.join(local_id);
        test_client
    }

    pub fn join(&mut self, local_id: &str) {
        let join = self.server.join_success(ROOM_ID, ALICE.1, local_id, 1, 4);
        self.receive(&join);
        for (peer_id, player_id) in [ALICE, BOB] {
            let joined = self.server.player_joined(peer_id, player_id, player_id);
            self.receive(&joined);
        }
        self.client.listener_mut().clear();
    }

    /// Feeds a frame that must decode
    pub fn receive(&mut self, frame: &[u8]) {
        self.client.receive(frame).unwrap();
    }

    /// The server announces an entity of `entity_type` created by `creator`
    pub fn spawn(&mut self, entity_type: EntityType, entity_id: u16, creator: PeerId) -> EntityId {
        let create = self.server.create_entity(
            entity_type,
            EntityAuthority::default(),
            entity_id,
            creator,
            &(),
        );
        self.receive(&create);
        EntityId::new(entity_id)
    }

    /// Every frame sent since the last call, decoded
    pub fn sent(&self) -> Vec<ClientRequest> {
        self.inbox
            .drain()
            .iter()
            .map(|frame| TestServer::decode(frame))
            .collect()
    }

    /// Every frame sent since the last call, raw
    pub fn sent_frames(&self) -> Vec<Vec<u8>> {
        self.inbox.drain()
    }
}

impl Default for TestClient {
    fn default() -> Self {
        Self::new()
    }
}

impl Deref for TestClient {
    type Target = Client<LocalTransport, RecordingListener>;

    fn deref(&self) -> &Self::Target {
        &self.client
    }
}

impl DerefMut for TestClient {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.client
    }
}
