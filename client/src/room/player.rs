use std::hash::{Hash, Hasher};

use tether_shared::PeerId;

/// A member of the joined room.
///
/// Two players are the same player when their peer and stable ids match.
/// The owner and local flags describe the player's role at the time the
/// value was read and take no part in equality.
#[derive(Clone, Debug)]
pub struct Player {
    peer_id: PeerId,
    id: String,
    name: String,
    is_owner: bool,
    is_local: bool,
}

impl Player {
    pub fn new(peer_id: PeerId, id: &str, name: &str, is_owner: bool, is_local: bool) -> Self {
        Self {
            peer_id,
            id: id.to_string(),
            name: name.to_string(),
            is_owner,
            is_local,
        }
    }

    pub fn peer_id(&self) -> PeerId {
        self.peer_id
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_owner(&self) -> bool {
        self.is_owner
    }

    pub fn is_local(&self) -> bool {
        self.is_local
    }

    pub(crate) fn set_owner(&mut self, is_owner: bool) {
        self.is_owner = is_owner;
    }
}

impl PartialEq for Player {
    fn eq(&self, other: &Self) -> bool {
        self.peer_id == other.peer_id && self.id == other.id
    }
}

impl Eq for Player {}

impl Hash for Player {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.peer_id.hash(state);
        self.id.hash(state);
    }
}
