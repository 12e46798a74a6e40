use crate::types::{EntityId, PeerId, StaticId};

/// Result of a session operation that can legitimately do nothing.
///
/// Rejections are local failures such as a missing room or missing authority;
/// nothing was sent. Ignored outcomes are races with the server (an id that is already
/// gone, or not yet known) and only worth a debug line.
#[must_use]
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    Applied,
    Ignored(Ignored),
    Rejected(Rejection),
}

impl Outcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, Outcome::Applied)
    }

    pub fn is_ignored(&self) -> bool {
        matches!(self, Outcome::Ignored(_))
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self, Outcome::Rejected(_))
    }
}

impl From<Ignored> for Outcome {
    fn from(reason: Ignored) -> Self {
        Outcome::Ignored(reason)
    }
}

impl From<Rejection> for Outcome {
    fn from(reason: Rejection) -> Self {
        Outcome::Rejected(reason)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Rejection {
    /// The client has not joined a room
    NotInRoom,
    /// Only the room owner may do this
    NotRoomOwner,
    /// The local player has not joined the room yet
    NoLocalPlayer,
    /// The entity has no network identity yet
    NotAttached,
    /// A player with this peer or stable id is already in the room
    DuplicatePlayer { peer_id: PeerId, player_id: String },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Ignored {
    AlreadyDetached,
    UnknownEntity { entity_id: EntityId },
    UnknownStaticEntity { static_id: StaticId },
    UnknownPlayer { player_id: String },
}
