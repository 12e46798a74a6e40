// The operation code leading every frame. One byte on the wire.
//
// Several operations are used in both directions with a different body
// depending on who sends them; the layouts live next to the code that
// writes and reads each frame.

use std::convert::TryFrom;

use tether_serde::{BitReader, BitWrite, Serde, SerdeErr};

use crate::messages::error::ProtocolError;

#[derive(Copy, Debug, Clone, Eq, PartialEq, Hash)]
pub enum Operation {
    // Server accepted the join, carries the room description
    JoinSuccess,
    // Server refused the join
    JoinFailed,
    // Client leaves the current room
    LeaveRoom,
    PlayerJoined,
    PlayerLeft,
    // Room authority moved to another player
    OwnershipChanged,
    LoadScene,
    SceneIsLoaded,
    CreateEntity,
    // Create for an entity placed in the scene ahead of time
    CreateStaticEntity,
    DestroyEntity,
    // Owner of a single entity changed
    EntityOwnershipChanged,
    ReplicateEvent,
    ReplicateEntityEvent,
    // One entity, every property present
    ReplicateEntityState,
    // Changed count followed by one delta group per changed entity
    ReplicateEntityStateBatch,
}

impl Operation {
    pub fn code(&self) -> u8 {
        match self {
            Operation::JoinSuccess => 1,
            Operation::JoinFailed => 2,
            Operation::LeaveRoom => 3,
            Operation::PlayerJoined => 4,
            Operation::PlayerLeft => 5,
            Operation::OwnershipChanged => 6,
            Operation::LoadScene => 7,
            Operation::SceneIsLoaded => 8,
            Operation::CreateEntity => 9,
            Operation::CreateStaticEntity => 10,
            Operation::DestroyEntity => 11,
            Operation::EntityOwnershipChanged => 12,
            Operation::ReplicateEvent => 13,
            Operation::ReplicateEntityEvent => 14,
            Operation::ReplicateEntityState => 15,
            Operation::ReplicateEntityStateBatch => 16,
        }
    }
}

impl TryFrom<u8> for Operation {
    type Error = ProtocolError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(Operation::JoinSuccess),
            2 => Ok(Operation::JoinFailed),
            3 => Ok(Operation::LeaveRoom),
            4 => Ok(Operation::PlayerJoined),
            5 => Ok(Operation::PlayerLeft),
            6 => Ok(Operation::OwnershipChanged),
            7 => Ok(Operation::LoadScene),
            8 => Ok(Operation::SceneIsLoaded),
            9 => Ok(Operation::CreateEntity),
            10 => Ok(Operation::CreateStaticEntity),
            11 => Ok(Operation::DestroyEntity),
            12 => Ok(Operation::EntityOwnershipChanged),
            13 => Ok(Operation::ReplicateEvent),
            14 => Ok(Operation::ReplicateEntityEvent),
            15 => Ok(Operation::ReplicateEntityState),
            16 => Ok(Operation::ReplicateEntityStateBatch),
            // SECURITY: codes come straight off the wire
            _ => Err(ProtocolError::UnknownOperation { code }),
        }
    }
}

impl Serde for Operation {
    const CONST_BIT_LENGTH: Option<u32> = Some(8);

    fn ser(&self, writer: &mut dyn BitWrite) {
        writer.write_byte(self.code());
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        Operation::try_from(reader.read_byte()?).map_err(|_| SerdeErr)
    }

    fn bit_length(&self) -> u32 {
        8
    }
}
