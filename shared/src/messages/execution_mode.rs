use tether_serde::{BitReader, BitWrite, Serde, SerdeErr};

use crate::types::PeerId;

/// Where an event runs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ExecutionMode {
    /// Invoke the local listener only, send nothing
    LocalOnly,
    /// Send to the server only
    #[default]
    ServerOnly,
    /// Invoke locally with the exact payload bytes of the outgoing frame, then send
    LocalAndServer,
}

impl ExecutionMode {
    pub fn invokes_locally(&self) -> bool {
        matches!(self, ExecutionMode::LocalOnly | ExecutionMode::LocalAndServer)
    }

    pub fn sends_to_server(&self) -> bool {
        matches!(self, ExecutionMode::ServerOnly | ExecutionMode::LocalAndServer)
    }
}

impl Serde for ExecutionMode {
    const CONST_BIT_LENGTH: Option<u32> = Some(8);

    fn ser(&self, writer: &mut dyn BitWrite) {
        let index: u8 = match self {
            ExecutionMode::LocalOnly => 0,
            ExecutionMode::ServerOnly => 1,
            ExecutionMode::LocalAndServer => 2,
        };
        index.ser(writer);
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        match u8::de(reader)? {
            0 => Ok(ExecutionMode::LocalOnly),
            1 => Ok(ExecutionMode::ServerOnly),
            2 => Ok(ExecutionMode::LocalAndServer),
            _ => Err(SerdeErr),
        }
    }

    fn bit_length(&self) -> u32 {
        8
    }
}

/// Which peers the server relays an entity event to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum EventTarget {
    /// The entity's owner only
    Owner,
    ExceptOwner,
    #[default]
    All,
    Player(PeerId),
}

impl Serde for EventTarget {
    fn ser(&self, writer: &mut dyn BitWrite) {
        match self {
            EventTarget::Owner => 0u8.ser(writer),
            EventTarget::ExceptOwner => 1u8.ser(writer),
            EventTarget::All => 2u8.ser(writer),
            EventTarget::Player(peer_id) => {
                3u8.ser(writer);
                peer_id.ser(writer);
            }
        }
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        match u8::de(reader)? {
            0 => Ok(EventTarget::Owner),
            1 => Ok(EventTarget::ExceptOwner),
            2 => Ok(EventTarget::All),
            3 => Ok(EventTarget::Player(PeerId::de(reader)?)),
            _ => Err(SerdeErr),
        }
    }

    fn bit_length(&self) -> u32 {
        match self {
            EventTarget::Player(_) => 8 + 32,
            _ => 8,
        }
    }
}
