use std::fmt;

use tether_serde::{BitReader, BitWrite, Serde, SerdeErr};

pub type EntityType = u16;
pub type StaticId = u16;
pub type PeerId = u32;
pub type EventCode = u16;

/// Network identity of an attached entity. Assigned by the server and stable
/// for the lifetime of the entity in the room.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(u16);

impl EntityId {
    pub fn new(value: u16) -> Self {
        Self(value)
    }

    pub fn value(&self) -> u16 {
        self.0
    }
}

impl From<u16> for EntityId {
    fn from(value: u16) -> Self {
        Self(value)
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl Serde for EntityId {
    const CONST_BIT_LENGTH: Option<u32> = u16::CONST_BIT_LENGTH;

    fn ser(&self, writer: &mut dyn BitWrite) {
        self.0.ser(writer);
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        Ok(Self(u16::de(reader)?))
    }

    fn bit_length(&self) -> u32 {
        self.0.bit_length()
    }
}
