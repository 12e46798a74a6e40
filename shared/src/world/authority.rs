use tether_serde::{BitReader, BitWrite, Serde, SerdeErr};

/// Who holds a capability on an entity.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Authority {
    #[default]
    OwnerOnly,
    All,
}

impl Serde for Authority {
    const CONST_BIT_LENGTH: Option<u32> = Some(8);

    fn ser(&self, writer: &mut dyn BitWrite) {
        let index: u8 = match self {
            Authority::OwnerOnly => 0,
            Authority::All => 1,
        };
        index.ser(writer);
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        match u8::de(reader)? {
            0 => Ok(Authority::OwnerOnly),
            1 => Ok(Authority::All),
            _ => Err(SerdeErr),
        }
    }

    fn bit_length(&self) -> u32 {
        8
    }
}

/// The two independent capabilities of an entity. Stored for the caller to
/// consult; the server is the one enforcing them.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct EntityAuthority {
    /// Who may change replicated state
    pub state: Authority,
    /// Who may trigger entity events
    pub events: Authority,
}

impl EntityAuthority {
    pub fn new(state: Authority, events: Authority) -> Self {
        Self { state, events }
    }

    pub fn permits_state(&self, is_owner: bool) -> bool {
        is_owner || self.state == Authority::All
    }

    pub fn permits_events(&self, is_owner: bool) -> bool {
        is_owner || self.events == Authority::All
    }
}

impl Serde for EntityAuthority {
    const CONST_BIT_LENGTH: Option<u32> = Some(16);

    fn ser(&self, writer: &mut dyn BitWrite) {
        self.state.ser(writer);
        self.events.ser(writer);
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        Ok(Self {
            state: Authority::de(reader)?,
            events: Authority::de(reader)?,
        })
    }

    fn bit_length(&self) -> u32 {
        16
    }
}
