use tether_serde::{BitReader, BitWrite, Serde, SerdeErr};

/// Wire shape of a single property: fixed width in bits, or variable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PropertyLayout {
    pub is_fixed: bool,
    pub bit_length: u16,
}

impl PropertyLayout {
    pub fn of<T: Serde>() -> Self {
        match T::CONST_BIT_LENGTH {
            Some(bits) => Self::fixed(u16::try_from(bits).unwrap_or(u16::MAX)),
            None => Self::variable(),
        }
    }

    pub fn fixed(bit_length: u16) -> Self {
        Self {
            is_fixed: true,
            bit_length,
        }
    }

    pub fn variable() -> Self {
        Self {
            is_fixed: false,
            bit_length: 0,
        }
    }
}

impl Serde for PropertyLayout {
    const CONST_BIT_LENGTH: Option<u32> = Some(17);

    fn ser(&self, writer: &mut dyn BitWrite) {
        self.is_fixed.ser(writer);
        self.bit_length.ser(writer);
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        Ok(Self {
            is_fixed: bool::de(reader)?,
            bit_length: u16::de(reader)?,
        })
    }

    fn bit_length(&self) -> u32 {
        17
    }
}

/// The ordered property shapes of one entity. This order is the order cells
/// travel in, so two peers only agree on a delta if their layouts match.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct EntityLayout {
    properties: Vec<PropertyLayout>,
}

const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

impl EntityLayout {
    pub fn new(properties: Vec<PropertyLayout>) -> Self {
        Self { properties }
    }

    pub fn push(&mut self, property: PropertyLayout) {
        self.properties.push(property);
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PropertyLayout> {
        self.properties.iter()
    }

    /// 64-bit FNV-1a over the count and every property's shape. Builds that
    /// declare their fields in a different order hash differently.
    pub fn schema_hash(&self) -> u64 {
        let mut hash = FNV_OFFSET_BASIS;
        let mut feed = |byte: u8| {
            hash ^= u64::from(byte);
            hash = hash.wrapping_mul(FNV_PRIME);
        };

        for byte in (self.properties.len() as u32).to_le_bytes() {
            feed(byte);
        }
        for property in &self.properties {
            feed(u8::from(property.is_fixed));
            for byte in property.bit_length.to_le_bytes() {
                feed(byte);
            }
        }
        hash
    }
}

impl Serde for EntityLayout {
    fn ser(&self, writer: &mut dyn BitWrite) {
        let count = u16::try_from(self.properties.len()).unwrap_or(u16::MAX);
        count.ser(writer);
        for property in self.properties.iter().take(usize::from(count)) {
            property.ser(writer);
        }
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        let count = usize::from(u16::de(reader)?);
        let mut properties = Vec::with_capacity(count.min(256));
        for _ in 0..count {
            properties.push(PropertyLayout::de(reader)?);
        }
        Ok(Self { properties })
    }

    fn bit_length(&self) -> u32 {
        16 + 17 * self.properties.len() as u32
    }
}
