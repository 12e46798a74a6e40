use crate::{BitReader, BitWrite, SerdeErr};

/// A value that can be written to and read from a bit stream.
pub trait Serde: Sized + Clone + PartialEq {
    /// Width in bits when every value of the type encodes to the same size,
    /// `None` for variable-length encodings.
    const CONST_BIT_LENGTH: Option<u32> = None;

    fn ser(&self, writer: &mut dyn BitWrite);

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr>;

    fn bit_length(&self) -> u32;
}

// Unit

impl Serde for () {
    const CONST_BIT_LENGTH: Option<u32> = Some(0);

    fn ser(&self, _: &mut dyn BitWrite) {}

    fn de(_: &mut BitReader) -> Result<Self, SerdeErr> {
        Ok(())
    }

    fn bit_length(&self) -> u32 {
        0
    }
}

// Boolean

impl Serde for bool {
    const CONST_BIT_LENGTH: Option<u32> = Some(1);

    fn ser(&self, writer: &mut dyn BitWrite) {
        writer.write_bit(*self);
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        reader.read_bit()
    }

    fn bit_length(&self) -> u32 {
        1
    }
}

// Numbers, little-endian

macro_rules! impl_serde_for_number {
    ($($ty:ty),*) => {
        $(
            impl Serde for $ty {
                const CONST_BIT_LENGTH: Option<u32> = Some(<$ty>::BITS);

                fn ser(&self, writer: &mut dyn BitWrite) {
                    writer.write_bytes(&self.to_le_bytes());
                }

                fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
                    let mut bytes = [0u8; std::mem::size_of::<$ty>()];
                    for byte in bytes.iter_mut() {
                        *byte = reader.read_byte()?;
                    }
                    Ok(<$ty>::from_le_bytes(bytes))
                }

                fn bit_length(&self) -> u32 {
                    <$ty>::BITS
                }
            }
        )*
    };
}

impl_serde_for_number!(u8, u16, u32, u64, i8, i16, i32, i64);

macro_rules! impl_serde_for_float {
    ($($ty:ty => $bits:ty),*) => {
        $(
            impl Serde for $ty {
                const CONST_BIT_LENGTH: Option<u32> = Some(<$bits>::BITS);

                fn ser(&self, writer: &mut dyn BitWrite) {
                    self.to_bits().ser(writer);
                }

                fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
                    Ok(<$ty>::from_bits(<$bits>::de(reader)?))
                }

                fn bit_length(&self) -> u32 {
                    <$bits>::BITS
                }
            }
        )*
    };
}

impl_serde_for_float!(f32 => u32, f64 => u64);

// Strings, u32 byte length then UTF-8

impl Serde for String {
    fn ser(&self, writer: &mut dyn BitWrite) {
        (self.len() as u32).ser(writer);
        writer.write_bytes(self.as_bytes());
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        let length = u32::de(reader)? as usize;
        let bytes = reader.read_bytes(length)?;
        String::from_utf8(bytes).map_err(|_| SerdeErr)
    }

    fn bit_length(&self) -> u32 {
        32 + (self.len() as u32) * 8
    }
}

impl<T: Serde> Serde for Option<T> {
    fn ser(&self, writer: &mut dyn BitWrite) {
        match self {
            Some(value) => {
                true.ser(writer);
                value.ser(writer);
            }
            None => false.ser(writer),
        }
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        if bool::de(reader)? {
            Ok(Some(T::de(reader)?))
        } else {
            Ok(None)
        }
    }

    fn bit_length(&self) -> u32 {
        1 + self.as_ref().map_or(0, Serde::bit_length)
    }
}

impl<T: Serde> Serde for Vec<T> {
    fn ser(&self, writer: &mut dyn BitWrite) {
        (self.len() as u32).ser(writer);
        for item in self {
            item.ser(writer);
        }
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        let length = u32::de(reader)? as usize;
        // every item takes at least one bit unless it is zero-sized
        if T::CONST_BIT_LENGTH != Some(0) && length > reader.bits_remaining() {
            return Err(SerdeErr);
        }
        let mut output = Vec::with_capacity(length.min(1024));
        for _ in 0..length {
            output.push(T::de(reader)?);
        }
        Ok(output)
    }

    fn bit_length(&self) -> u32 {
        32 + self.iter().map(Serde::bit_length).sum::<u32>()
    }
}

impl<A: Serde, B: Serde> Serde for (A, B) {
    const CONST_BIT_LENGTH: Option<u32> = match (A::CONST_BIT_LENGTH, B::CONST_BIT_LENGTH) {
        (Some(a), Some(b)) => Some(a + b),
        _ => None,
    };

    fn ser(&self, writer: &mut dyn BitWrite) {
        self.0.ser(writer);
        self.1.ser(writer);
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        Ok((A::de(reader)?, B::de(reader)?))
    }

    fn bit_length(&self) -> u32 {
        self.0.bit_length() + self.1.bit_length()
    }
}
