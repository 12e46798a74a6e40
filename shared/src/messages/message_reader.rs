use std::convert::TryFrom;

use tether_serde::{BitReader, Serde};

use crate::messages::{error::ProtocolError, operation::Operation};

/// Reads one frame. Any field that cannot be decoded turns into
/// `ProtocolError::Malformed` for the frame's operation.
#[derive(Clone)]
pub struct MessageReader<'b> {
    reader: BitReader<'b>,
    operation: Operation,
}

impl<'b> MessageReader<'b> {
    pub fn new(bytes: &'b [u8]) -> Result<Self, ProtocolError> {
        let Some((code, _)) = bytes.split_first() else {
            return Err(ProtocolError::EmptyFrame);
        };
        let operation = Operation::try_from(*code)?;

        let mut reader = BitReader::new(bytes);
        reader
            .read_byte()
            .map_err(|_| ProtocolError::Malformed { operation })?;

        Ok(Self { reader, operation })
    }

    pub fn operation(&self) -> Operation {
        self.operation
    }

    pub fn read<T: Serde>(&mut self) -> Result<T, ProtocolError> {
        T::de(&mut self.reader).map_err(|_| self.malformed())
    }

    /// Raw access for appliers that read straight from the stream.
    pub fn bit_reader(&mut self) -> &mut BitReader<'b> {
        &mut self.reader
    }

    /// Consumes the trailing payload span.
    pub fn payload(&mut self) -> &'b [u8] {
        self.reader.remaining_bytes()
    }

    pub fn malformed(&self) -> ProtocolError {
        ProtocolError::Malformed {
            operation: self.operation,
        }
    }
}
