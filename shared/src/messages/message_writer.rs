use tether_serde::{BitWrite, BitWriter, Serde, SerdeErr};

use crate::messages::{constants::FRAME_BUFFER_CAPACITY, operation::Operation};

/// Handle to a region reserved with `MessageWriter::reserve_u16`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReservedSlot {
    offset: usize,
}

/// Builds one frame at a time in a reusable buffer.
///
/// `begin` resets the buffer, so the frame must be handed off (the transport
/// receives a borrowed view) before the next one starts.
pub struct MessageWriter {
    writer: BitWriter,
    operation: Option<Operation>,
    payload_start: Option<usize>,
}

impl Default for MessageWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageWriter {
    pub fn new() -> Self {
        Self {
            writer: BitWriter::with_capacity(FRAME_BUFFER_CAPACITY),
            operation: None,
            payload_start: None,
        }
    }

    /// Clears the buffer and writes the operation code.
    pub fn begin(&mut self, operation: Operation) -> &mut Self {
        self.writer.clear();
        self.payload_start = None;
        self.operation = Some(operation);
        operation.ser(&mut self.writer);
        self
    }

    pub fn operation(&self) -> Option<Operation> {
        self.operation
    }

    pub fn write<T: Serde>(&mut self, value: &T) -> &mut Self {
        value.ser(&mut self.writer);
        self
    }

    /// Raw access for packers that write straight into the stream.
    pub fn bit_writer(&mut self) -> &mut dyn BitWrite {
        &mut self.writer
    }

    /// Reserves two bytes to be filled once their value is known.
    pub fn reserve_u16(&mut self) -> ReservedSlot {
        ReservedSlot {
            offset: self.writer.reserve_bytes(2),
        }
    }

    pub fn patch_u16(&mut self, slot: ReservedSlot, value: u16) -> Result<(), SerdeErr> {
        self.writer.patch_bytes(slot.offset, &value.to_le_bytes())
    }

    /// Appends an opaque trailing span. Its length is whatever is left of the
    /// frame, so nothing may be written after it.
    pub fn write_payload(&mut self, bytes: &[u8]) -> &mut Self {
        self.writer.align();
        self.payload_start = Some(self.writer.byte_len());
        self.writer.write_bytes(bytes);
        self
    }

    /// The finished frame.
    pub fn bytes(&mut self) -> &[u8] {
        self.writer.bytes()
    }

    /// The payload region of the finished frame, empty if none was written.
    pub fn payload(&mut self) -> &[u8] {
        let start = self.payload_start;
        let bytes = self.writer.bytes();
        match start {
            Some(start) => &bytes[start..],
            None => &[],
        }
    }

    pub fn len(&self) -> usize {
        self.writer.byte_len()
    }

    pub fn is_empty(&self) -> bool {
        self.writer.byte_len() == 0
    }
}
