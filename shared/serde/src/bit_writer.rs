use crate::SerdeErr;

pub trait BitWrite {
    fn write_bit(&mut self, bit: bool);
    fn write_byte(&mut self, byte: u8);

    fn write_bytes(&mut self, bytes: &[u8]) {
        for byte in bytes {
            self.write_byte(*byte);
        }
    }
}

/// A growable bit stream. Bits are packed LSB first within each byte, so a
/// byte written on a byte boundary lands in the buffer unchanged.
///
/// The writer is meant to be reused: `clear()` keeps the allocation around
/// for the next frame.
pub struct BitWriter {
    scratch: u8,
    scratch_index: u8,
    buffer: Vec<u8>,
    bits_written: u32,
}

impl Default for BitWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl BitWriter {
    pub fn new() -> Self {
        Self::with_capacity(512)
    }

    pub fn with_capacity(bytes: usize) -> Self {
        Self {
            scratch: 0,
            scratch_index: 0,
            buffer: Vec::with_capacity(bytes),
            bits_written: 0,
        }
    }

    fn flush_scratch(&mut self) {
        if self.scratch_index > 0 {
            let byte = (self.scratch << (8 - self.scratch_index)).reverse_bits();
            self.buffer.push(byte);
            self.bits_written += u32::from(8 - self.scratch_index);
            self.scratch = 0;
            self.scratch_index = 0;
        }
    }

    /// Pads the current byte with zero bits so the next write starts on a
    /// byte boundary.
    pub fn align(&mut self) {
        self.flush_scratch();
    }

    pub fn is_aligned(&self) -> bool {
        self.scratch_index == 0
    }

    /// Aligns, then appends `count` zeroed bytes to be filled in later with
    /// `patch_bytes`. Returns the byte offset of the reserved region.
    pub fn reserve_bytes(&mut self, count: usize) -> usize {
        self.align();
        let offset = self.buffer.len();
        self.buffer.resize(offset + count, 0);
        self.bits_written += (count * 8) as u32;
        offset
    }

    /// Overwrites a region previously handed out by `reserve_bytes`.
    pub fn patch_bytes(&mut self, offset: usize, bytes: &[u8]) -> Result<(), SerdeErr> {
        let end = offset.checked_add(bytes.len()).ok_or(SerdeErr)?;
        let target = self.buffer.get_mut(offset..end).ok_or(SerdeErr)?;
        target.copy_from_slice(bytes);
        Ok(())
    }

    /// Length of the stream in bytes, counting a partially filled last byte.
    pub fn byte_len(&self) -> usize {
        self.buffer.len() + usize::from(self.scratch_index > 0)
    }

    pub fn bits_written(&self) -> u32 {
        self.bits_written
    }

    /// Finishes the current byte and returns a view of everything written.
    pub fn bytes(&mut self) -> &[u8] {
        self.flush_scratch();
        &self.buffer
    }

    pub fn to_bytes(mut self) -> Vec<u8> {
        self.flush_scratch();
        self.buffer
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
        self.scratch = 0;
        self.scratch_index = 0;
        self.bits_written = 0;
    }
}

impl BitWrite for BitWriter {
    fn write_bit(&mut self, bit: bool) {
        self.scratch <<= 1;

        if bit {
            self.scratch |= 1;
        }

        self.scratch_index += 1;
        self.bits_written += 1;

        if self.scratch_index >= 8 {
            self.buffer.push(self.scratch.reverse_bits());
            self.scratch_index = 0;
            self.scratch = 0;
        }
    }

    fn write_byte(&mut self, byte: u8) {
        if self.scratch_index == 0 {
            self.buffer.push(byte);
            self.bits_written += 8;
            return;
        }

        let mut temp = byte;
        for _ in 0..8 {
            self.write_bit(temp & 1 != 0);
            temp >>= 1;
        }
    }

    fn write_bytes(&mut self, bytes: &[u8]) {
        if self.scratch_index == 0 {
            self.buffer.extend_from_slice(bytes);
            self.bits_written += (bytes.len() * 8) as u32;
            return;
        }

        for byte in bytes {
            self.write_byte(*byte);
        }
    }
}
