use crate::SerdeErr;

/// Reads a stream produced by `BitWriter`. Every read is bounds-checked;
/// running off the end of the buffer is a `SerdeErr`, never a panic.
#[derive(Clone)]
pub struct BitReader<'b> {
    buffer: &'b [u8],
    position: usize,
}

impl<'b> BitReader<'b> {
    pub fn new(buffer: &'b [u8]) -> Self {
        Self {
            buffer,
            position: 0,
        }
    }

    fn total_bits(&self) -> usize {
        self.buffer.len() * 8
    }

    pub fn bits_remaining(&self) -> usize {
        self.total_bits().saturating_sub(self.position)
    }

    pub fn is_empty(&self) -> bool {
        self.bits_remaining() == 0
    }

    pub fn is_aligned(&self) -> bool {
        self.position % 8 == 0
    }

    pub fn read_bit(&mut self) -> Result<bool, SerdeErr> {
        if self.position >= self.total_bits() {
            return Err(SerdeErr);
        }
        let byte = self.buffer[self.position / 8];
        let bit = (byte >> (self.position % 8)) & 1 != 0;
        self.position += 1;
        Ok(bit)
    }

    pub fn read_byte(&mut self) -> Result<u8, SerdeErr> {
        if self.is_aligned() {
            let byte = *self.buffer.get(self.position / 8).ok_or(SerdeErr)?;
            self.position += 8;
            return Ok(byte);
        }

        if self.bits_remaining() < 8 {
            return Err(SerdeErr);
        }
        let mut output = 0u8;
        for index in 0..8 {
            if self.read_bit()? {
                output |= 1 << index;
            }
        }
        Ok(output)
    }

    pub fn read_bytes(&mut self, count: usize) -> Result<Vec<u8>, SerdeErr> {
        let bits = count.checked_mul(8).ok_or(SerdeErr)?;
        if bits > self.bits_remaining() {
            return Err(SerdeErr);
        }

        if self.is_aligned() {
            let start = self.position / 8;
            self.position += bits;
            return Ok(self.buffer[start..start + count].to_vec());
        }

        let mut output = Vec::with_capacity(count);
        for _ in 0..count {
            output.push(self.read_byte()?);
        }
        Ok(output)
    }

    /// Skips the padding bits up to the next byte boundary.
    pub fn align(&mut self) {
        let remainder = self.position % 8;
        if remainder != 0 {
            self.position = (self.position + 8 - remainder).min(self.total_bits());
        }
    }

    /// Aligns and consumes everything left in the buffer. Used for trailing
    /// payload spans whose length is implied by the end of the frame.
    pub fn remaining_bytes(&mut self) -> &'b [u8] {
        self.align();
        let start = (self.position / 8).min(self.buffer.len());
        self.position = self.total_bits();
        &self.buffer[start..]
    }
}
