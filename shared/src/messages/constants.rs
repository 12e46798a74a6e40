// Frame buffer sizing

/// Initial capacity of a reusable frame buffer, in bytes. Buffers grow past
/// this when a batch needs it and keep the larger allocation afterwards.
pub const FRAME_BUFFER_CAPACITY: usize = 8192;

/// Capacity of the scratch buffer typed payloads are encoded into.
pub const PAYLOAD_BUFFER_CAPACITY: usize = 256;
