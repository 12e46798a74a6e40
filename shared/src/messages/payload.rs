use tether_serde::{BitReader, BitWriter, Serde, SerdeErr};

use crate::messages::constants::PAYLOAD_BUFFER_CAPACITY;

/// Encodes an application payload (spawn data, destroy data, event body)
/// into the opaque byte span that travels at the end of a frame.
pub fn encode_payload<P: Serde>(payload: &P) -> Vec<u8> {
    let mut writer = BitWriter::with_capacity(PAYLOAD_BUFFER_CAPACITY);
    payload.ser(&mut writer);
    writer.to_bytes()
}

/// Decodes a payload span. An empty span decodes to the default value, so
/// entities created without spawn data can still be asked for it.
pub fn decode_payload<P: Serde + Default>(bytes: &[u8]) -> Result<P, SerdeErr> {
    if bytes.is_empty() {
        return Ok(P::default());
    }
    let mut reader = BitReader::new(bytes);
    P::de(&mut reader)
}
