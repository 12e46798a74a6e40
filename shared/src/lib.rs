//! # Tether Shared
//! Protocol vocabulary shared by the tether client and the test harness:
//! operation codes, frame reading and writing, ids, authority, execution
//! modes and dirty-tracked property cells.

#![deny(trivial_numeric_casts, unstable_features, unused_import_braces)]

pub use tether_serde::{BitReader, BitWrite, BitWriter, Serde, SerdeErr};

mod messages;
mod outcome;
mod types;
mod world;

pub use messages::{
    constants::{FRAME_BUFFER_CAPACITY, PAYLOAD_BUFFER_CAPACITY},
    error::ProtocolError,
    execution_mode::{EventTarget, ExecutionMode},
    message_reader::MessageReader,
    message_writer::{MessageWriter, ReservedSlot},
    operation::Operation,
    payload::{decode_payload, encode_payload},
};
pub use outcome::{Ignored, Outcome, Rejection};
pub use types::{EntityId, EntityType, EventCode, PeerId, StaticId};
pub use world::{
    authority::{Authority, EntityAuthority},
    layout::{EntityLayout, PropertyLayout},
    property::{Property, PropertyCell},
};
