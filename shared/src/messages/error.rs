use thiserror::Error;

use crate::messages::operation::Operation;

/// Errors raised while framing or unframing a message.
///
/// All of them are fatal for the frame they were raised on and for nothing
/// else: the frame is dropped, the session goes on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    /// A frame with no bytes at all, so not even an operation code
    #[error("Received an empty frame with no operation code")]
    EmptyFrame,

    /// The leading byte is not a known operation (SECURITY: possibly malicious frame)
    #[error("Unknown operation code {code}. This may indicate a malformed or malicious frame")]
    UnknownOperation {
        code: u8,
    },

    /// A field of the frame could not be decoded, usually because the frame ends early
    #[error("Malformed {operation:?} frame: a field could not be decoded or the frame is truncated")]
    Malformed {
        operation: Operation,
    },

    /// A valid operation that this side of the connection never receives
    #[error("Operation {operation:?} is not expected in this direction")]
    UnexpectedOperation {
        operation: Operation,
    },
}
