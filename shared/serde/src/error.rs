use std::{error::Error, fmt};

/// The stream did not contain what the reader expected: it ended early or
/// held a value that cannot be decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SerdeErr;

impl Error for SerdeErr {}

impl fmt::Display for SerdeErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Malformed or truncated stream")
    }
}
