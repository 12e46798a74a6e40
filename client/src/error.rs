use thiserror::Error;

use tether_shared::ProtocolError;

use crate::world::error::{EntityError, RegistryError};

/// Why an incoming frame was dropped, or an outgoing request could not be
/// built. None of these end the session.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ClientError {
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Entity(#[from] EntityError),
}
