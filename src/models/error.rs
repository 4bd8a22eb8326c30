use thiserror::Error;

/// Failures of registry operations
/// All of them leave the registry unchanged
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// Bad or duplicate input
    #[error("{0}")]
    Validation(String),

    #[error("No room available matching these requirements")]
    NoRoomAvailable,

    #[error("Room {0} does not exist")]
    NotFound(String),

    #[error("Room {0} is not currently allocated")]
    NotAllocated(String),
}

pub type RegistryResult<T> = std::result::Result<T, RegistryError>;
