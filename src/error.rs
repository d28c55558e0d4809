//! Error types for circloO level handling

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LevelError {
    #[error("A connection needs exactly two objects, got {0}")]
    InvalidConnection(usize),

    #[error("Too many positions: {supplied} supplied but the object has {allowed}")]
    TooManyPositions { supplied: usize, allowed: usize },

    #[error("Position count was never initialized for this object")]
    UninitializedPositionCount,

    #[error("Object {object} has a connection to an object that is not in the level ({endpoint})")]
    BrokenConnection { object: String, endpoint: String },

    #[error("Unsupported member type: {0}")]
    UnsupportedMemberType(String),

    #[error("Connection references object {0}, which does not appear earlier in the level")]
    UnresolvedReference(usize),

    #[error("Index {index} out of range for level of {len} objects")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Invalid attribute at index {index}: {reason}")]
    InvalidAttribute { index: usize, reason: String },

    #[error("An object group needs at least one member")]
    EmptyGroup,

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for LevelError {
    fn from(err: serde_json::Error) -> Self {
        LevelError::SerializationError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, LevelError>;
