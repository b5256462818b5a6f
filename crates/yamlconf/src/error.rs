use crate::parser::{DecodeError, EncodeError};

/// Errors surfaced to callers of [crate::YamlConf]
///
/// Unresolved placeholders are not errors, they stay in the output as literal text.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("{origin} is not a valid document")]
    InvalidDocument {
        origin: String,
        #[source]
        source: DecodeError,
    },
    #[error("function `{0}` is not registered")]
    UnregisteredFunction(String),
    #[error("operation `{0}` does not exist")]
    UnknownOperation(String),
    #[error("Unable to encode document")]
    Encode(#[from] EncodeError),
    #[error("IO error")]
    IoError(#[from] std::io::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
