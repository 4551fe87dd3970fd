use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("X server connection lost: {0}")]
    Connection(String),

    #[error("X server does not support the {0} extension")]
    ExtensionUnavailable(&'static str),

    #[error("failed to emit input event: {0}")]
    EmitFailed(String),
}

pub type Result<T> = std::result::Result<T, Error>;
