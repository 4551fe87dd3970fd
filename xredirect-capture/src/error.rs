//! Error types for xredirect-capture.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("cannot connect to X server {0}")]
    Connection(String),

    #[error("capture failed: {0}")]
    CaptureFailed(String),

    #[error("unsupported bits_per_pixel: {bits_per_pixel}")]
    UnsupportedFormat { bits_per_pixel: u8 },

    #[error("invalid frame layout: {0}")]
    InvalidLayout(String),

    #[error("image encoding failed: {0}")]
    Encode(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
