//! Error types and Result alias for xredirect.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("display {0} is not open")]
    NotConnected(String),

    #[error(transparent)]
    Capture(#[from] xredirect_capture::Error),

    #[error(transparent)]
    Input(#[from] xredirect_input::Error),

    #[error("config error: {0}")]
    Config(String),
}

/// Coarse classification callers can branch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The session could not be opened, was never opened, or has dropped
    Connection,
    /// The server did not hand back a frame
    Capture,
    /// The frame uses a pixel layout conversion doesn't handle
    Format,
    Other,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        use xredirect_capture::Error as CaptureError;

        match self {
            Error::NotConnected(_) => ErrorKind::Connection,
            Error::Capture(CaptureError::Connection(_)) => ErrorKind::Connection,
            Error::Capture(CaptureError::CaptureFailed(_)) => ErrorKind::Capture,
            Error::Capture(CaptureError::UnsupportedFormat { .. })
            | Error::Capture(CaptureError::InvalidLayout(_)) => ErrorKind::Format,
            Error::Capture(CaptureError::Encode(_)) | Error::Capture(CaptureError::Io(_)) => {
                ErrorKind::Other
            }
            // every input failure means the session can't deliver events
            Error::Input(_) => ErrorKind::Connection,
            Error::Config(_) => ErrorKind::Other,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_follow_source() {
        assert_eq!(
            Error::NotConnected(":0".into()).kind(),
            ErrorKind::Connection
        );
        assert_eq!(
            Error::from(xredirect_capture::Error::CaptureFailed("x".into())).kind(),
            ErrorKind::Capture
        );
        assert_eq!(
            Error::from(xredirect_capture::Error::UnsupportedFormat { bits_per_pixel: 16 })
                .kind(),
            ErrorKind::Format
        );
        assert_eq!(
            Error::from(xredirect_input::Error::Connection("gone".into())).kind(),
            ErrorKind::Connection
        );
        assert_eq!(Error::Config("bad".into()).kind(), ErrorKind::Other);
    }

    #[test]
    fn messages_are_readable() {
        let err = Error::from(xredirect_capture::Error::UnsupportedFormat { bits_per_pixel: 24 });
        assert_eq!(err.to_string(), "unsupported bits_per_pixel: 24");
        assert_eq!(
            Error::NotConnected(":1".into()).to_string(),
            "display :1 is not open"
        );
    }
}
