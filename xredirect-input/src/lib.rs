//! Synthetic pointer input for X11.
//!
//! [`PointerInjector`] is the capability; [`XTestPointer`] implements it on top
//! of the XTEST extension so the server treats the events as coming from the
//! core pointer.

pub mod error;
pub mod mouse;

use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, warn};
use x11rb::connection::Connection;
use x11rb::errors::{ConnectionError, ReplyError};
use x11rb::protocol::xproto::{
    Window, BUTTON_PRESS_EVENT, BUTTON_RELEASE_EVENT, MOTION_NOTIFY_EVENT,
};
use x11rb::protocol::xtest::{self, ConnectionExt as _};
use x11rb::CURRENT_TIME;

pub use error::{Error, Result};
pub use mouse::MouseButton;

/// Something that can move the pointer and press its buttons.
pub trait PointerInjector {
    /// Warp the pointer to absolute screen coordinates
    fn move_to(&mut self, x: i32, y: i32) -> Result<()>;

    fn button_down(&mut self, button: MouseButton) -> Result<()>;

    fn button_up(&mut self, button: MouseButton) -> Result<()>;

    /// Push any buffered events out to the server
    fn flush(&mut self) -> Result<()>;

    /// Move, press, release, flush.
    ///
    /// Coordinates are not checked against the screen; the server decides what
    /// an off-screen position means.
    fn click_at(&mut self, x: i32, y: i32, button: MouseButton) -> Result<()> {
        self.move_to(x, y)?;
        self.button_down(button)?;
        self.button_up(button)?;
        self.flush()
    }
}

/// Clamp a screen coordinate to the signed 16-bit range the protocol carries.
pub fn clamp_coord(value: i32) -> i16 {
    let clamped = value.clamp(i16::MIN as i32, i16::MAX as i32) as i16;
    if clamped as i32 != value {
        warn!(value, clamped, "coordinate outside protocol range, saturating");
    }
    clamped
}

/// XTEST-backed pointer bound to one root window.
///
/// Every fake event is checked with a round trip, so an X error raised by the
/// server for that event comes back as [`Error::EmitFailed`] from the call
/// that sent it.
pub struct XTestPointer<C: Connection> {
    conn: Arc<C>,
    root: Window,
    extension_checked: bool,
    held_buttons: HashSet<MouseButton>,
}

impl<C: Connection> XTestPointer<C> {
    /// Bind to `root` on `conn`. No requests are sent until the first event.
    pub fn new(conn: Arc<C>, root: Window) -> Self {
        Self {
            conn,
            root,
            extension_checked: false,
            held_buttons: HashSet::new(),
        }
    }

    /// Check if a mouse button is currently held down
    pub fn is_button_held(&self, button: MouseButton) -> bool {
        self.held_buttons.contains(&button)
    }

    /// Release every button this pointer pressed and hasn't released yet
    pub fn release_all(&mut self) -> Result<()> {
        let buttons: Vec<MouseButton> = self.held_buttons.iter().copied().collect();
        for button in buttons {
            self.button_up(button)?;
        }
        self.flush()
    }

    fn ensure_extension(&mut self) -> Result<()> {
        if self.extension_checked {
            return Ok(());
        }
        let info = self
            .conn
            .extension_information(xtest::X11_EXTENSION_NAME)
            .map_err(map_connection_error)?;
        if info.is_none() {
            return Err(Error::ExtensionUnavailable(xtest::X11_EXTENSION_NAME));
        }
        self.extension_checked = true;
        Ok(())
    }

    fn fake_input(&mut self, event_type: u8, detail: u8, x: i16, y: i16) -> Result<()> {
        self.ensure_extension()?;
        self.conn
            .xtest_fake_input(event_type, detail, CURRENT_TIME, self.root, x, y, 0)
            .map_err(map_connection_error)?
            .check()
            .map_err(map_reply_error)
    }
}

impl<C: Connection> PointerInjector for XTestPointer<C> {
    fn move_to(&mut self, x: i32, y: i32) -> Result<()> {
        let (x, y) = (clamp_coord(x), clamp_coord(y));
        debug!(x, y, "fake motion");
        // detail 0 = absolute position
        self.fake_input(MOTION_NOTIFY_EVENT, 0, x, y)
    }

    fn button_down(&mut self, button: MouseButton) -> Result<()> {
        debug!(%button, "fake button press");
        self.fake_input(BUTTON_PRESS_EVENT, button.to_detail(), 0, 0)?;
        self.held_buttons.insert(button);
        Ok(())
    }

    fn button_up(&mut self, button: MouseButton) -> Result<()> {
        debug!(%button, "fake button release");
        self.fake_input(BUTTON_RELEASE_EVENT, button.to_detail(), 0, 0)?;
        self.held_buttons.remove(&button);
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.conn.flush().map_err(map_connection_error)
    }
}

impl<C: Connection> Drop for XTestPointer<C> {
    fn drop(&mut self) {
        if !self.held_buttons.is_empty() {
            // Drop can't return Result
            let _ = self.release_all();
        }
    }
}

fn map_connection_error(err: ConnectionError) -> Error {
    match err {
        ConnectionError::IoError(e) => Error::Connection(e.to_string()),
        ConnectionError::UnsupportedExtension => {
            Error::ExtensionUnavailable(xtest::X11_EXTENSION_NAME)
        }
        other => Error::EmitFailed(other.to_string()),
    }
}

fn map_reply_error(err: ReplyError) -> Error {
    match err {
        ReplyError::ConnectionError(e) => map_connection_error(e),
        ReplyError::X11Error(e) => Error::EmitFailed(format!("{:?}", e.error_kind)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_passes_through_in_range() {
        assert_eq!(clamp_coord(1839), 1839);
        assert_eq!(clamp_coord(-5), -5);
    }

    #[test]
    fn clamp_saturates() {
        assert_eq!(clamp_coord(100_000), i16::MAX);
        assert_eq!(clamp_coord(-100_000), i16::MIN);
    }

    #[test]
    fn io_error_maps_to_connection() {
        let err = map_connection_error(ConnectionError::IoError(std::io::Error::new(
            std::io::ErrorKind::BrokenPipe,
            "gone",
        )));
        assert!(matches!(err, Error::Connection(_)));
    }

    #[test]
    fn missing_extension_maps_to_unavailable() {
        let err = map_connection_error(ConnectionError::UnsupportedExtension);
        assert!(matches!(err, Error::ExtensionUnavailable("XTEST")));
    }

    #[test]
    fn reply_connection_errors_keep_their_class() {
        let err = map_reply_error(ReplyError::ConnectionError(ConnectionError::IoError(
            std::io::Error::new(std::io::ErrorKind::ConnectionReset, "reset"),
        )));
        assert!(matches!(err, Error::Connection(_)));

        let err = map_reply_error(ReplyError::ConnectionError(
            ConnectionError::UnsupportedExtension,
        ));
        assert!(matches!(err, Error::ExtensionUnavailable("XTEST")));

        let err = map_reply_error(ReplyError::ConnectionError(
            ConnectionError::MaximumRequestLengthExceeded,
        ));
        assert!(matches!(err, Error::EmitFailed(_)));
    }
}
