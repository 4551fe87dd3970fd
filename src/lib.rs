//! `xredirect` grabs the root window of an X11 display and drives its pointer.
//!
//! The pieces live in separate crates and are composed here:
//! - [`xredirect_capture`]: the X11 session, raw grabs, and BGRA to BGR conversion
//! - [`xredirect_input`]: synthetic pointer events through XTEST
//!
//! [`DisplayCapture`] ties one session to both. It starts out unopened, becomes
//! open after a successful [`DisplayCapture::open`], and closes its session when
//! dropped.
//!
//! ```no_run
//! use xredirect::DisplayCapture;
//!
//! let mut display = DisplayCapture::connect(":0")?;
//! let frame = display.capture()?;
//! xredirect::save_image(&frame, "Debug.jpg")?;
//! display.click(1839, 60)?;
//! # Ok::<(), xredirect::Error>(())
//! ```

pub mod config;
mod error;
pub mod mock;
pub mod session;

pub use config::{CaptureSettings, ClickSettings, Config, DisplaySettings};
pub use error::{Error, ErrorKind, Result};
pub use session::{DisplayConnector, X11Connector, X11Session};

pub use xredirect_capture::{
    convert_frame, encode_png, save_image, FrameSource, PixelImage, RawFrame, ScreenDimensions,
};
pub use xredirect_input::{MouseButton, PointerInjector};

use tracing::{debug, info};

/// Whether a [`DisplayCapture`] currently holds a live session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Unopened,
    Open,
}

/// Capture and click against one display.
pub struct DisplayCapture<K: DisplayConnector = X11Connector> {
    connector: K,
    display_id: String,
    session: Option<K::Session>,
}

impl DisplayCapture<X11Connector> {
    /// Create an unopened instance for an X11 display such as `":0"`.
    pub fn new(display_id: impl Into<String>) -> Self {
        Self::with_connector(X11Connector, display_id)
    }

    /// Create and open in one step.
    pub fn connect(display_id: impl Into<String>) -> Result<Self> {
        let mut capture = Self::new(display_id);
        capture.open()?;
        Ok(capture)
    }
}

impl<K: DisplayConnector> DisplayCapture<K> {
    pub fn with_connector(connector: K, display_id: impl Into<String>) -> Self {
        Self {
            connector,
            display_id: display_id.into(),
            session: None,
        }
    }

    pub fn display_id(&self) -> &str {
        &self.display_id
    }

    pub fn state(&self) -> SessionState {
        if self.session.is_some() {
            SessionState::Open
        } else {
            SessionState::Unopened
        }
    }

    pub fn is_open(&self) -> bool {
        self.session.is_some()
    }

    /// Open the session. A no-op when already open.
    ///
    /// On failure the instance stays unopened and every later capture or click
    /// fails without touching the server.
    pub fn open(&mut self) -> Result<()> {
        if self.session.is_some() {
            return Ok(());
        }
        let session = self.connector.connect(&self.display_id)?;
        info!(
            display = %self.display_id,
            dimensions = %session.dimensions(),
            "display session open"
        );
        self.session = Some(session);
        Ok(())
    }

    /// Screen size cached when the session opened
    pub fn dimensions(&self) -> Result<ScreenDimensions> {
        self.session
            .as_ref()
            .map(FrameSource::dimensions)
            .ok_or_else(|| Error::NotConnected(self.display_id.clone()))
    }

    /// Grab the root window without converting it.
    pub fn capture_raw(&mut self) -> Result<RawFrame> {
        let session = self.session_mut()?;
        Ok(session.grab_frame()?)
    }

    /// Grab the root window and convert it to a BGR image.
    pub fn capture(&mut self) -> Result<PixelImage> {
        let session = self.session_mut()?;
        Ok(xredirect_capture::capture_image(session)?)
    }

    /// Left-click at absolute screen coordinates.
    pub fn click(&mut self, x: i32, y: i32) -> Result<()> {
        self.click_button(x, y, MouseButton::Left)
    }

    pub fn click_button(&mut self, x: i32, y: i32, button: MouseButton) -> Result<()> {
        let session = self.session_mut()?;
        session.click_at(x, y, button)?;
        debug!(x, y, %button, "clicked");
        Ok(())
    }

    /// Close the session now instead of at end of scope.
    pub fn close(mut self) {
        self.release();
    }

    fn session_mut(&mut self) -> Result<&mut K::Session> {
        match self.session.as_mut() {
            Some(session) => Ok(session),
            None => Err(Error::NotConnected(self.display_id.clone())),
        }
    }

    fn release(&mut self) {
        if let Some(session) = self.session.take() {
            debug!(display = %self.display_id, "closing display session");
            drop(session);
        }
    }
}

impl<K: DisplayConnector> Drop for DisplayCapture<K> {
    fn drop(&mut self) {
        self.release();
    }
}
