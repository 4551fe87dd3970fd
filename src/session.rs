//! Connection providers.
//!
//! A [`DisplayConnector`] opens sessions; a session is anything that can both
//! grab frames and inject pointer events.

use crate::error::Result;
use tracing::debug;
use x11rb::rust_connection::RustConnection;
use xredirect_capture::{FrameSource, RawFrame, ScreenDimensions, X11Display};
use xredirect_input::{MouseButton, PointerInjector, XTestPointer};

pub trait DisplayConnector {
    type Session: FrameSource + PointerInjector;

    fn connect(&self, display_id: &str) -> Result<Self::Session>;
}

/// Opens real X11 sessions.
#[derive(Debug, Clone, Copy, Default)]
pub struct X11Connector;

impl DisplayConnector for X11Connector {
    type Session = X11Session;

    fn connect(&self, display_id: &str) -> Result<X11Session> {
        X11Session::open(display_id)
    }
}

/// One X11 connection shared by the capture and input halves.
pub struct X11Session {
    // declared first so held buttons are released before the socket closes
    pointer: XTestPointer<RustConnection>,
    display: X11Display,
}

impl X11Session {
    pub fn open(display_id: &str) -> Result<Self> {
        let x11 = X11Display::connect(display_id)?;
        let root = x11.root();
        let pointer = XTestPointer::new(x11.connection(), root);
        debug!(display = display_id, root, "session ready");
        Ok(Self {
            pointer,
            display: x11,
        })
    }
}

impl FrameSource for X11Session {
    fn dimensions(&self) -> ScreenDimensions {
        self.display.dimensions()
    }

    fn grab_frame(&mut self) -> xredirect_capture::Result<RawFrame> {
        self.display.grab_frame()
    }
}

impl PointerInjector for X11Session {
    fn move_to(&mut self, x: i32, y: i32) -> xredirect_input::Result<()> {
        self.pointer.move_to(x, y)
    }

    fn button_down(&mut self, button: MouseButton) -> xredirect_input::Result<()> {
        self.pointer.button_down(button)
    }

    fn button_up(&mut self, button: MouseButton) -> xredirect_input::Result<()> {
        self.pointer.button_up(button)
    }

    fn flush(&mut self) -> xredirect_input::Result<()> {
        self.pointer.flush()
    }
}
