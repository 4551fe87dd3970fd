pub mod x11;

use crate::primitives::screen::ScreenDimensions;
use crate::Result;

pub use x11::X11Display;

/// One unconverted grab as delivered by the display server.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawFrame {
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
    /// Bytes per scan line, including any trailing pad
    pub stride: usize,
    pub bits_per_pixel: u8,
    pub depth: u8,
}

/// Something that can hand out full-screen frames.
pub trait FrameSource {
    /// Geometry resolved when the source was opened. Never re-queried.
    fn dimensions(&self) -> ScreenDimensions;

    fn grab_frame(&mut self) -> Result<RawFrame>;
}
