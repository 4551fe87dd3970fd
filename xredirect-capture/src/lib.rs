//! xredirect-capture: X11 root window capture primitives
//!
//! This crate provides the capture half of xredirect:
//! - An owned X11 session with the screen geometry resolved at connect time
//! - Full-screen `ZPixmap` grabs of the root window
//! - Stride-aware conversion of 32bpp BGRA frames into dense BGR images
//! - Image persistence through the `image` crate

pub mod capture;
pub mod error;
pub mod primitives;

// Re-export common types at crate root
pub use capture::{FrameSource, RawFrame, X11Display};
pub use error::{Error, Result};
pub use primitives::{
    capture_image, convert_frame, copy_rows, encode_png, save_image, PixelImage,
    ScreenDimensions,
};
