//! Low-level primitives for turning server frames into images.
//!
//! This module contains the screen geometry type, the stride-aware BGRA to BGR
//! conversion, and helpers for persisting the result.

pub mod frame_ops;
pub mod screen;
pub mod screenshot;

pub use frame_ops::{convert_frame, copy_rows, PixelImage};
pub use screen::ScreenDimensions;
pub use screenshot::{capture_image, encode_png, save_image};
