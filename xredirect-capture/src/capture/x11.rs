use crate::capture::{FrameSource, RawFrame};
use crate::error::{Error, Result};
use crate::primitives::screen::ScreenDimensions;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};
use x11rb::connection::Connection;
use x11rb::protocol::xproto::{ConnectionExt as _, Format, ImageFormat, Window};
use x11rb::rust_connection::RustConnection;

/// An open session with an X server, bound to its default screen.
///
/// Width and height are read from the connection setup once and cached for the
/// lifetime of the session, so a resolution change after connecting is not
/// observed. The socket is closed when the last clone of the connection is
/// dropped.
pub struct X11Display {
    conn: Arc<RustConnection>,
    name: String,
    root: Window,
    dims: ScreenDimensions,
    pixmap_formats: Vec<Format>,
}

impl X11Display {
    /// Open a session against `display_name` (e.g. `":0"`).
    pub fn connect(display_name: &str) -> Result<Self> {
        let (conn, screen_num) = x11rb::connect(Some(display_name))
            .map_err(|e| Error::Connection(format!("{}: {}", display_name, e)))?;

        let setup = conn.setup();
        let screen = setup.roots.get(screen_num).ok_or_else(|| {
            Error::Connection(format!("{}: no screen {}", display_name, screen_num))
        })?;
        let root = screen.root;
        let dims = ScreenDimensions::new(
            screen.width_in_pixels as u32,
            screen.height_in_pixels as u32,
        );
        let pixmap_formats = setup.pixmap_formats.clone();

        info!(
            display = display_name,
            screen = screen_num,
            width = dims.width,
            height = dims.height,
            "connected to X server"
        );

        Ok(Self {
            conn: Arc::new(conn),
            name: display_name.to_string(),
            root,
            dims,
            pixmap_formats,
        })
    }

    pub fn root(&self) -> Window {
        self.root
    }

    /// Shared handle for other capabilities (pointer injection) on the same session.
    pub fn connection(&self) -> Arc<RustConnection> {
        Arc::clone(&self.conn)
    }

    /// Grab the whole root window at the cached geometry.
    pub fn grab(&self) -> Result<RawFrame> {
        let start = Instant::now();
        let width = u16::try_from(self.dims.width)
            .map_err(|_| Error::CaptureFailed(format!("width {} too large", self.dims.width)))?;
        let height = u16::try_from(self.dims.height)
            .map_err(|_| Error::CaptureFailed(format!("height {} too large", self.dims.height)))?;

        let reply = self
            .conn
            .get_image(ImageFormat::Z_PIXMAP, self.root, 0, 0, width, height, !0)
            .map_err(|e| Error::CaptureFailed(format!("get_image failed: {}", e)))?
            .reply()
            .map_err(|e| Error::CaptureFailed(format!("get_image reply failed: {}", e)))?;

        let (bits_per_pixel, stride) =
            layout_for_depth(&self.pixmap_formats, reply.depth, self.dims.width)?;

        let needed = stride
            .checked_mul(self.dims.height as usize)
            .ok_or_else(|| Error::InvalidLayout(format!("stride {} overflows", stride)))?;
        if reply.data.len() < needed {
            return Err(Error::CaptureFailed(format!(
                "short image: got {} bytes, expected {}",
                reply.data.len(),
                needed
            )));
        }

        debug!(
            depth = reply.depth,
            bits_per_pixel,
            stride,
            bytes = reply.data.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "grabbed root window"
        );

        Ok(RawFrame {
            data: reply.data,
            width: self.dims.width,
            height: self.dims.height,
            stride,
            bits_per_pixel,
            depth: reply.depth,
        })
    }
}

impl FrameSource for X11Display {
    fn dimensions(&self) -> ScreenDimensions {
        self.dims
    }

    fn grab_frame(&mut self) -> Result<RawFrame> {
        X11Display::grab(self)
    }
}

impl Drop for X11Display {
    fn drop(&mut self) {
        debug!(display = %self.name, "closing X11 session");
    }
}

/// Resolve bits-per-pixel and scan line stride for an image of `depth` and `width`.
///
/// ZPixmap rows are padded to the server's `scanline_pad` for that depth.
pub fn layout_for_depth(formats: &[Format], depth: u8, width: u32) -> Result<(u8, usize)> {
    let format = formats
        .iter()
        .find(|f| f.depth == depth)
        .ok_or_else(|| Error::CaptureFailed(format!("no pixmap format for depth {}", depth)))?;

    let pad = (format.scanline_pad as usize).max(8);
    let row_bits = width as usize * format.bits_per_pixel as usize;
    let stride = row_bits.div_ceil(pad) * pad / 8;
    Ok((format.bits_per_pixel, stride))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn formats() -> Vec<Format> {
        vec![
            Format {
                depth: 1,
                bits_per_pixel: 1,
                scanline_pad: 32,
            },
            Format {
                depth: 16,
                bits_per_pixel: 16,
                scanline_pad: 32,
            },
            Format {
                depth: 24,
                bits_per_pixel: 32,
                scanline_pad: 32,
            },
        ]
    }

    #[test]
    fn depth_24_maps_to_32bpp() {
        let (bpp, stride) = layout_for_depth(&formats(), 24, 1920).expect("layout");
        assert_eq!(bpp, 32);
        assert_eq!(stride, 1920 * 4);
    }

    #[test]
    fn odd_width_16bpp_is_padded() {
        let (bpp, stride) = layout_for_depth(&formats(), 16, 3).expect("layout");
        assert_eq!(bpp, 16);
        // 48 bits rounded up to 64
        assert_eq!(stride, 8);
    }

    #[test]
    fn one_bit_rows_round_to_pad() {
        let (_, stride) = layout_for_depth(&formats(), 1, 33).expect("layout");
        assert_eq!(stride, 8);
    }

    #[test]
    fn unknown_depth_is_capture_error() {
        let err = layout_for_depth(&formats(), 30, 10).unwrap_err();
        assert!(matches!(err, Error::CaptureFailed(_)));
    }

    #[test]
    fn connect_to_bogus_display_fails() {
        let err = X11Display::connect("not-a-display").err().expect("should fail");
        assert!(matches!(err, Error::Connection(_)), "got {err:?}");
    }
}
