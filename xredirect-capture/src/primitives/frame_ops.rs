use crate::capture::RawFrame;
use crate::error::{Error, Result};
use crate::primitives::screen::ScreenDimensions;
use image::{Rgb, RgbImage};

/// Dense row-major image with three channels in blue, green, red order.
///
/// Rows carry no padding: the buffer is exactly `width * height * 3` bytes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelImage {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl PixelImage {
    pub const CHANNELS: usize = 3;

    /// Wrap an existing BGR buffer. Returns `None` if the length doesn't match.
    pub fn from_raw(width: u32, height: u32, data: Vec<u8>) -> Option<Self> {
        if data.len() != width as usize * height as usize * Self::CHANNELS {
            return None;
        }
        Some(Self {
            width,
            height,
            data,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> ScreenDimensions {
        ScreenDimensions::new(self.width, self.height)
    }

    /// BGR triple at `(x, y)`, or `None` outside the image.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y as usize * self.width as usize + x as usize) * Self::CHANNELS;
        Some([self.data[idx], self.data[idx + 1], self.data[idx + 2]])
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }

    /// Copy into an RGB image for encoders and viewers that expect red first.
    pub fn to_rgb_image(&self) -> RgbImage {
        let width = self.width as usize;
        RgbImage::from_fn(self.width, self.height, |x, y| {
            let idx = (y as usize * width + x as usize) * Self::CHANNELS;
            Rgb([self.data[idx + 2], self.data[idx + 1], self.data[idx]])
        })
    }
}

/// Copy `height` rows of `width` pixels out of a strided buffer into a packed one.
///
/// Bytes past `width * bytes_per_pixel` in each source row are skipped.
pub fn copy_rows(
    raw: &[u8],
    width: u32,
    height: u32,
    stride: usize,
    bytes_per_pixel: usize,
) -> Result<Vec<u8>> {
    let row_bytes = (width as usize).checked_mul(bytes_per_pixel).ok_or_else(|| {
        Error::InvalidLayout(format!(
            "{} pixels of {} bytes overflow a row",
            width, bytes_per_pixel
        ))
    })?;
    if row_bytes == 0 || height == 0 {
        return Ok(Vec::new());
    }

    if stride < row_bytes {
        return Err(Error::InvalidLayout(format!(
            "stride {} smaller than row bytes {}",
            stride, row_bytes
        )));
    }

    let rows = height as usize;
    let needed = stride
        .checked_mul(rows - 1)
        .and_then(|n| n.checked_add(row_bytes))
        .ok_or_else(|| {
            Error::InvalidLayout(format!("{} rows at stride {} overflow", rows, stride))
        })?;
    if raw.len() < needed {
        return Err(Error::InvalidLayout(format!(
            "buffer holds {} bytes, {} rows at stride {} need {}",
            raw.len(),
            rows,
            stride,
            needed
        )));
    }

    if stride == row_bytes {
        return Ok(raw[..needed].to_vec());
    }

    let mut out = vec![0u8; row_bytes * rows];
    for (row, dst) in out.chunks_exact_mut(row_bytes).enumerate() {
        let src_start = row * stride;
        dst.copy_from_slice(&raw[src_start..src_start + row_bytes]);
    }

    Ok(out)
}

/// Convert a 32bpp server frame into a packed BGR image.
///
/// The server delivers pixels as B, G, R, A bytes. Alpha is dropped; the
/// remaining channels keep their order. Any other depth is rejected.
pub fn convert_frame(frame: &RawFrame) -> Result<PixelImage> {
    if frame.bits_per_pixel != 32 {
        return Err(Error::UnsupportedFormat {
            bits_per_pixel: frame.bits_per_pixel,
        });
    }

    let bgra = copy_rows(&frame.data, frame.width, frame.height, frame.stride, 4)?;

    let mut bgr = Vec::with_capacity(bgra.len() / 4 * PixelImage::CHANNELS);
    for px in bgra.chunks_exact(4) {
        bgr.extend_from_slice(&px[..3]);
    }

    Ok(PixelImage {
        width: frame.width,
        height: frame.height,
        data: bgr,
    })
}
