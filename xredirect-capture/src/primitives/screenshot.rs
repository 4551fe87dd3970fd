use crate::capture::FrameSource;
use crate::error::{Error, Result};
use crate::primitives::frame_ops::{convert_frame, PixelImage};
use image::{ImageError, ImageFormat};
use std::path::Path;
use std::time::Instant;
use tracing::debug;

/// Grab one frame from `source` and convert it to BGR.
///
/// The raw frame is dropped as soon as conversion finishes.
pub fn capture_image<S: FrameSource + ?Sized>(source: &mut S) -> Result<PixelImage> {
    let expected = source.dimensions();
    let start = Instant::now();
    let frame = source.grab_frame()?;

    if frame.width != expected.width || frame.height != expected.height {
        return Err(Error::CaptureFailed(format!(
            "frame is {}x{}, screen is {}",
            frame.width, frame.height, expected
        )));
    }

    let img = convert_frame(&frame)?;
    debug!(
        width = img.width(),
        height = img.height(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "captured image"
    );
    Ok(img)
}

/// Write `img` to `path`. The format follows the file extension.
pub fn save_image(img: &PixelImage, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    img.to_rgb_image().save(path).map_err(|e| match e {
        ImageError::IoError(io) => Error::Io(io),
        other => Error::Encode(format!("{}: {}", path.display(), other)),
    })?;
    debug!(path = %path.display(), "saved image");
    Ok(())
}

/// Encode `img` as PNG in memory.
pub fn encode_png(img: &PixelImage) -> Result<Vec<u8>> {
    let mut png_bytes = Vec::new();
    img.to_rgb_image()
        .write_to(&mut std::io::Cursor::new(&mut png_bytes), ImageFormat::Png)
        .map_err(|e| Error::Encode(format!("PNG encoding failed: {}", e)))?;
    Ok(png_bytes)
}
