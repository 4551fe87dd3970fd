//! In-memory display for exercising [`DisplayCapture`](crate::DisplayCapture)
//! without an X server.
//!
//! [`MockConnector`] hands out [`MockDisplay`] sessions that serve a solid
//! frame and record every pointer event into a shared [`MockLog`].

use crate::error::Result;
use crate::session::DisplayConnector;
use std::sync::{Arc, Mutex, MutexGuard};
use xredirect_capture::{FrameSource, RawFrame, ScreenDimensions};
use xredirect_input::{MouseButton, PointerInjector};

/// Pointer events as seen by the mock session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerEvent {
    Move(i32, i32),
    Down(MouseButton),
    Up(MouseButton),
    Flush,
}

/// What the mock sessions have been asked to do
#[derive(Debug, Default)]
pub struct MockLog {
    pub connects: usize,
    pub grabs: usize,
    pub closes: usize,
    pub pointer: Vec<PointerEvent>,
}

#[derive(Clone)]
pub struct MockConnector {
    dims: ScreenDimensions,
    bgra: [u8; 4],
    row_padding: usize,
    bits_per_pixel: u8,
    reachable: bool,
    fail_grabs: bool,
    log: Arc<Mutex<MockLog>>,
}

impl MockConnector {
    /// A reachable display filled with one BGRA color.
    pub fn solid(width: u32, height: u32, bgra: [u8; 4]) -> Self {
        Self {
            dims: ScreenDimensions::new(width, height),
            bgra,
            row_padding: 0,
            bits_per_pixel: 32,
            reachable: true,
            fail_grabs: false,
            log: Arc::new(Mutex::new(MockLog::default())),
        }
    }

    /// A display that refuses every connection.
    pub fn unreachable() -> Self {
        Self {
            reachable: false,
            ..Self::solid(0, 0, [0; 4])
        }
    }

    /// Pad every scan line with this many extra bytes.
    pub fn with_row_padding(mut self, bytes: usize) -> Self {
        self.row_padding = bytes;
        self
    }

    /// Report this depth in grabbed frames.
    pub fn with_bits_per_pixel(mut self, bits_per_pixel: u8) -> Self {
        self.bits_per_pixel = bits_per_pixel;
        self
    }

    /// Connect fine, then answer every grab as if the server sent no image.
    pub fn with_grab_failure(mut self) -> Self {
        self.fail_grabs = true;
        self
    }

    pub fn log(&self) -> MutexGuard<'_, MockLog> {
        lock(&self.log)
    }
}

impl DisplayConnector for MockConnector {
    type Session = MockDisplay;

    fn connect(&self, display_id: &str) -> Result<MockDisplay> {
        lock(&self.log).connects += 1;
        if !self.reachable {
            return Err(xredirect_capture::Error::Connection(format!(
                "{}: mock display unreachable",
                display_id
            ))
            .into());
        }
        Ok(MockDisplay {
            dims: self.dims,
            bgra: self.bgra,
            row_padding: self.row_padding,
            bits_per_pixel: self.bits_per_pixel,
            fail_grabs: self.fail_grabs,
            log: Arc::clone(&self.log),
        })
    }
}

pub struct MockDisplay {
    dims: ScreenDimensions,
    bgra: [u8; 4],
    row_padding: usize,
    bits_per_pixel: u8,
    fail_grabs: bool,
    log: Arc<Mutex<MockLog>>,
}

impl FrameSource for MockDisplay {
    fn dimensions(&self) -> ScreenDimensions {
        self.dims
    }

    fn grab_frame(&mut self) -> xredirect_capture::Result<RawFrame> {
        lock(&self.log).grabs += 1;
        if self.fail_grabs {
            return Err(xredirect_capture::Error::CaptureFailed(
                "mock server returned no image".into(),
            ));
        }

        let row_bytes = self.dims.width as usize * 4;
        let stride = row_bytes + self.row_padding;
        // padding is filled with 0xEE so leaks are easy to spot
        let mut data = vec![0xEE; stride * self.dims.height as usize];
        if stride > 0 {
            for row in data.chunks_exact_mut(stride) {
                for px in row[..row_bytes].chunks_exact_mut(4) {
                    px.copy_from_slice(&self.bgra);
                }
            }
        }

        Ok(RawFrame {
            data,
            width: self.dims.width,
            height: self.dims.height,
            stride,
            bits_per_pixel: self.bits_per_pixel,
            depth: 24,
        })
    }
}

impl PointerInjector for MockDisplay {
    fn move_to(&mut self, x: i32, y: i32) -> xredirect_input::Result<()> {
        lock(&self.log).pointer.push(PointerEvent::Move(x, y));
        Ok(())
    }

    fn button_down(&mut self, button: MouseButton) -> xredirect_input::Result<()> {
        lock(&self.log).pointer.push(PointerEvent::Down(button));
        Ok(())
    }

    fn button_up(&mut self, button: MouseButton) -> xredirect_input::Result<()> {
        lock(&self.log).pointer.push(PointerEvent::Up(button));
        Ok(())
    }

    fn flush(&mut self) -> xredirect_input::Result<()> {
        lock(&self.log).pointer.push(PointerEvent::Flush);
        Ok(())
    }
}

impl Drop for MockDisplay {
    fn drop(&mut self) {
        lock(&self.log).closes += 1;
    }
}

fn lock(log: &Mutex<MockLog>) -> MutexGuard<'_, MockLog> {
    // a panicking test may poison the lock; the counts are still meaningful
    log.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
