//! Frame acquisition and decoding seams.
//!
//! Cameras and decoder libraries live behind these traits so the scan
//! loop, and everything above it, stays device-free.

use thiserror::Error;

// =============================================================================
// Frame
// =============================================================================

/// One raster frame pulled from a capture device.
///
/// The byte layout is an agreement between the source and the decoder;
/// the scan loop never looks inside.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Raw pixel data.
    pub data: Vec<u8>,
}

impl Frame {
    /// Creates a frame from raw pixel data.
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> Self {
        Frame {
            width,
            height,
            data,
        }
    }
}

// =============================================================================
// Errors
// =============================================================================

/// Frame acquisition failure.
#[derive(Debug, Error)]
pub enum FrameError {
    /// The capture device rejected or aborted the read.
    #[error("Capture device error: {0}")]
    Device(String),

    /// The device disappeared mid-session (unplugged, revoked permission).
    #[error("Capture device disconnected")]
    Disconnected,
}

// =============================================================================
// Seams
// =============================================================================

/// Pull-based, blocking frame supplier.
///
/// The device sets the cadence: `next_frame` blocks until a frame is
/// ready. `Ok(None)` means the stream ended normally (e.g. a file-backed
/// source ran out), which the scan loop treats like cancellation.
pub trait FrameSource: Send {
    /// Blocks until the next frame is available.
    fn next_frame(&mut self) -> Result<Option<Frame>, FrameError>;
}

/// Decodes barcodes out of a single frame.
///
/// Returns every payload found, best detection first; the scan loop
/// feeds only the first one to the stabilizer. An empty vec is a miss.
pub trait BarcodeDecoder: Send {
    fn decode(&self, frame: &Frame) -> Vec<String>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_carries_dimensions_and_data() {
        let frame = Frame::new(640, 480, vec![0u8; 16]);
        assert_eq!(frame.width, 640);
        assert_eq!(frame.height, 480);
        assert_eq!(frame.data.len(), 16);
    }
}
