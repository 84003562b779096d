//! Live preview delivery.
//!
//! `PreviewSurface` is the read-only handle through which the latest camera
//! frame is observable while a session runs. The session publishes frames
//! from the device's delivery thread; consumers read the current frame at
//! their own cadence. Only the most recent frame is retained — the surface
//! is a live view, not a queue.

use std::sync::Arc;
use std::time::Instant;

use parking_lot::Mutex;

use crate::models::camera_models::FrameFormat;

/// A single camera frame as delivered to the preview surface.
#[derive(Debug, Clone)]
pub struct PreviewFrame {
    pub width: u32,
    pub height: u32,
    pub format: FrameFormat,
    /// Pixel data, shared without copying between the surface and readers.
    pub data: Arc<[u8]>,
    /// Monotonic per-device frame counter, starting at 1.
    pub sequence: u64,
    pub captured_at: Instant,
}

/// Shared slot holding the most recent preview frame.
///
/// Cloning the surface yields another handle onto the same slot. The session
/// blanks the surface across device transitions so a stale frame from a
/// previous device is never observable.
#[derive(Clone, Default)]
pub struct PreviewSurface {
    inner: Arc<Mutex<SurfaceInner>>,
}

#[derive(Default)]
struct SurfaceInner {
    frame: Option<PreviewFrame>,
    generation: u64,
}

impl PreviewSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish a frame, replacing whatever was there.
    ///
    /// Frames whose data length does not match their declared dimensions are
    /// dropped rather than handed to renderers.
    pub(crate) fn publish(&self, frame: PreviewFrame) {
        if let Some(bpp) = frame.format.bytes_per_pixel() {
            let expected = frame.width as usize * frame.height as usize * bpp;
            if frame.data.len() != expected {
                log::warn!(
                    "Dropping malformed frame: {} bytes for {}x{} {:?}",
                    frame.data.len(),
                    frame.width,
                    frame.height,
                    frame.format
                );
                return;
            }
        }
        self.inner.lock().frame = Some(frame);
    }

    /// Drop the current frame and bump the surface generation.
    ///
    /// Called on stop, teardown, and across device flips, so readers can tell
    /// frames published before the transition from frames published after it.
    pub(crate) fn clear(&self) {
        let mut inner = self.inner.lock();
        inner.frame = None;
        inner.generation += 1;
    }

    /// The most recent frame, if one has arrived since the last clear.
    pub fn latest(&self) -> Option<PreviewFrame> {
        self.inner.lock().frame.clone()
    }

    /// Number of times the surface has been cleared.
    pub fn generation(&self) -> u64 {
        self.inner.lock().generation
    }

    /// Whether the surface currently holds no frame.
    pub fn is_blank(&self) -> bool {
        self.inner.lock().frame.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::camera_models::FrameFormat;

    fn frame(sequence: u64) -> PreviewFrame {
        PreviewFrame {
            width: 4,
            height: 2,
            format: FrameFormat::Rgba8,
            data: vec![0u8; 4 * 2 * 4].into(),
            sequence,
            captured_at: Instant::now(),
        }
    }

    #[test]
    fn starts_blank() {
        let surface = PreviewSurface::new();
        assert!(surface.is_blank());
        assert!(surface.latest().is_none());
        assert_eq!(surface.generation(), 0);
    }

    #[test]
    fn publish_retains_only_the_newest_frame() {
        let surface = PreviewSurface::new();
        surface.publish(frame(1));
        surface.publish(frame(2));
        surface.publish(frame(3));

        let latest = surface.latest().unwrap();
        assert_eq!(latest.sequence, 3);
    }

    #[test]
    fn malformed_frames_are_not_published() {
        let surface = PreviewSurface::new();
        let mut bad = frame(1);
        bad.data = vec![0u8; 7].into();
        surface.publish(bad);
        assert!(surface.is_blank());

        // Compressed formats carry no dimension contract and pass through.
        let mut jpeg = frame(2);
        jpeg.format = FrameFormat::Mjpeg;
        jpeg.data = vec![0u8; 7].into();
        surface.publish(jpeg);
        assert_eq!(surface.latest().unwrap().sequence, 2);
    }

    #[test]
    fn clear_blanks_and_bumps_generation() {
        let surface = PreviewSurface::new();
        surface.publish(frame(1));
        assert!(!surface.is_blank());

        surface.clear();
        assert!(surface.is_blank());
        assert_eq!(surface.generation(), 1);

        surface.clear();
        assert_eq!(surface.generation(), 2);
    }

    #[test]
    fn clones_share_the_same_slot() {
        let surface = PreviewSurface::new();
        let reader = surface.clone();

        surface.publish(frame(7));
        assert_eq!(reader.latest().unwrap().sequence, 7);

        surface.clear();
        assert!(reader.is_blank());
    }
}
