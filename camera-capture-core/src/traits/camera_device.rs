use std::sync::Arc;

use crate::models::camera_models::{CameraDescriptor, ZoomRange};
use crate::models::captured_image::PhotoData;
use crate::models::error::CaptureError;
use crate::preview::PreviewFrame;

/// Callback invoked for every preview frame a device delivers.
///
/// Fires on the device's frame-delivery thread — keep processing minimal.
pub type FrameCallback = Arc<dyn Fn(PreviewFrame) + Send + Sync + 'static>;

/// One-shot completion for a photo capture request.
pub type PhotoCallback = Box<dyn FnOnce(Result<PhotoData, CaptureError>) + Send + 'static>;

/// An open camera device bound to a session.
///
/// Implementations own the platform handle. All methods are called from the
/// session side; frame and photo callbacks fire on device threads.
///
/// Implemented by:
/// - `SimulatedCamera` (in-memory, for development and tests)
/// - `DesktopCamera` (webcams via nokhwa, in camera-capture-desktop)
pub trait CameraDevice: Send {
    /// Descriptor for the physical camera backing this device.
    fn descriptor(&self) -> CameraDescriptor;

    /// Begin streaming preview frames to `sink`.
    fn start_frames(&mut self, sink: FrameCallback) -> Result<(), CaptureError>;

    /// Stop streaming. Frame delivery has fully halted when this returns;
    /// the sink is not invoked again afterwards.
    fn stop_frames(&mut self) -> Result<(), CaptureError>;

    /// Whether the device has a controllable torch.
    fn has_torch(&self) -> bool;

    /// Switch the torch on or off.
    ///
    /// Devices without a torch return `TorchUnsupported` and leave all
    /// state unchanged.
    fn set_torch(&mut self, on: bool) -> Result<(), CaptureError>;

    /// Zoom limits supported by the device.
    fn zoom_range(&self) -> ZoomRange;

    /// Apply a zoom factor. Callers clamp to `zoom_range()` first;
    /// implementations may reject factors outside it.
    fn set_zoom(&mut self, factor: f32) -> Result<(), CaptureError>;

    /// Arm the photo pipeline for a single capture.
    ///
    /// `on_complete` is invoked exactly once with the encoded photo or the
    /// pipeline error. Completion is asynchronous: the callback must not be
    /// invoked before `capture_photo` returns.
    fn capture_photo(&mut self, on_complete: PhotoCallback) -> Result<(), CaptureError>;
}
