use crate::models::camera_models::{CameraDescriptor, DevicePosition};
use crate::models::config::CaptureConfiguration;
use crate::models::error::CaptureError;
use crate::models::state::PermissionState;

use super::camera_device::CameraDevice;

/// One-shot responder for a platform permission prompt.
///
/// Invoked exactly once with the user's answer.
pub type PermissionResponder = Box<dyn FnOnce(bool) + Send + 'static>;

/// Platform entry point: the permission subsystem plus device enumeration
/// and opening.
///
/// Implemented by:
/// - `SimulatedPlatform` (in-memory, for development and tests)
/// - `DesktopPlatform` (webcams via nokhwa, in camera-capture-desktop)
pub trait CameraPlatform: Send + Sync + 'static {
    type Device: CameraDevice + 'static;

    /// Current camera permission, without prompting.
    fn authorization_status(&self) -> PermissionState;

    /// Show the platform permission prompt.
    ///
    /// `responder` may be invoked synchronously or after an arbitrary delay,
    /// on any thread, but exactly once. Platforms that cannot prompt resolve
    /// it immediately from their settled state.
    fn request_access(&self, responder: PermissionResponder);

    /// Enumerate cameras visible to this platform.
    fn list_devices(&self) -> Result<Vec<CameraDescriptor>, CaptureError>;

    /// Open the camera at `position`, applying what the configuration asks
    /// of the device (frame rate preferences and the like).
    ///
    /// Returns `DeviceUnavailable` when no camera matches the position.
    fn open_device(
        &self,
        position: DevicePosition,
        config: &CaptureConfiguration,
    ) -> Result<Self::Device, CaptureError>;
}
