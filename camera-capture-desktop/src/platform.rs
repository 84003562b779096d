//! Desktop implementation of the core platform traits.

use std::sync::Arc;

use parking_lot::Mutex;

use camera_capture_core::{
    CameraDescriptor, CameraPlatform, CaptureConfiguration, CaptureError, DevicePosition,
    PermissionResponder, PermissionState,
};
use nokhwa::utils::CameraIndex;

use crate::device::DesktopCamera;
use crate::enumerate;
use crate::permissions;

/// Desktop webcam platform.
///
/// Position selection works on inferred positions (see [`crate::enumerate`]).
/// Most machines have a single unmarked webcam, which classifies as back; with
/// relaxed matching (the default) a request for a position with no matching
/// camera falls back to the first camera found, so a front/back flip on a
/// one-camera machine reopens the same device instead of failing.
pub struct DesktopPlatform {
    permission: Arc<Mutex<PermissionState>>,
    relaxed_position_matching: bool,
}

impl DesktopPlatform {
    pub fn new() -> Self {
        Self::with_relaxed_matching(true)
    }

    /// `relaxed` controls the fallback when no camera matches the requested
    /// position: false makes such requests fail with `DeviceUnavailable`.
    pub fn with_relaxed_matching(relaxed: bool) -> Self {
        Self {
            permission: Arc::new(Mutex::new(permissions::initial_status())),
            relaxed_position_matching: relaxed,
        }
    }
}

impl Default for DesktopPlatform {
    fn default() -> Self {
        Self::new()
    }
}

impl CameraPlatform for DesktopPlatform {
    type Device = DesktopCamera;

    fn authorization_status(&self) -> PermissionState {
        *self.permission.lock()
    }

    fn request_access(&self, responder: PermissionResponder) {
        let cache = Arc::clone(&self.permission);
        permissions::request_access(Box::new(move |granted| {
            *cache.lock() = if granted {
                PermissionState::Authorized
            } else {
                PermissionState::Denied
            };
            responder(granted);
        }));
    }

    fn list_devices(&self) -> Result<Vec<CameraDescriptor>, CaptureError> {
        enumerate::list_devices()
    }

    fn open_device(
        &self,
        position: DevicePosition,
        config: &CaptureConfiguration,
    ) -> Result<Self::Device, CaptureError> {
        let devices = enumerate::list_devices()?;
        let chosen = match devices.iter().find(|d| d.position == position) {
            Some(descriptor) => descriptor,
            None if self.relaxed_position_matching && !devices.is_empty() => {
                let fallback = &devices[0];
                log::warn!(
                    "No {} camera found; falling back to {}",
                    position,
                    fallback.name
                );
                fallback
            }
            None => return Err(CaptureError::DeviceUnavailable(position)),
        };

        // Descriptor ids round-trip through the nokhwa index.
        let index = match chosen.id.parse::<u32>() {
            Ok(n) => CameraIndex::Index(n),
            Err(_) => CameraIndex::String(chosen.id.clone()),
        };
        DesktopCamera::open(index, chosen.clone(), config.preferred_frame_rate)
    }
}
