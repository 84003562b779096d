//! Webcam enumeration and position inference.
//!
//! Desktop cameras carry no notion of "front" or "back", so the session's
//! position-based selection is mapped onto device product names: names that
//! mention the environment side count as back cameras, names of user-facing
//! cameras count as front. Everything else defaults to back, the session's
//! default selection.

use camera_capture_core::DevicePosition;

/// Name fragments marking a camera as environment-facing. Checked before the
/// front hints so "Back Camera" beats a weaker hint like "Integrated".
const BACK_NAME_HINTS: &[&str] = &["back", "rear", "environment"];

/// Name fragments marking a camera as user-facing.
const FRONT_NAME_HINTS: &[&str] = &["front", "user", "facetime", "integrated", "built-in"];

/// Infer which way a camera faces from its product name.
pub fn infer_position(name: &str) -> Option<DevicePosition> {
    let lowered = name.to_lowercase();
    if BACK_NAME_HINTS.iter().any(|hint| lowered.contains(hint)) {
        return Some(DevicePosition::Back);
    }
    if FRONT_NAME_HINTS.iter().any(|hint| lowered.contains(hint)) {
        return Some(DevicePosition::Front);
    }
    None
}

#[cfg(feature = "native")]
pub use native::list_devices;

#[cfg(feature = "native")]
mod native {
    use camera_capture_core::{CameraDescriptor, CaptureError, DevicePosition, ZoomRange};
    use nokhwa::utils::{ApiBackend, CameraInfo};

    use super::infer_position;

    /// Enumerate webcams through the platform's native capture API.
    ///
    /// Zoom ranges are reported as fixed here; the real range is probed when
    /// a device is opened.
    pub fn list_devices() -> Result<Vec<CameraDescriptor>, CaptureError> {
        let cameras = nokhwa::query(ApiBackend::Auto).map_err(|e| {
            CaptureError::ConfigurationFailed(format!("camera enumeration failed: {}", e))
        })?;
        Ok(cameras.iter().map(descriptor_for).collect())
    }

    fn descriptor_for(info: &CameraInfo) -> CameraDescriptor {
        let name = info.human_name();
        CameraDescriptor {
            id: info.index().to_string(),
            position: infer_position(&name).unwrap_or(DevicePosition::Back),
            name,
            // UVC webcams have no torch.
            has_torch: false,
            zoom: ZoomRange::FIXED,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn back_hints_map_to_back() {
        assert_eq!(infer_position("USB Back Camera"), Some(DevicePosition::Back));
        assert_eq!(infer_position("rear module"), Some(DevicePosition::Back));
        assert_eq!(
            infer_position("Environment Cam 4K"),
            Some(DevicePosition::Back)
        );
    }

    #[test]
    fn front_hints_map_to_front() {
        assert_eq!(
            infer_position("FaceTime HD Camera"),
            Some(DevicePosition::Front)
        );
        assert_eq!(
            infer_position("Integrated Webcam"),
            Some(DevicePosition::Front)
        );
        assert_eq!(
            infer_position("Front USB2.0 Camera"),
            Some(DevicePosition::Front)
        );
    }

    #[test]
    fn back_hints_win_over_front_hints() {
        // Both kinds of hint present: the stronger environment hint decides.
        assert_eq!(
            infer_position("Integrated Back Camera"),
            Some(DevicePosition::Back)
        );
    }

    #[test]
    fn unmarked_names_are_unclassified() {
        assert_eq!(infer_position("Logitech C920"), None);
        assert_eq!(infer_position(""), None);
    }

    #[test]
    fn matching_is_case_insensitive() {
        assert_eq!(infer_position("REAR CAMERA"), Some(DevicePosition::Back));
        assert_eq!(infer_position("FaceTime hd"), Some(DevicePosition::Front));
    }
}
