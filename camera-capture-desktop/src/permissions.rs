//! Desktop camera permission checks.
//!
//! On macOS, camera access is gated by TCC: the first open triggers a consent
//! dialog and the answer is remembered per app. On Windows and Linux there is
//! no per-app consent dialog for classic desktop apps; privacy toggles or
//! device-node permissions surface as open errors instead, so permission is
//! reported as granted and failures are left to device binding.

use camera_capture_core::{PermissionResponder, PermissionState};

/// Camera permission as observable without prompting.
#[cfg(all(feature = "native", target_os = "macos"))]
pub fn initial_status() -> PermissionState {
    if nokhwa::nokhwa_check() {
        PermissionState::Authorized
    } else {
        // AVFoundation does not distinguish denied from never-asked without
        // showing the prompt.
        PermissionState::Undetermined
    }
}

#[cfg(not(all(feature = "native", target_os = "macos")))]
pub fn initial_status() -> PermissionState {
    PermissionState::Authorized
}

/// Show the platform consent prompt, if the platform has one.
///
/// The responder fires exactly once with the user's answer; platforms
/// without a prompt answer immediately from their settled state.
#[cfg(all(feature = "native", target_os = "macos"))]
pub fn request_access(responder: PermissionResponder) {
    let slot = parking_lot::Mutex::new(Some(responder));
    nokhwa::nokhwa_initialize(move |granted| {
        if let Some(responder) = slot.lock().take() {
            responder(granted);
        }
    });
}

#[cfg(not(all(feature = "native", target_os = "macos")))]
pub fn request_access(responder: PermissionResponder) {
    responder(true);
}

#[cfg(all(test, not(all(feature = "native", target_os = "macos"))))]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::Arc;

    #[test]
    fn unprompted_platforms_report_authorized() {
        assert_eq!(initial_status(), PermissionState::Authorized);
    }

    #[test]
    fn request_access_answers_immediately() {
        let answer = Arc::new(Mutex::new(None));
        let sink = Arc::clone(&answer);
        request_access(Box::new(move |granted| *sink.lock() = Some(granted)));
        assert_eq!(*answer.lock(), Some(true));
    }
}
