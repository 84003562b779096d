use crate::models::captured_image::CapturedImage;
use crate::models::error::CaptureError;
use crate::models::state::SessionState;

/// Event delegate for capture session notifications.
///
/// All methods are called from the session worker or device pipeline
/// threads, not the UI thread. Implementations should marshal to the UI
/// thread if needed, and must not call back into the session manager's
/// teardown path from inside a callback.
pub trait CaptureDelegate: Send + Sync {
    /// Called whenever the session state changes.
    fn on_state_changed(&self, state: SessionState);

    /// Called when an error surfaces outside a direct method return
    /// (permission denial, device loss, pipeline failures).
    fn on_error(&self, error: &CaptureError);

    /// Called when a photo capture completes successfully, alongside the
    /// resolution of the capture's ticket.
    fn on_photo_captured(&self, image: &CapturedImage);
}
