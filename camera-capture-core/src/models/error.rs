use thiserror::Error;

use super::camera_models::DevicePosition;

/// Errors that can occur during camera capture operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CaptureError {
    #[error("permission denied")]
    PermissionDenied,

    #[error("no {0} camera available")]
    DeviceUnavailable(DevicePosition),

    #[error("configuration failed: {0}")]
    ConfigurationFailed(String),

    #[error("capture already in progress")]
    CaptureInProgress,

    #[error("capture failed: {0}")]
    CaptureFailed(String),

    #[error("torch not supported on this device")]
    TorchUnsupported,
}
