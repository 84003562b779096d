//! # camera-capture-core
//!
//! Platform-agnostic camera capture core library.
//!
//! Provides the capture session state machine, permission flow, preview
//! delivery, torch and zoom control, and one-shot photo capture. Platform
//! backends (desktop webcams via nokhwa, the in-memory simulator) implement
//! the `CameraPlatform` and `CameraDevice` traits and plug into the generic
//! `CaptureSessionManager`.
//!
//! ## Architecture
//!
//! ```text
//! camera-capture-core (this crate)
//! ├── traits/       ← CameraPlatform, CameraDevice, CaptureDelegate, PhotoLibrary
//! ├── models/       ← CaptureError, SessionState, CaptureConfiguration, CapturedImage, etc.
//! ├── preview       ← PreviewSurface / PreviewFrame (latest-frame slot)
//! ├── session/      ← CaptureSessionManager (generic orchestrator), PhotoTicket
//! └── simulated     ← SimulatedPlatform (in-memory backend for tests and dev)
//! ```

pub mod models;
pub mod preview;
pub mod session;
pub mod simulated;
pub mod traits;

// Re-export key types at crate root for convenience.
pub use models::camera_models::{
    CameraDescriptor, DevicePosition, FrameFormat, Orientation, SessionDiagnostics, ZoomRange,
};
pub use models::captured_image::{CapturedImage, PhotoData};
pub use models::config::CaptureConfiguration;
pub use models::error::CaptureError;
pub use models::state::{PermissionState, SessionState};
pub use preview::{PreviewFrame, PreviewSurface};
pub use session::manager::CaptureSessionManager;
pub use session::pending::{CaptureOutcome, PhotoTicket};
pub use simulated::{
    CaptureScript, PermissionScript, SimulatedCamera, SimulatedDeviceSpec, SimulatedPhotoLibrary,
    SimulatedPlatform,
};
pub use traits::camera_device::{CameraDevice, FrameCallback, PhotoCallback};
pub use traits::camera_platform::{CameraPlatform, PermissionResponder};
pub use traits::capture_delegate::CaptureDelegate;
pub use traits::photo_library::{LibraryFilter, LibraryPickCallback, PhotoLibrary};
