//! # camera-capture-desktop
//!
//! Desktop webcam backend for camera-capture-kit.
//!
//! Provides:
//! - `DesktopPlatform` — `CameraPlatform` over the native capture API (AVFoundation,
//!   Media Foundation, V4L2) via nokhwa
//! - `DesktopCamera` — a webcam owned by a dedicated device thread
//! - `enumerate` — device listing and front/back position inference from device names
//! - `permissions` — macOS TCC consent; pass-through on Windows and Linux
//!
//! The nokhwa-backed pieces sit behind the `native` feature (off by default)
//! so the crate builds without the platform capture stacks present; position
//! inference and the permission pass-through are always available.
//!
//! ## Usage
//! ```ignore
//! use camera_capture_core::CaptureSessionManager;
//! use camera_capture_desktop::DesktopPlatform;
//!
//! let manager = CaptureSessionManager::new(DesktopPlatform::new());
//! manager.request_permission_and_start().unwrap();
//! ```

pub mod enumerate;
pub mod permissions;

#[cfg(feature = "native")]
pub mod device;
#[cfg(feature = "native")]
pub mod platform;

#[cfg(feature = "native")]
pub use device::DesktopCamera;
#[cfg(feature = "native")]
pub use platform::DesktopPlatform;
