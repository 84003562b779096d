pub mod camera_device;
pub mod camera_platform;
pub mod capture_delegate;
pub mod photo_library;
