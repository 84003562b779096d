use std::fmt;

use serde::{Deserialize, Serialize};

/// Physical placement of a camera on the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DevicePosition {
    Front,
    Back,
}

impl DevicePosition {
    /// The opposite position (front ↔ back).
    pub fn toggled(self) -> Self {
        match self {
            Self::Front => Self::Back,
            Self::Back => Self::Front,
        }
    }
}

impl fmt::Display for DevicePosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Front => write!(f, "front"),
            Self::Back => write!(f, "back"),
        }
    }
}

/// Zoom limits for a camera, as multipliers of the base focal length.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoomRange {
    pub min: f32,
    pub max: f32,
}

impl ZoomRange {
    /// Range reported by devices without any optical or digital zoom.
    pub const FIXED: Self = Self { min: 1.0, max: 1.0 };

    pub fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Clamp a requested factor into this range.
    pub fn clamp(&self, factor: f32) -> f32 {
        factor.clamp(self.min, self.max)
    }
}

impl Default for ZoomRange {
    fn default() -> Self {
        Self::FIXED
    }
}

/// Orientation metadata attached to captured photos.
///
/// Follows the EXIF orientation model: four rotations, each with a mirrored
/// counterpart. Front-camera photos are mirrored by convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    #[default]
    Up,
    Down,
    Left,
    Right,
    UpMirrored,
    DownMirrored,
    LeftMirrored,
    RightMirrored,
}

impl Orientation {
    pub fn is_mirrored(self) -> bool {
        matches!(
            self,
            Self::UpMirrored | Self::DownMirrored | Self::LeftMirrored | Self::RightMirrored
        )
    }

    /// Whether rendering at this orientation swaps width and height.
    pub fn swaps_dimensions(self) -> bool {
        matches!(
            self,
            Self::Left | Self::Right | Self::LeftMirrored | Self::RightMirrored
        )
    }

    /// The mirrored counterpart of this orientation.
    pub fn mirrored(self) -> Self {
        match self {
            Self::Up => Self::UpMirrored,
            Self::Down => Self::DownMirrored,
            Self::Left => Self::LeftMirrored,
            Self::Right => Self::RightMirrored,
            Self::UpMirrored => Self::Up,
            Self::DownMirrored => Self::Down,
            Self::LeftMirrored => Self::Left,
            Self::RightMirrored => Self::Right,
        }
    }
}

/// Pixel layout of a preview frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FrameFormat {
    /// 8-bit RGBA, 4 bytes per pixel.
    Rgba8,
    /// 8-bit BGRA, 4 bytes per pixel.
    Bgra8,
    /// Packed YUV 4:2:2, 2 bytes per pixel.
    Yuyv422,
    /// Motion-JPEG compressed frames.
    Mjpeg,
}

impl FrameFormat {
    /// Bytes per pixel, for uncompressed formats.
    pub fn bytes_per_pixel(self) -> Option<usize> {
        match self {
            Self::Rgba8 | Self::Bgra8 => Some(4),
            Self::Yuyv422 => Some(2),
            Self::Mjpeg => None,
        }
    }
}

/// A physical camera available for capture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraDescriptor {
    pub id: String,
    pub name: String,
    pub position: DevicePosition,
    pub has_torch: bool,
    pub zoom: ZoomRange,
}

/// Diagnostics for debugging capture sessions.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionDiagnostics {
    pub frames_delivered: u64,
    pub captures_started: u64,
    pub captures_completed: u64,
    pub captures_failed: u64,
    pub flips: u64,
    pub permission_prompts: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggled_flips_between_positions() {
        assert_eq!(DevicePosition::Back.toggled(), DevicePosition::Front);
        assert_eq!(DevicePosition::Front.toggled(), DevicePosition::Back);
        assert_eq!(DevicePosition::Back.toggled().toggled(), DevicePosition::Back);
    }

    #[test]
    fn zoom_range_clamps_out_of_range_factors() {
        let range = ZoomRange::new(1.0, 5.0);
        assert_eq!(range.clamp(0.5), 1.0);
        assert_eq!(range.clamp(2.5), 2.5);
        assert_eq!(range.clamp(9.0), 5.0);

        // Fixed-focal devices pin everything to 1.0.
        assert_eq!(ZoomRange::FIXED.clamp(3.0), 1.0);
    }

    #[test]
    fn orientation_helpers() {
        assert!(!Orientation::Up.is_mirrored());
        assert!(Orientation::UpMirrored.is_mirrored());
        assert!(Orientation::Left.swaps_dimensions());
        assert!(!Orientation::Down.swaps_dimensions());
        assert_eq!(Orientation::Right.mirrored(), Orientation::RightMirrored);
        assert_eq!(Orientation::RightMirrored.mirrored(), Orientation::Right);
    }

    #[test]
    fn frame_format_byte_widths() {
        assert_eq!(FrameFormat::Rgba8.bytes_per_pixel(), Some(4));
        assert_eq!(FrameFormat::Bgra8.bytes_per_pixel(), Some(4));
        assert_eq!(FrameFormat::Yuyv422.bytes_per_pixel(), Some(2));
        assert_eq!(FrameFormat::Mjpeg.bytes_per_pixel(), None);
    }

    #[test]
    fn descriptor_serializes_with_stable_field_names() {
        let descriptor = CameraDescriptor {
            id: "cam-0".into(),
            name: "Back Camera".into(),
            position: DevicePosition::Back,
            has_torch: true,
            zoom: ZoomRange::new(1.0, 5.0),
        };

        let json = serde_json::to_value(&descriptor).unwrap();
        assert_eq!(json["id"], "cam-0");
        assert_eq!(json["position"], "back");
        assert_eq!(json["has_torch"], true);
        assert_eq!(json["zoom"]["max"], 5.0);
    }
}
