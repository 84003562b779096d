use serde::{Deserialize, Serialize};

use super::camera_models::DevicePosition;

/// Configuration for a capture session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptureConfiguration {
    /// Which camera to select first (default: back).
    pub position: DevicePosition,

    /// Zoom factor applied when a device is bound (default: 1.0).
    /// Clamped to the device's supported range at bind time.
    pub initial_zoom: f32,

    /// Preferred preview frame rate in frames per second (None = device default).
    pub preferred_frame_rate: Option<u32>,
}

impl CaptureConfiguration {
    pub fn validate(&self) -> Result<(), String> {
        if !self.initial_zoom.is_finite() || self.initial_zoom <= 0.0 {
            return Err(format!("invalid zoom factor: {}", self.initial_zoom));
        }
        if self.preferred_frame_rate == Some(0) {
            return Err("preferred frame rate must be positive".into());
        }
        Ok(())
    }
}

impl Default for CaptureConfiguration {
    fn default() -> Self {
        Self {
            position: DevicePosition::Back,
            initial_zoom: 1.0,
            preferred_frame_rate: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_zoom(zoom: f32) -> CaptureConfiguration {
        CaptureConfiguration {
            initial_zoom: zoom,
            ..CaptureConfiguration::default()
        }
    }

    #[test]
    fn default_selects_back_camera_at_unit_zoom() {
        let config = CaptureConfiguration::default();
        assert_eq!(config.position, DevicePosition::Back);
        assert_eq!(config.initial_zoom, 1.0);
        assert_eq!(config.preferred_frame_rate, None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validate_rejects_bad_zoom_factors() {
        assert!(with_zoom(0.0).validate().is_err());
        assert!(with_zoom(-2.0).validate().is_err());
        assert!(with_zoom(f32::NAN).validate().is_err());
        assert!(with_zoom(f32::INFINITY).validate().is_err());
        assert!(with_zoom(2.5).validate().is_ok());
    }

    #[test]
    fn validate_rejects_zero_frame_rate() {
        let mut config = CaptureConfiguration::default();
        config.preferred_frame_rate = Some(0);
        assert!(config.validate().is_err());

        config.preferred_frame_rate = Some(30);
        assert!(config.validate().is_ok());
    }
}
