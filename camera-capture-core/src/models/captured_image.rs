use std::sync::Arc;

use super::camera_models::Orientation;
use super::error::CaptureError;

/// Raw product of a device photo pipeline: encoded image bytes (PNG, JPEG)
/// plus orientation metadata. Decoded into a [`CapturedImage`] by the session
/// before delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoData {
    pub bytes: Vec<u8>,
    pub orientation: Orientation,
}

/// A decoded still photo, handed to the caller once per capture request.
///
/// Pixels are tightly packed RGBA8 (`width * height * 4` bytes), stored
/// as-decoded; `orientation` tells the consumer how to display them. The
/// image is immutable and the session retains no reference after delivery.
#[derive(Debug, Clone, PartialEq)]
pub struct CapturedImage {
    /// Capture-request correlation id (UUID v4).
    pub id: String,
    pub width: u32,
    pub height: u32,
    pub pixels: Arc<[u8]>,
    pub orientation: Orientation,
    pub captured_at: chrono::DateTime<chrono::Utc>,
}

impl CapturedImage {
    /// Decode an encoded photo buffer into an RGBA8 image.
    ///
    /// Empty or undecodable buffers map to `CaptureFailed`.
    pub fn decode(photo: PhotoData) -> Result<Self, CaptureError> {
        if photo.bytes.is_empty() {
            return Err(CaptureError::CaptureFailed(
                "photo pipeline returned no data".into(),
            ));
        }

        let decoded = image::load_from_memory(&photo.bytes)
            .map_err(|e| CaptureError::CaptureFailed(format!("undecodable photo data: {}", e)))?;
        let rgba = decoded.to_rgba8();
        let (width, height) = rgba.dimensions();
        if width == 0 || height == 0 {
            return Err(CaptureError::CaptureFailed(
                "decoded photo has zero size".into(),
            ));
        }

        Ok(Self {
            id: uuid::Uuid::new_v4().to_string(),
            width,
            height,
            pixels: rgba.into_raw().into(),
            orientation: photo.orientation,
            captured_at: chrono::Utc::now(),
        })
    }

    /// Total byte length of the pixel buffer.
    pub fn byte_len(&self) -> usize {
        self.pixels.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn encoded_png(width: u32, height: u32) -> Vec<u8> {
        let img = image::RgbaImage::from_fn(width, height, |x, y| {
            image::Rgba([x as u8, y as u8, 128, 255])
        });
        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn decodes_png_into_rgba_pixels() {
        let photo = PhotoData {
            bytes: encoded_png(8, 6),
            orientation: Orientation::UpMirrored,
        };

        let image = CapturedImage::decode(photo).unwrap();
        assert_eq!(image.width, 8);
        assert_eq!(image.height, 6);
        assert_eq!(image.byte_len(), 8 * 6 * 4);
        assert_eq!(image.orientation, Orientation::UpMirrored);
        assert!(!image.id.is_empty());
    }

    #[test]
    fn empty_buffer_is_capture_failed() {
        let photo = PhotoData {
            bytes: Vec::new(),
            orientation: Orientation::Up,
        };

        assert_eq!(
            CapturedImage::decode(photo),
            Err(CaptureError::CaptureFailed(
                "photo pipeline returned no data".into()
            ))
        );
    }

    #[test]
    fn garbage_buffer_is_capture_failed() {
        let photo = PhotoData {
            bytes: vec![0xde, 0xad, 0xbe, 0xef],
            orientation: Orientation::Up,
        };

        assert!(matches!(
            CapturedImage::decode(photo),
            Err(CaptureError::CaptureFailed(_))
        ));
    }
}
