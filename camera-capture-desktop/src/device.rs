//! Webcam device bound to a capture session.
//!
//! `nokhwa::Camera` is not thread-safe on every backend, so each open device
//! gets a dedicated thread that creates and owns the handle; the session side
//! talks to it over a command channel. Frame delivery, zoom, and photo
//! capture are all serviced between frame reads on that thread.

use std::sync::Arc;
use std::thread;
use std::time::Instant;

use crossbeam_channel::{bounded, unbounded, Receiver, Sender, TryRecvError};

use camera_capture_core::{
    CameraDescriptor, CameraDevice, CaptureError, DevicePosition, FrameCallback, FrameFormat,
    Orientation, PhotoCallback, PhotoData, PreviewFrame, ZoomRange,
};

use nokhwa::pixel_format::RgbFormat;
use nokhwa::utils::{
    CameraIndex, ControlValueDescription, ControlValueSetter, FrameFormat as NokhwaFrameFormat,
    KnownCameraControl, RequestedFormat, RequestedFormatType,
};
use nokhwa::{Buffer, Camera};

enum DeviceCommand {
    StartFrames(FrameCallback, Sender<Result<(), CaptureError>>),
    StopFrames(Sender<()>),
    SetZoom(f32, Sender<Result<(), CaptureError>>),
    Capture(PhotoCallback),
    Shutdown,
}

/// A webcam opened for a session. See the module docs for threading.
pub struct DesktopCamera {
    descriptor: CameraDescriptor,
    commands: Sender<DeviceCommand>,
    worker: Option<thread::JoinHandle<()>>,
}

impl DesktopCamera {
    /// Open the camera at `index`, spinning up its owning thread.
    ///
    /// Blocks until the device has actually been opened on that thread, so
    /// open failures surface synchronously. The descriptor's zoom range is
    /// replaced with the range probed from the device's zoom control.
    pub(crate) fn open(
        index: CameraIndex,
        mut descriptor: CameraDescriptor,
        frame_rate: Option<u32>,
    ) -> Result<Self, CaptureError> {
        let (tx, rx) = unbounded();
        let (ready_tx, ready_rx) = bounded(1);
        let thread_descriptor = descriptor.clone();
        let handle = thread::Builder::new()
            .name("desktop-camera".into())
            .spawn(move || device_loop(index, thread_descriptor, frame_rate, ready_tx, rx))
            .map_err(|e| {
                CaptureError::ConfigurationFailed(format!("failed to spawn camera thread: {}", e))
            })?;

        match ready_rx.recv() {
            Ok(Ok(zoom)) => {
                descriptor.zoom = zoom;
                Ok(Self {
                    descriptor,
                    commands: tx,
                    worker: Some(handle),
                })
            }
            Ok(Err(e)) => {
                let _ = handle.join();
                Err(e)
            }
            Err(_) => {
                let _ = handle.join();
                Err(CaptureError::ConfigurationFailed(
                    "camera thread exited before opening".into(),
                ))
            }
        }
    }

    fn roundtrip<T>(
        &self,
        command: DeviceCommand,
        reply: Receiver<T>,
    ) -> Result<T, CaptureError> {
        self.commands.send(command).map_err(|_| thread_gone())?;
        reply.recv().map_err(|_| thread_gone())
    }
}

impl CameraDevice for DesktopCamera {
    fn descriptor(&self) -> CameraDescriptor {
        self.descriptor.clone()
    }

    fn start_frames(&mut self, sink: FrameCallback) -> Result<(), CaptureError> {
        let (reply_tx, reply_rx) = bounded(1);
        self.roundtrip(DeviceCommand::StartFrames(sink, reply_tx), reply_rx)?
    }

    fn stop_frames(&mut self) -> Result<(), CaptureError> {
        let (reply_tx, reply_rx) = bounded(1);
        self.roundtrip(DeviceCommand::StopFrames(reply_tx), reply_rx)?;
        Ok(())
    }

    fn has_torch(&self) -> bool {
        false
    }

    fn set_torch(&mut self, _on: bool) -> Result<(), CaptureError> {
        // UVC exposes no torch control.
        Err(CaptureError::TorchUnsupported)
    }

    fn zoom_range(&self) -> ZoomRange {
        self.descriptor.zoom
    }

    fn set_zoom(&mut self, factor: f32) -> Result<(), CaptureError> {
        let (reply_tx, reply_rx) = bounded(1);
        self.roundtrip(DeviceCommand::SetZoom(factor, reply_tx), reply_rx)?
    }

    fn capture_photo(&mut self, on_complete: PhotoCallback) -> Result<(), CaptureError> {
        self.commands
            .send(DeviceCommand::Capture(on_complete))
            .map_err(|_| thread_gone())
    }
}

impl Drop for DesktopCamera {
    fn drop(&mut self) {
        let _ = self.commands.send(DeviceCommand::Shutdown);
        if let Some(handle) = self.worker.take() {
            let _ = handle.join();
        }
    }
}

fn thread_gone() -> CaptureError {
    CaptureError::ConfigurationFailed("camera thread exited".into())
}

// --- Device thread ---

/// Ratio-style mapping of session zoom factors onto a device zoom control
/// expressed in integer units: factor 1.0 sits at `min`, so factor f maps to
/// `round(f * min)`.
#[derive(Clone, Copy)]
struct ZoomUnits {
    min: i64,
    max: i64,
}

impl ZoomUnits {
    fn range(self) -> ZoomRange {
        ZoomRange::new(1.0, self.max as f32 / self.min as f32)
    }

    fn raw_value(self, factor: f32) -> i64 {
        ((factor * self.min as f32).round() as i64).clamp(self.min, self.max)
    }
}

fn device_loop(
    index: CameraIndex,
    descriptor: CameraDescriptor,
    frame_rate: Option<u32>,
    ready: Sender<Result<ZoomRange, CaptureError>>,
    commands: Receiver<DeviceCommand>,
) {
    let requested = match frame_rate {
        Some(fps) => RequestedFormat::new::<RgbFormat>(RequestedFormatType::HighestFrameRate(fps)),
        None => RequestedFormat::new::<RgbFormat>(RequestedFormatType::AbsoluteHighestFrameRate),
    };
    let mut camera = match Camera::new(index, requested) {
        Ok(camera) => camera,
        Err(e) => {
            let _ = ready.send(Err(CaptureError::ConfigurationFailed(format!(
                "failed to open {}: {}",
                descriptor.name, e
            ))));
            return;
        }
    };

    let zoom_units = probe_zoom(&camera);
    let zoom_range = zoom_units.map(ZoomUnits::range).unwrap_or(ZoomRange::FIXED);
    if ready.send(Ok(zoom_range)).is_err() {
        return;
    }
    log::info!(
        "Opened {} ({}), zoom {:.1}-{:.1}",
        descriptor.name,
        descriptor.position,
        zoom_range.min,
        zoom_range.max
    );

    // Front-classified webcam photos carry the mirrored orientation, matching
    // the session convention for user-facing cameras.
    let orientation = if descriptor.position == DevicePosition::Front {
        Orientation::UpMirrored
    } else {
        Orientation::Up
    };

    let mut sink: Option<FrameCallback> = None;
    let mut sequence: u64 = 0;
    loop {
        // While streaming, commands are serviced between frame reads; when
        // idle, block on the channel.
        let command = if sink.is_some() {
            match commands.try_recv() {
                Ok(command) => Some(command),
                Err(TryRecvError::Empty) => None,
                Err(TryRecvError::Disconnected) => break,
            }
        } else {
            match commands.recv() {
                Ok(command) => Some(command),
                Err(_) => break,
            }
        };

        match command {
            Some(DeviceCommand::StartFrames(callback, reply)) => {
                let result = if sink.is_some() {
                    Err(CaptureError::ConfigurationFailed(
                        "frame delivery already started".into(),
                    ))
                } else {
                    camera.open_stream().map_err(|e| {
                        CaptureError::ConfigurationFailed(format!(
                            "failed to start stream: {}",
                            e
                        ))
                    })
                };
                if result.is_ok() {
                    sink = Some(callback);
                    sequence = 0;
                }
                let _ = reply.send(result);
            }
            Some(DeviceCommand::StopFrames(reply)) => {
                if sink.take().is_some() {
                    if let Err(e) = camera.stop_stream() {
                        log::warn!("Failed to stop camera stream: {}", e);
                    }
                }
                let _ = reply.send(());
            }
            Some(DeviceCommand::SetZoom(factor, reply)) => {
                let _ = reply.send(apply_zoom(&mut camera, zoom_units, factor));
            }
            Some(DeviceCommand::Capture(on_complete)) => {
                on_complete(take_photo(&mut camera, sink.is_some(), orientation));
            }
            Some(DeviceCommand::Shutdown) => break,
            None => {}
        }

        if let Some(callback) = &sink {
            match camera.frame() {
                Ok(buffer) => {
                    sequence += 1;
                    match preview_frame(&buffer, sequence) {
                        Ok(frame) => callback(frame),
                        Err(e) => log::warn!("Dropping undecodable frame: {}", e),
                    }
                }
                Err(e) => log::warn!("Frame read failed: {}", e),
            }
        }
    }

    if sink.is_some() {
        let _ = camera.stop_stream();
    }
    log::debug!("Camera thread for {} exited", descriptor.name);
}

fn probe_zoom(camera: &Camera) -> Option<ZoomUnits> {
    let control = camera.camera_control(KnownCameraControl::Zoom).ok()?;
    match control.description() {
        ControlValueDescription::IntegerRange { min, max, .. } if *min > 0 && *max > *min => {
            Some(ZoomUnits {
                min: *min,
                max: *max,
            })
        }
        _ => None,
    }
}

fn apply_zoom(
    camera: &mut Camera,
    units: Option<ZoomUnits>,
    factor: f32,
) -> Result<(), CaptureError> {
    let Some(units) = units else {
        // Fixed-zoom device; the session only ever sends 1.0 here.
        log::debug!("Zoom requested on a fixed-zoom device; ignoring");
        return Ok(());
    };
    camera
        .set_camera_control(
            KnownCameraControl::Zoom,
            ControlValueSetter::Integer(units.raw_value(factor)),
        )
        .map_err(|e| CaptureError::ConfigurationFailed(format!("failed to set zoom: {}", e)))
}

/// Grab one frame and encode it as a PNG photo.
///
/// Opens the stream for the duration of the shot when the device is not
/// already streaming.
fn take_photo(
    camera: &mut Camera,
    streaming: bool,
    orientation: Orientation,
) -> Result<PhotoData, CaptureError> {
    if !streaming {
        camera.open_stream().map_err(|e| {
            CaptureError::CaptureFailed(format!("failed to start stream: {}", e))
        })?;
    }
    let result = camera
        .frame()
        .map_err(|e| CaptureError::CaptureFailed(format!("frame read failed: {}", e)))
        .and_then(|buffer| encode_photo(&buffer, orientation));
    if !streaming {
        let _ = camera.stop_stream();
    }
    result
}

fn encode_photo(buffer: &Buffer, orientation: Orientation) -> Result<PhotoData, CaptureError> {
    let rgb = buffer.decode_image::<RgbFormat>().map_err(|e| {
        CaptureError::CaptureFailed(format!("failed to decode frame: {}", e))
    })?;
    let mut bytes = Vec::new();
    let encoder = image::codecs::png::PngEncoder::new(&mut bytes);
    image::ImageEncoder::write_image(
        encoder,
        rgb.as_raw(),
        rgb.width(),
        rgb.height(),
        image::ExtendedColorType::Rgb8,
    )
    .map_err(|e| CaptureError::CaptureFailed(format!("failed to encode photo: {}", e)))?;
    Ok(PhotoData { bytes, orientation })
}

/// Wrap a frame buffer for the preview surface. Compressed and packed-YUV
/// formats pass through as-is; everything else is decoded to RGBA.
fn preview_frame(buffer: &Buffer, sequence: u64) -> Result<PreviewFrame, CaptureError> {
    let resolution = buffer.resolution();
    let (format, data): (FrameFormat, Arc<[u8]>) = match buffer.source_frame_format() {
        NokhwaFrameFormat::MJPEG => (FrameFormat::Mjpeg, buffer.buffer().to_vec().into()),
        NokhwaFrameFormat::YUYV => (FrameFormat::Yuyv422, buffer.buffer().to_vec().into()),
        _ => {
            let rgb = buffer.decode_image::<RgbFormat>().map_err(|e| {
                CaptureError::CaptureFailed(format!("failed to decode frame: {}", e))
            })?;
            (FrameFormat::Rgba8, expand_rgb_to_rgba(rgb.as_raw()).into())
        }
    };
    Ok(PreviewFrame {
        width: resolution.width(),
        height: resolution.height(),
        format,
        data,
        sequence,
        captured_at: Instant::now(),
    })
}

fn expand_rgb_to_rgba(rgb: &[u8]) -> Vec<u8> {
    let mut rgba = Vec::with_capacity(rgb.len() / 3 * 4);
    for px in rgb.chunks_exact(3) {
        rgba.extend_from_slice(&[px[0], px[1], px[2], 255]);
    }
    rgba
}
