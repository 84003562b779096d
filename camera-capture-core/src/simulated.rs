//! Deterministic in-process camera backend.
//!
//! `SimulatedPlatform` implements [`CameraPlatform`] entirely in memory:
//! scripted permission prompts, a front and a back camera that stream
//! synthesized frames from a paced thread, and a photo pipeline that encodes
//! real PNG bytes. It backs the session test suite and doubles as a
//! development backend on machines without a camera.
//!
//! The platform handle is cheaply cloneable; clones observe and steer the
//! same simulated device state, so tests keep one clone as a control handle
//! while the session owns the other.

use std::collections::HashMap;
use std::io::Cursor;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};

use crate::models::camera_models::{
    CameraDescriptor, DevicePosition, FrameFormat, Orientation, ZoomRange,
};
use crate::models::captured_image::PhotoData;
use crate::models::config::CaptureConfiguration;
use crate::models::error::CaptureError;
use crate::models::state::PermissionState;
use crate::preview::PreviewFrame;
use crate::traits::camera_device::{CameraDevice, FrameCallback, PhotoCallback};
use crate::traits::camera_platform::{CameraPlatform, PermissionResponder};
use crate::traits::photo_library::{LibraryFilter, LibraryPickCallback, PhotoLibrary};

const FRAME_WIDTH: u32 = 64;
const FRAME_HEIGHT: u32 = 48;
const PHOTO_WIDTH: u32 = 128;
const PHOTO_HEIGHT: u32 = 96;
const DEFAULT_FRAME_RATE: u32 = 30;

/// How the platform answers a permission prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PermissionScript {
    /// Grant as soon as the prompt is shown.
    #[default]
    GrantImmediately,
    /// Deny as soon as the prompt is shown.
    DenyImmediately,
    /// Park the prompt until `resolve_pending_access` is called.
    Defer,
}

/// How the photo pipeline behaves on capture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CaptureScript {
    /// Deliver a synthesized PNG after a short pipeline delay.
    #[default]
    Synthesize,
    /// Fail with a pipeline error.
    FailPipeline,
    /// Deliver an empty buffer, as a broken pipeline would.
    EmptyResult,
    /// Park the capture until `resolve_pending_capture` is called.
    Defer,
}

/// Description of one simulated camera.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulatedDeviceSpec {
    pub id: String,
    pub name: String,
    pub position: DevicePosition,
    pub has_torch: bool,
    pub zoom: ZoomRange,
}

impl SimulatedDeviceSpec {
    fn back() -> Self {
        Self {
            id: "sim-back".into(),
            name: "Simulated Back Camera".into(),
            position: DevicePosition::Back,
            has_torch: true,
            zoom: ZoomRange::new(1.0, 5.0),
        }
    }

    fn front() -> Self {
        Self {
            id: "sim-front".into(),
            name: "Simulated Front Camera".into(),
            position: DevicePosition::Front,
            has_torch: false,
            zoom: ZoomRange::new(1.0, 3.0),
        }
    }

    fn descriptor(&self) -> CameraDescriptor {
        CameraDescriptor {
            id: self.id.clone(),
            name: self.name.clone(),
            position: self.position,
            has_torch: self.has_torch,
            zoom: self.zoom,
        }
    }
}

struct PlatformShared {
    permission: Mutex<PermissionState>,
    permission_script: Mutex<PermissionScript>,
    capture_script: Mutex<CaptureScript>,
    pending_access: Mutex<Option<PermissionResponder>>,
    pending_capture: Mutex<Option<(PhotoCallback, PhotoData)>>,
    devices: Mutex<Vec<SimulatedDeviceSpec>>,
    torch_state: Mutex<HashMap<String, bool>>,
    zoom_state: Mutex<HashMap<String, f32>>,
    open_log: Mutex<Vec<DevicePosition>>,
    open_rates: Mutex<Vec<u32>>,
    open_hold: Mutex<bool>,
    open_signal: Condvar,
    open_waiters: AtomicUsize,
}

/// In-memory camera platform. See the module docs.
#[derive(Clone)]
pub struct SimulatedPlatform {
    shared: Arc<PlatformShared>,
}

impl SimulatedPlatform {
    /// A platform with one back camera (torch, zoom 1–5) and one front
    /// camera (no torch, zoom 1–3), permission undetermined.
    pub fn new() -> Self {
        Self::with_devices(vec![SimulatedDeviceSpec::back(), SimulatedDeviceSpec::front()])
    }

    pub fn with_devices(devices: Vec<SimulatedDeviceSpec>) -> Self {
        Self {
            shared: Arc::new(PlatformShared {
                permission: Mutex::new(PermissionState::Undetermined),
                permission_script: Mutex::new(PermissionScript::default()),
                capture_script: Mutex::new(CaptureScript::default()),
                pending_access: Mutex::new(None),
                pending_capture: Mutex::new(None),
                devices: Mutex::new(devices),
                torch_state: Mutex::new(HashMap::new()),
                zoom_state: Mutex::new(HashMap::new()),
                open_log: Mutex::new(Vec::new()),
                open_rates: Mutex::new(Vec::new()),
                open_hold: Mutex::new(false),
                open_signal: Condvar::new(),
                open_waiters: AtomicUsize::new(0),
            }),
        }
    }

    /// Force the OS-level permission setting, as the Settings app would.
    pub fn set_authorization(&self, permission: PermissionState) {
        *self.shared.permission.lock() = permission;
    }

    pub fn set_permission_script(&self, script: PermissionScript) {
        *self.shared.permission_script.lock() = script;
    }

    pub fn set_capture_script(&self, script: CaptureScript) {
        *self.shared.capture_script.lock() = script;
    }

    /// Answer a parked permission prompt. Returns false when none is parked.
    pub fn resolve_pending_access(&self, granted: bool) -> bool {
        let responder = self.shared.pending_access.lock().take();
        match responder {
            Some(responder) => {
                *self.shared.permission.lock() = if granted {
                    PermissionState::Authorized
                } else {
                    PermissionState::Denied
                };
                responder(granted);
                true
            }
            None => false,
        }
    }

    /// Drop a parked permission prompt without answering it.
    pub fn drop_pending_access(&self) -> bool {
        self.shared.pending_access.lock().take().is_some()
    }

    /// Whether a deferred capture is parked in the pipeline.
    pub fn has_pending_capture(&self) -> bool {
        self.shared.pending_capture.lock().is_some()
    }

    /// Complete a parked capture with its synthesized photo. Returns false
    /// when none is parked.
    pub fn resolve_pending_capture(&self) -> bool {
        let parked = self.shared.pending_capture.lock().take();
        match parked {
            Some((on_complete, data)) => {
                on_complete(Ok(data));
                true
            }
            None => false,
        }
    }

    /// Park subsequent `open_device` calls until `release_opens` runs.
    pub fn hold_opens(&self) {
        *self.shared.open_hold.lock() = true;
    }

    /// Release `open_device` calls parked by `hold_opens`.
    pub fn release_opens(&self) {
        *self.shared.open_hold.lock() = false;
        self.shared.open_signal.notify_all();
    }

    /// Number of `open_device` calls currently parked.
    pub fn parked_opens(&self) -> usize {
        self.shared.open_waiters.load(Ordering::SeqCst)
    }

    /// Current torch state of a device, by id.
    pub fn torch_is_on(&self, device_id: &str) -> bool {
        self.shared
            .torch_state
            .lock()
            .get(device_id)
            .copied()
            .unwrap_or(false)
    }

    /// Last zoom factor applied to a device, by id.
    pub fn zoom_factor(&self, device_id: &str) -> Option<f32> {
        self.shared.zoom_state.lock().get(device_id).copied()
    }

    /// Positions opened so far, in order.
    pub fn opened_positions(&self) -> Vec<DevicePosition> {
        self.shared.open_log.lock().clone()
    }

    /// Frame rates applied to opened devices, in order.
    pub fn opened_frame_rates(&self) -> Vec<u32> {
        self.shared.open_rates.lock().clone()
    }

    /// Remove every camera at `position`, simulating hardware that is
    /// missing or in use elsewhere.
    pub fn remove_devices_at(&self, position: DevicePosition) {
        self.shared
            .devices
            .lock()
            .retain(|spec| spec.position != position);
    }
}

impl Default for SimulatedPlatform {
    fn default() -> Self {
        Self::new()
    }
}

impl CameraPlatform for SimulatedPlatform {
    type Device = SimulatedCamera;

    fn authorization_status(&self) -> PermissionState {
        *self.shared.permission.lock()
    }

    fn request_access(&self, responder: PermissionResponder) {
        let script = *self.shared.permission_script.lock();
        match script {
            PermissionScript::GrantImmediately => {
                *self.shared.permission.lock() = PermissionState::Authorized;
                responder(true);
            }
            PermissionScript::DenyImmediately => {
                *self.shared.permission.lock() = PermissionState::Denied;
                responder(false);
            }
            PermissionScript::Defer => {
                *self.shared.pending_access.lock() = Some(responder);
            }
        }
    }

    fn list_devices(&self) -> Result<Vec<CameraDescriptor>, CaptureError> {
        Ok(self
            .shared
            .devices
            .lock()
            .iter()
            .map(SimulatedDeviceSpec::descriptor)
            .collect())
    }

    fn open_device(
        &self,
        position: DevicePosition,
        config: &CaptureConfiguration,
    ) -> Result<Self::Device, CaptureError> {
        {
            let mut held = self.shared.open_hold.lock();
            if *held {
                self.shared.open_waiters.fetch_add(1, Ordering::SeqCst);
                while *held {
                    self.shared.open_signal.wait(&mut held);
                }
                self.shared.open_waiters.fetch_sub(1, Ordering::SeqCst);
            }
        }

        let spec = self
            .shared
            .devices
            .lock()
            .iter()
            .find(|spec| spec.position == position)
            .cloned()
            .ok_or(CaptureError::DeviceUnavailable(position))?;

        let frame_rate = config.preferred_frame_rate.unwrap_or(DEFAULT_FRAME_RATE);
        self.shared.open_log.lock().push(position);
        self.shared.open_rates.lock().push(frame_rate);
        self.shared
            .torch_state
            .lock()
            .insert(spec.id.clone(), false);
        self.shared
            .zoom_state
            .lock()
            .insert(spec.id.clone(), spec.zoom.clamp(1.0));

        Ok(SimulatedCamera {
            spec,
            platform: Arc::clone(&self.shared),
            frame_rate,
            running: Arc::new(AtomicBool::new(false)),
            frame_thread: None,
        })
    }
}

/// A single simulated camera, streaming synthesized frames from its own
/// paced thread while open.
pub struct SimulatedCamera {
    spec: SimulatedDeviceSpec,
    platform: Arc<PlatformShared>,
    frame_rate: u32,
    running: Arc<AtomicBool>,
    frame_thread: Option<thread::JoinHandle<()>>,
}

impl SimulatedCamera {
    /// Stop the frame thread and drop the torch, as closing real hardware
    /// does.
    fn halt(&mut self) {
        self.running.store(false, Ordering::SeqCst);
        if let Some(handle) = self.frame_thread.take() {
            let _ = handle.join();
        }
        self.platform
            .torch_state
            .lock()
            .insert(self.spec.id.clone(), false);
    }

    fn photo_orientation(&self) -> Orientation {
        // Front-camera photos are mirrored by convention.
        if self.spec.position == DevicePosition::Front {
            Orientation::UpMirrored
        } else {
            Orientation::Up
        }
    }
}

impl CameraDevice for SimulatedCamera {
    fn descriptor(&self) -> CameraDescriptor {
        self.spec.descriptor()
    }

    fn start_frames(&mut self, sink: FrameCallback) -> Result<(), CaptureError> {
        if self.frame_thread.is_some() {
            return Err(CaptureError::ConfigurationFailed(
                "frame delivery already started".into(),
            ));
        }

        self.running.store(true, Ordering::SeqCst);
        let running = Arc::clone(&self.running);
        let interval = Duration::from_millis(u64::from(1000 / self.frame_rate.max(1)));
        let handle = thread::Builder::new()
            .name("simulated-frames".into())
            .spawn(move || {
                let mut sequence: u64 = 0;
                while running.load(Ordering::SeqCst) {
                    sequence += 1;
                    sink(PreviewFrame {
                        width: FRAME_WIDTH,
                        height: FRAME_HEIGHT,
                        format: FrameFormat::Rgba8,
                        data: synth_frame_pixels(FRAME_WIDTH, FRAME_HEIGHT, sequence).into(),
                        sequence,
                        captured_at: Instant::now(),
                    });
                    thread::sleep(interval);
                }
            })
            .expect("failed to spawn frame thread");
        self.frame_thread = Some(handle);
        Ok(())
    }

    fn stop_frames(&mut self) -> Result<(), CaptureError> {
        self.halt();
        Ok(())
    }

    fn has_torch(&self) -> bool {
        self.spec.has_torch
    }

    fn set_torch(&mut self, on: bool) -> Result<(), CaptureError> {
        if !self.spec.has_torch {
            return Err(CaptureError::TorchUnsupported);
        }
        self.platform
            .torch_state
            .lock()
            .insert(self.spec.id.clone(), on);
        Ok(())
    }

    fn zoom_range(&self) -> ZoomRange {
        self.spec.zoom
    }

    fn set_zoom(&mut self, factor: f32) -> Result<(), CaptureError> {
        // Strict, like real hardware: the session clamps before calling.
        if factor < self.spec.zoom.min || factor > self.spec.zoom.max {
            return Err(CaptureError::ConfigurationFailed(format!(
                "zoom factor {} outside supported range",
                factor
            )));
        }
        self.platform
            .zoom_state
            .lock()
            .insert(self.spec.id.clone(), factor);
        Ok(())
    }

    fn capture_photo(&mut self, on_complete: PhotoCallback) -> Result<(), CaptureError> {
        let script = *self.platform.capture_script.lock();
        let orientation = self.photo_orientation();
        match script {
            CaptureScript::Synthesize => {
                spawn_photo_thread(move || match synth_photo_bytes(PHOTO_WIDTH, PHOTO_HEIGHT) {
                    Ok(bytes) => on_complete(Ok(PhotoData { bytes, orientation })),
                    Err(e) => on_complete(Err(CaptureError::CaptureFailed(format!(
                        "failed to encode photo: {}",
                        e
                    )))),
                });
            }
            CaptureScript::FailPipeline => {
                spawn_photo_thread(move || {
                    on_complete(Err(CaptureError::CaptureFailed(
                        "simulated pipeline failure".into(),
                    )));
                });
            }
            CaptureScript::EmptyResult => {
                spawn_photo_thread(move || {
                    on_complete(Ok(PhotoData {
                        bytes: Vec::new(),
                        orientation,
                    }));
                });
            }
            CaptureScript::Defer => {
                let bytes = synth_photo_bytes(PHOTO_WIDTH, PHOTO_HEIGHT).map_err(|e| {
                    CaptureError::CaptureFailed(format!("failed to encode photo: {}", e))
                })?;
                *self.platform.pending_capture.lock() =
                    Some((on_complete, PhotoData { bytes, orientation }));
            }
        }
        Ok(())
    }
}

impl Drop for SimulatedCamera {
    fn drop(&mut self) {
        self.halt();
    }
}

/// In-memory photo library, handing back a preset selection.
#[derive(Default)]
pub struct SimulatedPhotoLibrary {
    selection: Mutex<Option<PhotoData>>,
}

impl SimulatedPhotoLibrary {
    /// A library in which the user cancels every picker.
    pub fn new() -> Self {
        Self::default()
    }

    /// A library in which the user always picks `selection`.
    pub fn with_selection(selection: PhotoData) -> Self {
        Self {
            selection: Mutex::new(Some(selection)),
        }
    }

    pub fn set_selection(&self, selection: Option<PhotoData>) {
        *self.selection.lock() = selection;
    }
}

impl PhotoLibrary for SimulatedPhotoLibrary {
    fn pick_image(&self, _filter: LibraryFilter, on_complete: LibraryPickCallback) {
        on_complete(self.selection.lock().clone());
    }
}

// --- Synthesis helpers ---

/// Deterministic RGBA test pattern; shifts with the sequence number so
/// consecutive frames differ.
fn synth_frame_pixels(width: u32, height: u32, sequence: u64) -> Vec<u8> {
    let mut pixels = Vec::with_capacity((width * height * 4) as usize);
    let shift = (sequence % 256) as u32;
    for y in 0..height {
        for x in 0..width {
            let shade = ((x + y + shift) % 256) as u8;
            pixels.extend_from_slice(&[shade, 255 - shade, shift as u8, 255]);
        }
    }
    pixels
}

fn synth_photo_bytes(width: u32, height: u32) -> Result<Vec<u8>, image::ImageError> {
    let img = image::RgbaImage::from_fn(width, height, |x, y| {
        image::Rgba([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8, 255])
    });
    let mut bytes = Vec::new();
    img.write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)?;
    Ok(bytes)
}

fn spawn_photo_thread(work: impl FnOnce() + Send + 'static) {
    thread::Builder::new()
        .name("simulated-photo".into())
        .spawn(move || {
            // Small delay so completion is observably asynchronous.
            thread::sleep(Duration::from_millis(5));
            work();
        })
        .expect("failed to spawn photo thread");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grant_script_records_authorized_permission() {
        let platform = SimulatedPlatform::new();
        assert_eq!(
            platform.authorization_status(),
            PermissionState::Undetermined
        );

        let answer = Arc::new(Mutex::new(None));
        let sink = Arc::clone(&answer);
        platform.request_access(Box::new(move |granted| *sink.lock() = Some(granted)));

        assert_eq!(*answer.lock(), Some(true));
        assert_eq!(platform.authorization_status(), PermissionState::Authorized);
    }

    #[test]
    fn deferred_prompt_parks_until_resolved() {
        let platform = SimulatedPlatform::new();
        platform.set_permission_script(PermissionScript::Defer);

        let answer = Arc::new(Mutex::new(None));
        let sink = Arc::clone(&answer);
        platform.request_access(Box::new(move |granted| *sink.lock() = Some(granted)));
        assert_eq!(*answer.lock(), None);

        assert!(platform.resolve_pending_access(false));
        assert_eq!(*answer.lock(), Some(false));
        assert_eq!(platform.authorization_status(), PermissionState::Denied);
        assert!(!platform.resolve_pending_access(false));
    }

    #[test]
    fn dropped_prompt_never_answers() {
        let platform = SimulatedPlatform::new();
        platform.set_permission_script(PermissionScript::Defer);

        let answer = Arc::new(Mutex::new(None));
        let sink = Arc::clone(&answer);
        platform.request_access(Box::new(move |granted| *sink.lock() = Some(granted)));

        // The prompt is lost without the user ever answering.
        assert!(platform.drop_pending_access());
        assert!(!platform.drop_pending_access());
        assert_eq!(*answer.lock(), None);
        assert_eq!(
            platform.authorization_status(),
            PermissionState::Undetermined
        );
    }

    #[test]
    fn hold_opens_parks_open_until_released() {
        let platform = SimulatedPlatform::new();
        platform.hold_opens();

        let opener = platform.clone();
        let worker = thread::spawn(move || {
            opener
                .open_device(DevicePosition::Back, &CaptureConfiguration::default())
                .map(|camera| camera.descriptor().id)
        });

        let deadline = Instant::now() + Duration::from_secs(2);
        while platform.parked_opens() == 0 && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(2));
        }
        assert_eq!(platform.parked_opens(), 1);
        assert!(platform.opened_positions().is_empty());

        platform.release_opens();
        assert_eq!(worker.join().unwrap().unwrap(), "sim-back");
        assert_eq!(platform.parked_opens(), 0);
    }

    #[test]
    fn open_device_matches_position() {
        let platform = SimulatedPlatform::new();
        let camera = platform
            .open_device(DevicePosition::Back, &CaptureConfiguration::default())
            .unwrap();
        assert_eq!(camera.descriptor().id, "sim-back");
        assert_eq!(camera.descriptor().position, DevicePosition::Back);

        platform.remove_devices_at(DevicePosition::Front);
        assert_eq!(
            platform
                .open_device(DevicePosition::Front, &CaptureConfiguration::default())
                .err(),
            Some(CaptureError::DeviceUnavailable(DevicePosition::Front))
        );
    }

    #[test]
    fn camera_streams_paced_frames_until_stopped() {
        let platform = SimulatedPlatform::new();
        let mut camera = platform
            .open_device(DevicePosition::Back, &CaptureConfiguration::default())
            .unwrap();

        let sequences: Arc<Mutex<Vec<u64>>> = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&sequences);
        camera
            .start_frames(Arc::new(move |frame| sink.lock().push(frame.sequence)))
            .unwrap();

        let deadline = Instant::now() + Duration::from_secs(2);
        while sequences.lock().len() < 3 && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(5));
        }
        camera.stop_frames().unwrap();

        let seen = sequences.lock().clone();
        assert!(seen.len() >= 3);
        assert!(seen.windows(2).all(|pair| pair[1] == pair[0] + 1));

        // Nothing arrives once stop_frames has returned.
        thread::sleep(Duration::from_millis(80));
        assert_eq!(sequences.lock().len(), seen.len());
    }

    #[test]
    fn strict_zoom_rejects_out_of_range_factors() {
        let platform = SimulatedPlatform::new();
        let mut camera = platform
            .open_device(DevicePosition::Back, &CaptureConfiguration::default())
            .unwrap();

        assert!(matches!(
            camera.set_zoom(0.5),
            Err(CaptureError::ConfigurationFailed(_))
        ));
        camera.set_zoom(2.0).unwrap();
        assert_eq!(platform.zoom_factor("sim-back"), Some(2.0));
    }

    #[test]
    fn torch_resets_when_the_camera_closes() {
        let platform = SimulatedPlatform::new();
        let mut camera = platform
            .open_device(DevicePosition::Back, &CaptureConfiguration::default())
            .unwrap();

        camera.set_torch(true).unwrap();
        assert!(platform.torch_is_on("sim-back"));

        drop(camera);
        assert!(!platform.torch_is_on("sim-back"));
    }

    #[test]
    fn synthesized_photo_decodes_as_png() {
        let platform = SimulatedPlatform::new();
        let mut camera = platform
            .open_device(DevicePosition::Back, &CaptureConfiguration::default())
            .unwrap();

        let (tx, rx) = crossbeam_channel::bounded(1);
        camera
            .capture_photo(Box::new(move |outcome| {
                let _ = tx.send(outcome);
            }))
            .unwrap();

        let photo = rx.recv_timeout(Duration::from_secs(2)).unwrap().unwrap();
        assert_eq!(photo.orientation, Orientation::Up);
        let decoded = image::load_from_memory(&photo.bytes).unwrap();
        assert_eq!(decoded.width(), PHOTO_WIDTH);
        assert_eq!(decoded.height(), PHOTO_HEIGHT);
    }

    #[test]
    fn photo_library_hands_back_the_selection() {
        let library = SimulatedPhotoLibrary::with_selection(PhotoData {
            bytes: vec![1, 2, 3],
            orientation: Orientation::Up,
        });

        let picked = Arc::new(Mutex::new(None));
        let sink = Arc::clone(&picked);
        library.pick_image(LibraryFilter::Images, Box::new(move |data| *sink.lock() = data));
        assert_eq!(picked.lock().as_ref().map(|d| d.bytes.clone()), Some(vec![1, 2, 3]));

        let empty = SimulatedPhotoLibrary::new();
        let cancelled = Arc::new(Mutex::new(Some(PhotoData {
            bytes: vec![9],
            orientation: Orientation::Up,
        })));
        let sink = Arc::clone(&cancelled);
        empty.pick_image(LibraryFilter::Images, Box::new(move |data| *sink.lock() = data));
        assert!(cancelled.lock().is_none());
    }
}
