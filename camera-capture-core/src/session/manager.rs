//! Capture session orchestration.
//!
//! `CaptureSessionManager` owns the full camera lifecycle: permission
//! acquisition, device selection, preview delivery, torch and zoom control,
//! and one-shot photo capture. Session mutations are serialized through a
//! single worker thread fed by a command queue, mirroring the one background
//! camera context platform capture APIs expect:
//!
//! ```text
//! [UI thread] ──commands──▶ [camera-session worker]
//!     │                           │ open / bind / start
//!     │ torch, zoom (direct)      ▼
//!     └────────────────▶ [CameraDevice] ──frames──▶ [PreviewSurface]
//!                              │
//!                              └──photo──▶ [PhotoTicket + CaptureDelegate]
//! ```
//!
//! Callers never block on session work; `state()`, `preview()`, and
//! `diagnostics()` are lock-guarded snapshots. Torch and zoom act on the
//! currently bound device from the calling thread.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;

use crossbeam_channel::{unbounded, Receiver, Sender};
use parking_lot::Mutex;

use crate::models::camera_models::{CameraDescriptor, DevicePosition, SessionDiagnostics};
use crate::models::captured_image::CapturedImage;
use crate::models::config::CaptureConfiguration;
use crate::models::error::CaptureError;
use crate::models::state::{PermissionState, SessionState};
use crate::preview::{PreviewFrame, PreviewSurface};
use crate::session::pending::{CaptureOutcome, PendingCapture, PhotoTicket};
use crate::traits::camera_device::{CameraDevice, FrameCallback, PhotoCallback};
use crate::traits::camera_platform::CameraPlatform;
use crate::traits::capture_delegate::CaptureDelegate;

/// Commands executed serially, in FIFO order, on the session worker.
enum SessionCommand {
    /// Check permission and bring the session up. `prompt_allowed` is true
    /// only for `request_permission_and_start`.
    Activate { prompt_allowed: bool },
    /// Outcome of a platform permission prompt. Responses whose generation
    /// no longer matches are dropped.
    PermissionResolved { granted: bool, generation: u64 },
    /// Rebuild the device binding for the currently selected position.
    Configure,
    Stop,
    Capture { request_id: String },
    Teardown,
}

/// Internal mutable session state, protected by `parking_lot::Mutex`.
struct Inner<D> {
    state: SessionState,
    position: DevicePosition,
    zoom: f32,
    torch_on: bool,
    config: CaptureConfiguration,
    device: Option<D>,
    pending: Option<PendingCapture>,
    delegate: Option<Arc<dyn CaptureDelegate>>,
    diagnostics: SessionDiagnostics,
    prompt_outstanding: bool,
    torn_down: bool,
}

/// State shared between the caller-facing handle, the worker, and device
/// callbacks. Frame sinks and photo completions hold only a `Weak` reference
/// to it, so callbacks arriving after teardown find nothing to invoke.
struct Shared<P: CameraPlatform> {
    platform: P,
    inner: Mutex<Inner<P::Device>>,
    preview: PreviewSurface,
    // Updated from the frame-delivery thread without taking the inner lock.
    frames_delivered: AtomicU64,
    // Bumped on stop/teardown to invalidate outstanding permission prompts.
    generation: AtomicU64,
}

/// Platform-agnostic camera session manager.
///
/// Generic over the platform backend via the [`CameraPlatform`] trait.
/// Owns at most one bound camera device at a time and at most one in-flight
/// photo capture; a second capture request while one is pending is rejected
/// with `CaptureInProgress`.
pub struct CaptureSessionManager<P: CameraPlatform> {
    shared: Arc<Shared<P>>,
    commands: Sender<SessionCommand>,
    worker: Mutex<Option<thread::JoinHandle<()>>>,
}

impl<P: CameraPlatform> CaptureSessionManager<P> {
    /// Create a manager with the default configuration (back camera,
    /// zoom 1.0).
    pub fn new(platform: P) -> Self {
        Self::build(platform, CaptureConfiguration::default())
    }

    /// Create a manager with an explicit configuration.
    pub fn with_configuration(
        platform: P,
        config: CaptureConfiguration,
    ) -> Result<Self, CaptureError> {
        config.validate().map_err(CaptureError::ConfigurationFailed)?;
        Ok(Self::build(platform, config))
    }

    fn build(platform: P, config: CaptureConfiguration) -> Self {
        let (tx, rx) = unbounded();
        let shared = Arc::new(Shared {
            platform,
            inner: Mutex::new(Inner {
                state: SessionState::Uninitialized,
                position: config.position,
                zoom: config.initial_zoom,
                torch_on: false,
                config,
                device: None,
                pending: None,
                delegate: None,
                diagnostics: SessionDiagnostics::default(),
                prompt_outstanding: false,
                torn_down: false,
            }),
            preview: PreviewSurface::new(),
            frames_delivered: AtomicU64::new(0),
            generation: AtomicU64::new(0),
        });

        let worker_shared = Arc::clone(&shared);
        let worker_tx = tx.clone();
        let handle = thread::Builder::new()
            .name("camera-session".into())
            .spawn(move || Self::run_worker(worker_shared, worker_tx, rx))
            .expect("failed to spawn session thread");

        Self {
            shared,
            commands: tx,
            worker: Mutex::new(Some(handle)),
        }
    }

    pub fn set_delegate(&self, delegate: Arc<dyn CaptureDelegate>) {
        self.shared.inner.lock().delegate = Some(delegate);
    }

    pub fn clear_delegate(&self) {
        self.shared.inner.lock().delegate = None;
    }

    pub fn state(&self) -> SessionState {
        self.shared.inner.lock().state
    }

    pub fn position(&self) -> DevicePosition {
        self.shared.inner.lock().position
    }

    /// The session zoom factor, as last applied to a device.
    pub fn zoom(&self) -> f32 {
        self.shared.inner.lock().zoom
    }

    pub fn diagnostics(&self) -> SessionDiagnostics {
        let mut diagnostics = self.shared.inner.lock().diagnostics.clone();
        diagnostics.frames_delivered = self.shared.frames_delivered.load(Ordering::Relaxed);
        diagnostics
    }

    /// A handle onto the live preview slot. Cloneable; reads never block
    /// session work.
    pub fn preview(&self) -> PreviewSurface {
        self.shared.preview.clone()
    }

    /// Current camera permission, read through without prompting.
    pub fn authorization_status(&self) -> PermissionState {
        self.shared.platform.authorization_status()
    }

    /// Cameras the platform can enumerate right now.
    pub fn available_cameras(&self) -> Result<Vec<CameraDescriptor>, CaptureError> {
        self.shared.platform.list_devices()
    }

    /// Check permission and bring the session up, prompting if the user has
    /// never been asked.
    ///
    /// Non-blocking: permission checks, device binding, and session start all
    /// happen on the session worker. Outcomes surface through the delegate.
    /// From `Denied`, re-checks the platform but never re-prompts.
    pub fn request_permission_and_start(&self) -> Result<(), CaptureError> {
        self.send(SessionCommand::Activate {
            prompt_allowed: true,
        })
    }

    /// Bring the session up without ever prompting.
    ///
    /// Idempotent while running. If permission is not currently granted the
    /// attempt fails with `PermissionDenied` via the delegate.
    pub fn start(&self) -> Result<(), CaptureError> {
        self.send(SessionCommand::Activate {
            prompt_allowed: false,
        })
    }

    /// Halt frame delivery, release the device, and return to
    /// `Uninitialized`. Cancels an outstanding permission prompt.
    pub fn stop(&self) -> Result<(), CaptureError> {
        self.shared.generation.fetch_add(1, Ordering::SeqCst);
        self.send(SessionCommand::Stop)
    }

    /// Select a camera position.
    ///
    /// While running, rebuilds the device binding for the new position
    /// (`Running → Reconfiguring → Running`); otherwise the selection takes
    /// effect on the next start. Selecting the already-active position while
    /// running is a no-op.
    pub fn set_position(&self, position: DevicePosition) -> Result<(), CaptureError> {
        self.ensure_live()?;
        let (reconfigure, delegate) = {
            let mut inner = self.shared.inner.lock();
            let changed = inner.position != position;
            inner.position = position;
            if changed && inner.state.is_running() {
                inner.state = SessionState::Reconfiguring;
                (true, inner.delegate.clone())
            } else {
                (false, None)
            }
        };
        if let Some(delegate) = delegate {
            delegate.on_state_changed(SessionState::Reconfiguring);
        }
        if reconfigure {
            self.send(SessionCommand::Configure)?;
        }
        Ok(())
    }

    /// Toggle between the front and back camera.
    ///
    /// While running, performs stop → reconfigure → start as one serial
    /// sequence on the worker; the preview is blanked for the transition so
    /// no stale frame from the old device is observable. Returns the new
    /// selection.
    pub fn flip_position(&self) -> Result<DevicePosition, CaptureError> {
        self.ensure_live()?;
        let (new_position, reconfigure, delegate) = {
            let mut inner = self.shared.inner.lock();
            inner.position = inner.position.toggled();
            inner.diagnostics.flips += 1;
            if inner.state.is_running() {
                inner.state = SessionState::Reconfiguring;
                (inner.position, true, inner.delegate.clone())
            } else {
                (inner.position, false, None)
            }
        };
        if let Some(delegate) = delegate {
            delegate.on_state_changed(SessionState::Reconfiguring);
        }
        if reconfigure {
            log::info!("Flipping camera to {} position", new_position);
            self.send(SessionCommand::Configure)?;
        } else {
            log::debug!(
                "Camera position set to {} (session not running)",
                new_position
            );
        }
        Ok(new_position)
    }

    /// Switch the torch on the currently bound device.
    ///
    /// Fails with `DeviceUnavailable` when no device is bound and with
    /// `TorchUnsupported` on torchless devices; neither touches any state.
    pub fn set_torch(&self, on: bool) -> Result<(), CaptureError> {
        self.ensure_live()?;
        let mut inner = self.shared.inner.lock();
        let position = inner.position;
        let device = inner
            .device
            .as_mut()
            .ok_or(CaptureError::DeviceUnavailable(position))?;
        if !device.has_torch() {
            log::debug!("Torch not supported on {} camera; ignoring", position);
            return Err(CaptureError::TorchUnsupported);
        }
        device.set_torch(on)?;
        inner.torch_on = on;
        log::info!("Torch {}", if on { "enabled" } else { "disabled" });
        Ok(())
    }

    /// Apply a zoom factor to the currently bound device.
    ///
    /// The factor is clamped to the device's supported range; the effective
    /// factor is returned. Non-finite or non-positive factors are rejected.
    pub fn set_zoom(&self, factor: f32) -> Result<f32, CaptureError> {
        self.ensure_live()?;
        if !factor.is_finite() || factor <= 0.0 {
            return Err(CaptureError::ConfigurationFailed(format!(
                "invalid zoom factor: {}",
                factor
            )));
        }
        let mut inner = self.shared.inner.lock();
        let position = inner.position;
        let device = inner
            .device
            .as_mut()
            .ok_or(CaptureError::DeviceUnavailable(position))?;
        let clamped = device.zoom_range().clamp(factor);
        device.set_zoom(clamped)?;
        inner.zoom = clamped;
        if (clamped - factor).abs() > f32::EPSILON {
            log::debug!("Zoom {} clamped to {}", factor, clamped);
        }
        Ok(clamped)
    }

    /// Request a one-shot photo capture.
    ///
    /// Arms the single pending-capture slot and returns a ticket resolved
    /// exactly once with the decoded image or a typed failure. While a
    /// capture is pending a second request fails with `CaptureInProgress`
    /// and leaves the first untouched.
    pub fn capture_photo(&self) -> Result<PhotoTicket, CaptureError> {
        self.ensure_live()?;
        let (request_id, ticket) = {
            let mut inner = self.shared.inner.lock();
            if inner.pending.is_some() {
                return Err(CaptureError::CaptureInProgress);
            }
            if !inner.state.is_running() {
                return Err(CaptureError::ConfigurationFailed(
                    "can only capture while running".into(),
                ));
            }
            let (pending, ticket) = PendingCapture::arm();
            let request_id = pending.request_id().to_string();
            inner.pending = Some(pending);
            inner.diagnostics.captures_started += 1;
            (request_id, ticket)
        };
        log::debug!("Photo capture requested ({})", request_id);
        if let Err(e) = self.send(SessionCommand::Capture {
            request_id: request_id.clone(),
        }) {
            let mut inner = self.shared.inner.lock();
            let matches_request = inner
                .pending
                .as_ref()
                .map(|p| p.request_id() == request_id)
                .unwrap_or(false);
            if matches_request {
                inner.pending = None;
            }
            return Err(e);
        }
        Ok(ticket)
    }

    /// Tear the session down: detach the delegate, invalidate outstanding
    /// permission continuations, fail any in-flight capture, release the
    /// device, and return to `Uninitialized`.
    ///
    /// Idempotent. Joins the session worker, so it must not be called from
    /// inside a delegate callback. Also runs on drop.
    pub fn teardown(&self) {
        {
            let mut inner = self.shared.inner.lock();
            inner.delegate = None;
            inner.torn_down = true;
        }
        self.shared.generation.fetch_add(1, Ordering::SeqCst);
        let _ = self.commands.send(SessionCommand::Teardown);
        if let Some(handle) = self.worker.lock().take() {
            let _ = handle.join();
        }
        self.shared.inner.lock().state = SessionState::Uninitialized;
    }

    // --- Internal helpers (calling side) ---

    fn ensure_live(&self) -> Result<(), CaptureError> {
        if self.shared.inner.lock().torn_down {
            Err(Self::torn_down_error())
        } else {
            Ok(())
        }
    }

    fn send(&self, command: SessionCommand) -> Result<(), CaptureError> {
        self.ensure_live()?;
        self.commands
            .send(command)
            .map_err(|_| Self::torn_down_error())
    }

    fn torn_down_error() -> CaptureError {
        CaptureError::ConfigurationFailed("session torn down".into())
    }

    // --- Worker ---

    fn run_worker(
        shared: Arc<Shared<P>>,
        commands: Sender<SessionCommand>,
        rx: Receiver<SessionCommand>,
    ) {
        for command in rx.iter() {
            match command {
                SessionCommand::Activate { prompt_allowed } => {
                    Self::handle_activate(&shared, &commands, prompt_allowed);
                }
                SessionCommand::PermissionResolved {
                    granted,
                    generation,
                } => {
                    Self::handle_permission_resolved(&shared, granted, generation);
                }
                SessionCommand::Configure => Self::configure_and_start(&shared),
                SessionCommand::Stop => Self::handle_stop(&shared),
                SessionCommand::Capture { request_id } => {
                    Self::handle_capture(&shared, request_id);
                }
                SessionCommand::Teardown => {
                    Self::handle_teardown(&shared);
                    break;
                }
            }
        }
        log::debug!("Session worker exited");
    }

    fn handle_activate(
        shared: &Arc<Shared<P>>,
        commands: &Sender<SessionCommand>,
        prompt_allowed: bool,
    ) {
        {
            let inner = shared.inner.lock();
            if inner.state.is_running() || inner.state.is_transitional() {
                return; // already up or coming up
            }
            if inner.prompt_outstanding {
                return; // never two prompts at once
            }
        }

        match shared.platform.authorization_status() {
            PermissionState::Authorized => Self::configure_and_start(shared),
            PermissionState::Denied => {
                log::warn!("Camera permission denied");
                Self::set_state(shared, SessionState::Denied);
                Self::notify_error(shared, &CaptureError::PermissionDenied);
            }
            PermissionState::Undetermined => {
                if !prompt_allowed {
                    log::debug!("Not authorized and prompting not allowed");
                    Self::notify_error(shared, &CaptureError::PermissionDenied);
                    return;
                }
                {
                    let mut inner = shared.inner.lock();
                    inner.prompt_outstanding = true;
                    inner.diagnostics.permission_prompts += 1;
                }
                Self::set_state(shared, SessionState::PermissionPending);
                log::info!("Requesting camera permission");
                let generation = shared.generation.load(Ordering::SeqCst);
                let tx = commands.clone();
                shared.platform.request_access(Box::new(move |granted| {
                    // The session may be gone by the time the user answers;
                    // a send onto a closed queue is dropped silently.
                    let _ = tx.send(SessionCommand::PermissionResolved {
                        granted,
                        generation,
                    });
                }));
            }
        }
    }

    fn handle_permission_resolved(shared: &Arc<Shared<P>>, granted: bool, generation: u64) {
        if generation != shared.generation.load(Ordering::SeqCst) {
            log::debug!("Dropping stale permission response");
            return;
        }
        {
            let mut inner = shared.inner.lock();
            if !inner.prompt_outstanding {
                return;
            }
            inner.prompt_outstanding = false;
        }
        if granted {
            log::info!("Camera permission granted");
            Self::configure_and_start(shared);
        } else {
            log::warn!("Camera permission denied");
            Self::set_state(shared, SessionState::Denied);
            Self::notify_error(shared, &CaptureError::PermissionDenied);
        }
    }

    /// Tear down any existing binding and bring up the camera for the
    /// currently selected position. All-or-nothing: on failure the session
    /// is left at `Uninitialized`, never partially configured. If the
    /// selection changes while a device is being bound, the rebuild runs
    /// again for the new selection.
    fn configure_and_start(shared: &Arc<Shared<P>>) {
        {
            let inner = shared.inner.lock();
            // A flip has already marked Reconfiguring; keep it for the rebuild.
            if !matches!(inner.state, SessionState::Reconfiguring) {
                drop(inner);
                Self::set_state(shared, SessionState::Configuring);
            }
        }
        Self::resolve_pending(
            shared,
            CaptureError::CaptureFailed("device changed during capture".into()),
        );
        Self::release_device(shared);

        loop {
            let (position, zoom, config) = {
                let mut inner = shared.inner.lock();
                inner.torch_on = false;
                (inner.position, inner.zoom, inner.config.clone())
            };

            let mut device = match shared.platform.open_device(position, &config) {
                Ok(device) => device,
                Err(e) => {
                    log::error!("Failed to open {} camera: {}", position, e);
                    Self::set_state(shared, SessionState::Uninitialized);
                    Self::notify_error(shared, &e);
                    return;
                }
            };

            let applied_zoom = device.zoom_range().clamp(zoom);
            let bind = device
                .set_zoom(applied_zoom)
                .and_then(|_| device.start_frames(Self::frame_sink(shared)));
            if let Err(e) = bind {
                log::error!("Failed to bind {} camera: {}", position, e);
                drop(device);
                shared.preview.clear();
                Self::set_state(shared, SessionState::Uninitialized);
                Self::notify_error(shared, &e);
                return;
            }
            if (applied_zoom - zoom).abs() > f32::EPSILON {
                log::debug!(
                    "Session zoom {} clamped to {} for {} camera",
                    zoom,
                    applied_zoom,
                    position
                );
            }

            // The commit and the selection re-check share one critical
            // section; a flip landing after this sees Running and queues its
            // own rebuild.
            let (stale, delegate) = {
                let mut inner = shared.inner.lock();
                if inner.position != position {
                    (Some(device), None)
                } else {
                    inner.zoom = applied_zoom;
                    inner.device = Some(device);
                    inner.state = SessionState::Running;
                    (None, inner.delegate.clone())
                }
            };

            match stale {
                Some(mut device) => {
                    if let Err(e) = device.stop_frames() {
                        log::warn!("Failed to stop frame delivery cleanly: {}", e);
                    }
                    drop(device);
                    shared.preview.clear();
                    log::info!("Camera selection changed while configuring; rebuilding");
                }
                None => {
                    if let Some(delegate) = delegate {
                        delegate.on_state_changed(SessionState::Running);
                    }
                    log::info!("Capture session running on {} camera", position);
                    return;
                }
            }
        }
    }

    fn handle_stop(shared: &Arc<Shared<P>>) {
        Self::resolve_pending(
            shared,
            CaptureError::CaptureFailed("session stopped during capture".into()),
        );
        Self::release_device(shared);
        {
            let mut inner = shared.inner.lock();
            inner.prompt_outstanding = false;
            inner.torch_on = false;
        }
        Self::set_state(shared, SessionState::Uninitialized);
        log::info!("Capture session stopped");
    }

    fn handle_capture(shared: &Arc<Shared<P>>, request_id: String) {
        let callback = Self::photo_completion(shared, request_id.clone());
        let armed = {
            let mut inner = shared.inner.lock();
            let valid = inner.state.is_running()
                && inner
                    .pending
                    .as_ref()
                    .map(|p| p.request_id() == request_id)
                    .unwrap_or(false);
            if !valid {
                Ok(false)
            } else {
                match inner.device.as_mut() {
                    Some(device) => device.capture_photo(callback).map(|_| true),
                    None => Ok(false),
                }
            }
        };
        match armed {
            Ok(true) => {}
            Ok(false) => Self::finish_capture(
                shared,
                &request_id,
                Err(CaptureError::CaptureFailed("session is not running".into())),
            ),
            Err(e) => Self::finish_capture(shared, &request_id, Err(e)),
        }
    }

    fn handle_teardown(shared: &Arc<Shared<P>>) {
        Self::resolve_pending(
            shared,
            CaptureError::CaptureFailed("session torn down during capture".into()),
        );
        Self::release_device(shared);
        {
            let mut inner = shared.inner.lock();
            inner.prompt_outstanding = false;
            inner.torch_on = false;
            inner.torn_down = true;
            // The delegate was detached before the command was queued;
            // nothing is notified past this point.
            inner.state = SessionState::Uninitialized;
        }
        log::info!("Capture session torn down");
    }

    /// Take the bound device out of the session and stop it without holding
    /// the state lock; frame delivery joins inside `stop_frames`.
    fn release_device(shared: &Arc<Shared<P>>) {
        let device = shared.inner.lock().device.take();
        if let Some(mut device) = device {
            if let Err(e) = device.stop_frames() {
                log::warn!("Failed to stop frame delivery cleanly: {}", e);
            }
        }
        shared.preview.clear();
    }

    fn resolve_pending(shared: &Arc<Shared<P>>, error: CaptureError) {
        let request_id = shared
            .inner
            .lock()
            .pending
            .as_ref()
            .map(|p| p.request_id().to_string());
        if let Some(request_id) = request_id {
            Self::finish_capture(shared, &request_id, Err(error));
        }
    }

    fn frame_sink(shared: &Arc<Shared<P>>) -> FrameCallback {
        let weak = Arc::downgrade(shared);
        Arc::new(move |frame: PreviewFrame| {
            let Some(shared) = weak.upgrade() else {
                return;
            };
            shared.frames_delivered.fetch_add(1, Ordering::Relaxed);
            shared.preview.publish(frame);
        })
    }

    fn photo_completion(shared: &Arc<Shared<P>>, request_id: String) -> PhotoCallback {
        let weak = Arc::downgrade(shared);
        Box::new(move |outcome| {
            let Some(shared) = weak.upgrade() else {
                return;
            };
            // Decode off the state lock; pipelines hand back encoded bytes.
            let outcome = outcome.and_then(CapturedImage::decode);
            Self::finish_capture(&shared, &request_id, outcome);
        })
    }

    /// Resolve the pending slot for `request_id` exactly once. Completions
    /// that no longer match the armed request are dropped.
    fn finish_capture(shared: &Arc<Shared<P>>, request_id: &str, outcome: CaptureOutcome) {
        // Stamp the correlation id so the delivered image matches the ticket.
        let outcome = outcome.map(|mut image| {
            image.id = request_id.to_string();
            image
        });
        let (pending, delegate) = {
            let mut inner = shared.inner.lock();
            let matches_request = inner
                .pending
                .as_ref()
                .map(|p| p.request_id() == request_id)
                .unwrap_or(false);
            if !matches_request {
                log::debug!("Dropping stale capture completion ({})", request_id);
                return;
            }
            match &outcome {
                Ok(_) => inner.diagnostics.captures_completed += 1,
                Err(_) => inner.diagnostics.captures_failed += 1,
            }
            (inner.pending.take(), inner.delegate.clone())
        };
        let Some(pending) = pending else {
            return;
        };
        match &outcome {
            Ok(image) => {
                log::info!("Captured {}x{} photo", image.width, image.height);
                if let Some(delegate) = &delegate {
                    delegate.on_photo_captured(image);
                }
            }
            Err(e) => {
                log::error!("Photo capture failed: {}", e);
                if let Some(delegate) = &delegate {
                    delegate.on_error(e);
                }
            }
        }
        pending.resolve(outcome);
    }

    fn set_state(shared: &Arc<Shared<P>>, new_state: SessionState) {
        let delegate = {
            let mut inner = shared.inner.lock();
            if inner.state == new_state {
                return;
            }
            inner.state = new_state;
            inner.delegate.clone()
        };
        if let Some(delegate) = delegate {
            delegate.on_state_changed(new_state);
        }
    }

    fn notify_error(shared: &Arc<Shared<P>>, error: &CaptureError) {
        let delegate = shared.inner.lock().delegate.clone();
        if let Some(delegate) = delegate {
            delegate.on_error(error);
        }
    }
}

impl<P: CameraPlatform> Drop for CaptureSessionManager<P> {
    fn drop(&mut self) {
        self.teardown();
    }
}
