//! Single-slot pending photo capture.
//!
//! A capture request arms one [`PendingCapture`]/[`PhotoTicket`] pair. The
//! session holds the pending side and resolves it exactly once; the caller
//! holds the ticket. While a slot is armed, a second capture request is
//! rejected with `CaptureInProgress` — requests are never queued and a
//! pending continuation is never overwritten.

use std::time::Duration;

use crossbeam_channel::{bounded, Receiver, Sender};

use crate::models::captured_image::CapturedImage;
use crate::models::error::CaptureError;

/// Outcome of one photo capture request.
pub type CaptureOutcome = Result<CapturedImage, CaptureError>;

/// One-shot handle for an in-flight photo capture.
///
/// Resolved exactly once by the session, possibly from a device pipeline
/// thread.
pub struct PhotoTicket {
    request_id: String,
    rx: Receiver<CaptureOutcome>,
}

impl PhotoTicket {
    /// Correlation id shared with the eventual [`CapturedImage`].
    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    /// Block until the capture resolves.
    pub fn wait(self) -> CaptureOutcome {
        match self.rx.recv() {
            Ok(outcome) => outcome,
            // Resolver dropped without sending: the session died mid-capture.
            Err(_) => Err(CaptureError::CaptureFailed("capture abandoned".into())),
        }
    }

    /// Block until the capture resolves or `timeout` elapses.
    pub fn wait_timeout(self, timeout: Duration) -> Option<CaptureOutcome> {
        match self.rx.recv_timeout(timeout) {
            Ok(outcome) => Some(outcome),
            Err(crossbeam_channel::RecvTimeoutError::Timeout) => None,
            Err(crossbeam_channel::RecvTimeoutError::Disconnected) => {
                Some(Err(CaptureError::CaptureFailed("capture abandoned".into())))
            }
        }
    }

    /// Non-blocking poll. Returns the outcome at most once.
    pub fn try_wait(&self) -> Option<CaptureOutcome> {
        self.rx.try_recv().ok()
    }
}

/// The armed side of a [`PhotoTicket`].
pub(crate) struct PendingCapture {
    request_id: String,
    tx: Sender<CaptureOutcome>,
}

impl PendingCapture {
    /// Create a linked slot/ticket pair with a fresh request id.
    pub(crate) fn arm() -> (Self, PhotoTicket) {
        let request_id = uuid::Uuid::new_v4().to_string();
        let (tx, rx) = bounded(1);
        (
            Self {
                request_id: request_id.clone(),
                tx,
            },
            PhotoTicket { request_id, rx },
        )
    }

    pub(crate) fn request_id(&self) -> &str {
        &self.request_id
    }

    /// Resolve the ticket. Resolution after the ticket is gone is dropped
    /// silently.
    pub(crate) fn resolve(self, outcome: CaptureOutcome) {
        let _ = self.tx.send(outcome);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::camera_models::Orientation;
    use std::sync::Arc;

    fn image(id: &str) -> CapturedImage {
        CapturedImage {
            id: id.into(),
            width: 2,
            height: 2,
            pixels: Arc::from(vec![0u8; 16]),
            orientation: Orientation::Up,
            captured_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn resolve_delivers_to_waiting_ticket() {
        let (pending, ticket) = PendingCapture::arm();
        assert_eq!(pending.request_id(), ticket.request_id());

        pending.resolve(Ok(image("img-1")));
        let outcome = ticket.wait();
        assert_eq!(outcome.unwrap().id, "img-1");
    }

    #[test]
    fn dropped_pending_reports_abandoned_capture() {
        let (pending, ticket) = PendingCapture::arm();
        drop(pending);

        assert_eq!(
            ticket.wait(),
            Err(CaptureError::CaptureFailed("capture abandoned".into()))
        );
    }

    #[test]
    fn try_wait_polls_without_blocking() {
        let (pending, ticket) = PendingCapture::arm();
        assert!(ticket.try_wait().is_none());

        pending.resolve(Err(CaptureError::CaptureFailed("boom".into())));
        assert!(matches!(
            ticket.try_wait(),
            Some(Err(CaptureError::CaptureFailed(_)))
        ));

        // The outcome is delivered at most once.
        assert!(ticket.try_wait().is_none());
    }

    #[test]
    fn resolve_after_ticket_dropped_is_silent() {
        let (pending, ticket) = PendingCapture::arm();
        drop(ticket);

        pending.resolve(Ok(image("late")));
    }

    #[test]
    fn wait_timeout_times_out_on_unresolved_capture() {
        let (_pending, ticket) = PendingCapture::arm();
        assert!(ticket.wait_timeout(Duration::from_millis(10)).is_none());
    }
}
