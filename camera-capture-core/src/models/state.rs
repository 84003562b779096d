/// Capture session state machine.
///
/// State transitions:
/// ```text
/// uninitialized → permission-pending → (denied | configuring → running)
/// running → reconfiguring → running      (device flip / reselection)
/// any → uninitialized                    (stop / teardown)
/// ```
///
/// `Denied` is terminal until the OS-level permission setting changes
/// out-of-band; the session re-checks on the next start attempt but never
/// re-prompts from `Denied`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Uninitialized,
    PermissionPending,
    Denied,
    Configuring,
    Running,
    Reconfiguring,
}

impl SessionState {
    pub fn is_uninitialized(&self) -> bool {
        matches!(self, Self::Uninitialized)
    }

    pub fn is_running(&self) -> bool {
        matches!(self, Self::Running)
    }

    pub fn is_denied(&self) -> bool {
        matches!(self, Self::Denied)
    }

    /// Whether a session transition is currently in flight.
    pub fn is_transitional(&self) -> bool {
        matches!(
            self,
            Self::PermissionPending | Self::Configuring | Self::Reconfiguring
        )
    }
}

/// Camera permission as reported by the platform.
///
/// Moves from `Undetermined` to `Authorized` or `Denied` exactly once per
/// OS-level prompt; subsequent checks are idempotent reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionState {
    /// The user has never been asked.
    Undetermined,
    Authorized,
    Denied,
}
