/// Lifecycle of a terminal session.
///
/// `Disconnected → Connected → Closed`, or straight to `Closed` for a session
/// that never opened. Nothing leaves `Closed`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SessionState {
    #[default]
    Disconnected,
    Connected,
    Closed,
}

impl SessionState {
    pub fn can_transition_to(self, next: SessionState) -> bool {
        matches!(
            (self, next),
            (SessionState::Disconnected, SessionState::Connected)
                | (SessionState::Disconnected, SessionState::Closed)
                | (SessionState::Connected, SessionState::Closed)
        )
    }

    pub fn is_connected(self) -> bool {
        self == SessionState::Connected
    }
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionState::Disconnected => write!(f, "Disconnected"),
            SessionState::Connected => write!(f, "Connected"),
            SessionState::Closed => write!(f, "Closed"),
        }
    }
}

/// Counters kept for the lifetime of a session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionStatistics {
    pub bytes_received: u64,
    pub lines_logged: u64,
}
