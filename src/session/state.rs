//! Session lifecycle state

/// Where a connection is in its lifecycle
///
/// ```text
/// Handshaking(n) ──line──▶ Handshaking(n-1) ── ... ──▶ Ready
///        │                                               │
///        └──────────────┬────────────────────────────────┘
///                       ▼
///             Closed (transport closed) / Faulted (transport error)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Greeting lines still to be discarded
    Handshaking { remaining: u32 },

    /// Normal request/response exchange
    Ready,

    /// Transport closed
    Closed,

    /// Transport reported an error
    Faulted,
}

impl SessionState {
    /// Initial state for a connection that sends `greeting_lines` lines first
    pub fn new(greeting_lines: u32) -> Self {
        if greeting_lines == 0 {
            SessionState::Ready
        } else {
            SessionState::Handshaking {
                remaining: greeting_lines,
            }
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, SessionState::Ready)
    }

    /// Closed or faulted; nothing more will be dispatched
    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionState::Closed | SessionState::Faulted)
    }
}
