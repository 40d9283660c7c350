//! Session Module
//!
//! Per-connection state machine: greeting countdown, command dispatch and
//! classification of every received line.
//!
//! ## Line Handling (Ready state)
//! ```text
//! error ...     ──▶ resolve executing command, free the slot
//! notify<ev> .. ──▶ notification, queue untouched
//! other         ──▶ data for the executing command (ignored when idle)
//! ```
//!
//! A data line overwrites whatever the executing command captured before, so
//! only the last one reaches the callback. Blank lines are the exception:
//! they are ignored and never replace a captured response.
//!
//! Resolving a command does not dispatch the next one. The caller runs the
//! completion callback first and then calls [`Session::dispatch`], so a
//! callback can still clear or inspect the pending queue.
//!
//! ## Concurrency
//! A session is driven from one place at a time (the client keeps it behind
//! a mutex). It never runs user callbacks itself: completions and
//! notifications are returned as an [`Outcome`] so the caller can run them
//! after releasing its lock.

mod queue;
mod state;

use std::io;

pub use queue::{CommandQueue, Completion, CompletionCallback, QueuedCommand, Resolved};
pub use state::SessionState;

use crate::error::{QueryError, Result};
use crate::network::Transport;
use crate::protocol::{classify, parse_response, Command, Line, Response};

/// A notification pushed by the server
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    /// Event name (`notifyclientmoved` → `clientmoved`)
    pub name: String,

    /// Parsed payload
    pub payload: Response,
}

/// What a received line did
#[derive(Debug)]
pub enum Outcome {
    /// Greeting line consumed, still handshaking
    Greeting,

    /// Last greeting line consumed, the session just became ready
    Ready,

    /// Data line captured by the executing command
    Captured,

    /// The executing command was terminated
    Resolved(Resolved),

    /// Server-pushed event
    Notification(Notification),

    /// Line had no effect
    Ignored,
}

/// State of one connection
pub struct Session<T> {
    state: SessionState,
    queue: CommandQueue,
    transport: T,
    fault: Option<io::Error>,
}

impl<T: Transport> Session<T> {
    /// Create a session that discards `greeting_lines` lines before it is ready
    pub fn new(transport: T, greeting_lines: u32) -> Self {
        Self {
            state: SessionState::new(greeting_lines),
            queue: CommandQueue::new(),
            transport,
            fault: None,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    // =========================================================================
    // Queue
    // =========================================================================

    /// Append a command; dispatch it right away if the session is idle
    pub fn enqueue(&mut self, command: QueuedCommand) -> Result<()> {
        match self.state {
            SessionState::Closed => return Err(QueryError::Closed),
            SessionState::Faulted => return Err(QueryError::Faulted),
            _ => {}
        }

        tracing::trace!("Queued: {}", command.command().text());
        self.queue.push(command);
        if self.state.is_ready() && !self.queue.is_executing() {
            self.dispatch();
        }
        Ok(())
    }

    /// Write the next pending command to the transport.
    ///
    /// No-op unless the session is ready, nothing is executing and something
    /// is pending. Returns whether a command was written. A write failure
    /// faults the session; the error is kept for [`Session::take_fault`].
    pub fn dispatch(&mut self) -> bool {
        if !self.state.is_ready() {
            return false;
        }
        let Some(next) = self.queue.begin_next() else {
            return false;
        };

        let mut bytes = Vec::with_capacity(next.command().text().len() + 1);
        bytes.extend_from_slice(next.command().text().as_bytes());
        bytes.push(b'\n');
        tracing::debug!("Dispatching: {}", next.command().name());

        match self.transport.write(&bytes) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("Dispatch write failed: {}", e);
                self.fault(e);
                false
            }
        }
    }

    pub fn pending(&self) -> Vec<Command> {
        self.queue.pending()
    }

    pub fn clear_pending(&mut self) -> Vec<Command> {
        self.queue.clear_pending()
    }

    /// The command awaiting its terminator, if any
    pub fn executing(&self) -> Option<&QueuedCommand> {
        self.queue.executing()
    }

    // =========================================================================
    // Incoming Lines
    // =========================================================================

    /// Process one received line
    pub fn receive_line(&mut self, line: &str) -> Outcome {
        tracing::trace!("Received: {}", line.trim_end());

        match self.state {
            SessionState::Handshaking { remaining } => self.consume_greeting(remaining),
            SessionState::Ready => self.receive_ready(line),
            SessionState::Closed | SessionState::Faulted => {
                tracing::debug!("Line received after session ended, ignoring");
                Outcome::Ignored
            }
        }
    }

    fn consume_greeting(&mut self, remaining: u32) -> Outcome {
        let remaining = remaining.saturating_sub(1);
        if remaining > 0 {
            self.state = SessionState::Handshaking { remaining };
            return Outcome::Greeting;
        }

        tracing::debug!("Greeting consumed, session ready");
        self.state = SessionState::Ready;
        self.dispatch();
        Outcome::Ready
    }

    fn receive_ready(&mut self, line: &str) -> Outcome {
        match classify(line) {
            Line::Terminator(payload) => self.terminate(payload),
            Line::Notification { event, payload } => Outcome::Notification(Notification {
                name: event.to_string(),
                payload: parse_response(payload),
            }),
            Line::Data("") => Outcome::Ignored,
            Line::Data(data) => match self.queue.executing_mut() {
                Some(executing) => {
                    // Overwrites: only the last data line before the terminator survives
                    executing.capture(data, parse_response(data));
                    Outcome::Captured
                }
                None => {
                    tracing::debug!("Data line with no executing command, ignoring");
                    Outcome::Ignored
                }
            },
        }
    }

    fn terminate(&mut self, payload: &str) -> Outcome {
        let Some(executing) = self.queue.finish() else {
            tracing::warn!("Terminator with no executing command, dropping: error {}", payload);
            return Outcome::Ignored;
        };

        // The terminator carries a single record; take the first if there are more
        let record = parse_response(payload)
            .into_records()
            .into_iter()
            .next()
            .unwrap_or_default();
        let resolved = executing.resolve(record);
        match &resolved.completion().error {
            Some(error) => tracing::debug!(
                "Command {} failed: {:?}",
                resolved.completion().command.name(),
                error
            ),
            None => tracing::debug!("Command {} completed", resolved.completion().command.name()),
        }

        Outcome::Resolved(resolved)
    }

    // =========================================================================
    // Transport Events
    // =========================================================================

    /// Transport closed. Returns the commands that will never run; the
    /// executing one (if any) is dropped without its callback.
    pub fn close(&mut self) -> Vec<Command> {
        if !self.state.is_terminal() {
            self.state = SessionState::Closed;
        }
        if let Some(abandoned) = self.queue.finish() {
            tracing::debug!("Abandoning executing command {}", abandoned.command().name());
        }
        self.queue.clear_pending()
    }

    /// Transport failed
    pub fn fault(&mut self, error: io::Error) {
        self.state = SessionState::Faulted;
        if self.fault.is_none() {
            self.fault = Some(error);
        }
    }

    /// Take the error that faulted the session, if it has not been taken yet
    pub fn take_fault(&mut self) -> Option<io::Error> {
        self.fault.take()
    }
}

impl<T> std::fmt::Debug for Session<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("state", &self.state)
            .field("queue", &self.queue)
            .finish()
    }
}
