//! Command queue
//!
//! FIFO of pending commands plus a single executing slot.

use std::collections::VecDeque;
use std::fmt;

use crate::error::ServerError;
use crate::protocol::{Command, Record, Response, Value};

/// Callback invoked once a command is terminated by the server
pub type CompletionCallback = Box<dyn FnOnce(Completion) + Send + 'static>;

/// The result of one command, handed to its completion callback
#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    /// The command that completed
    pub command: Command,

    /// Error record, present only when the server reported a non-zero id
    pub error: Option<Record>,

    /// Parse of the last data line received for this command
    pub response: Response,

    /// Last data line received for this command, verbatim
    pub raw_response: Option<String>,
}

impl Completion {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    /// Typed view of the error record
    pub fn server_error(&self) -> Option<ServerError> {
        self.error.clone().map(ServerError::from_record)
    }

    pub fn into_result(self) -> std::result::Result<Response, ServerError> {
        match self.error {
            Some(record) => Err(ServerError::from_record(record)),
            None => Ok(self.response),
        }
    }
}

/// A command owned by the queue, with the state captured while it executes
pub struct QueuedCommand {
    command: Command,
    callback: Option<CompletionCallback>,
    response: Response,
    raw_response: Option<String>,
}

impl QueuedCommand {
    pub fn new(command: Command, callback: Option<CompletionCallback>) -> Self {
        Self {
            command,
            callback,
            response: Response::Empty,
            raw_response: None,
        }
    }

    pub fn command(&self) -> &Command {
        &self.command
    }

    pub fn response(&self) -> &Response {
        &self.response
    }

    pub fn raw_response(&self) -> Option<&str> {
        self.raw_response.as_deref()
    }

    /// Record a data line. Only the most recent line is kept.
    pub fn capture(&mut self, raw: &str, response: Response) {
        self.response = response;
        self.raw_response = Some(raw.to_string());
    }

    /// Terminate with the parsed `error` record
    pub fn resolve(self, record: Record) -> Resolved {
        let error = if is_success(&record) { None } else { Some(record) };
        Resolved {
            completion: Completion {
                command: self.command,
                error,
                response: self.response,
                raw_response: self.raw_response,
            },
            callback: self.callback,
        }
    }
}

impl fmt::Debug for QueuedCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueuedCommand")
            .field("command", &self.command)
            .field("has_callback", &self.callback.is_some())
            .field("response", &self.response)
            .field("raw_response", &self.raw_response)
            .finish()
    }
}

/// `id=0`, whether or not it was coerced to an integer
fn is_success(record: &Record) -> bool {
    match record.get("id") {
        Some(Value::Int(0)) => true,
        Some(Value::Str(s)) => s == "0",
        _ => false,
    }
}

/// A terminated command whose callback has not run yet
pub struct Resolved {
    completion: Completion,
    callback: Option<CompletionCallback>,
}

impl Resolved {
    pub fn completion(&self) -> &Completion {
        &self.completion
    }

    /// Run the completion callback, if any. Returns whether one ran.
    pub fn run(self) -> bool {
        match self.callback {
            Some(callback) => {
                callback(self.completion);
                true
            }
            None => false,
        }
    }
}

impl fmt::Debug for Resolved {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resolved")
            .field("completion", &self.completion)
            .field("has_callback", &self.callback.is_some())
            .finish()
    }
}

/// Pending commands and the single executing slot
#[derive(Debug, Default)]
pub struct CommandQueue {
    pending: VecDeque<QueuedCommand>,
    executing: Option<QueuedCommand>,
}

impl CommandQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append to the pending sequence
    pub fn push(&mut self, command: QueuedCommand) {
        self.pending.push_back(command);
    }

    /// Move the head of the pending sequence into the executing slot.
    ///
    /// Returns `None` (and changes nothing) while a command is executing or
    /// when nothing is pending.
    pub fn begin_next(&mut self) -> Option<&QueuedCommand> {
        if self.executing.is_some() {
            return None;
        }
        let next = self.pending.pop_front()?;
        self.executing = Some(next);
        self.executing.as_ref()
    }

    pub fn executing(&self) -> Option<&QueuedCommand> {
        self.executing.as_ref()
    }

    pub(crate) fn executing_mut(&mut self) -> Option<&mut QueuedCommand> {
        self.executing.as_mut()
    }

    pub fn is_executing(&self) -> bool {
        self.executing.is_some()
    }

    /// Empty the executing slot
    pub fn finish(&mut self) -> Option<QueuedCommand> {
        self.executing.take()
    }

    /// Snapshot of the pending commands (excludes the executing one)
    pub fn pending(&self) -> Vec<Command> {
        self.pending.iter().map(|q| q.command.clone()).collect()
    }

    /// Remove every pending command. Their callbacks are dropped unrun.
    pub fn clear_pending(&mut self) -> Vec<Command> {
        self.pending.drain(..).map(|q| q.command).collect()
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }
}
