//! Client facade
//!
//! [`Client`] composes a [`Session`] with an [`EventBus`]. Whatever reads
//! the connection feeds it through [`Client::handle_line`],
//! [`Client::handle_close`] and [`Client::handle_error`]; callers send
//! commands from any thread.
//!
//! ```ignore
//! let client = Client::new(stream);
//! client.on_notification("cliententerview", |n| println!("{:?}", n.payload));
//! client.send(
//!     "clientlist",
//!     SendOptions::new()
//!         .option("uid")
//!         .on_complete(|done| println!("{:?}", done.into_result())),
//! )?;
//! ```

use std::io;

use crossbeam::channel::{self, Receiver};
use parking_lot::Mutex;

use crate::config::{Config, DEFAULT_GREETING_LINES};
use crate::error::{QueryError, Result};
use crate::events::{Event, EventBus, SubscriptionId, Topic};
use crate::network::Transport;
use crate::protocol::{Command, ParamValue};
use crate::session::{
    Completion, CompletionCallback, Notification, Outcome, QueuedCommand, Session, SessionState,
};

/// Everything about a command besides its name
#[derive(Default)]
pub struct SendOptions {
    options: Vec<String>,
    parameters: Vec<(String, ParamValue)>,
    on_complete: Option<CompletionCallback>,
}

impl SendOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a flag option (written as ` -<option>`)
    pub fn option(mut self, option: impl Into<String>) -> Self {
        self.options.push(option.into());
        self
    }

    /// Add a `key=value` parameter
    pub fn param(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.parameters.push((key.into(), value.into()));
        self
    }

    /// Add a list parameter, written as `key=a|key=b|...`
    pub fn param_list<I, V>(mut self, key: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: ToString,
    {
        let values = values.into_iter().map(|v| v.to_string()).collect();
        self.parameters.push((key.into(), ParamValue::List(values)));
        self
    }

    /// Callback run when the server terminates the command
    pub fn on_complete<F>(mut self, callback: F) -> Self
    where
        F: FnOnce(Completion) + Send + 'static,
    {
        self.on_complete = Some(Box::new(callback));
        self
    }
}

impl std::fmt::Debug for SendOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SendOptions")
            .field("options", &self.options)
            .field("parameters", &self.parameters)
            .field("has_callback", &self.on_complete.is_some())
            .finish()
    }
}

/// A ServerQuery client over one connection
pub struct Client<T> {
    session: Mutex<Session<T>>,
    events: EventBus,
}

impl<T: Transport> Client<T> {
    /// Client over `transport`, expecting the standard two-line greeting
    pub fn new(transport: T) -> Self {
        Self::with_greeting_lines(transport, DEFAULT_GREETING_LINES)
    }

    pub fn with_greeting_lines(transport: T, greeting_lines: u32) -> Self {
        Self {
            session: Mutex::new(Session::new(transport, greeting_lines)),
            events: EventBus::new(),
        }
    }

    pub fn from_config(transport: T, config: &Config) -> Self {
        Self::with_greeting_lines(transport, config.greeting_lines)
    }

    // =========================================================================
    // Commands
    // =========================================================================

    /// Encode and queue a command. Returns as soon as it is queued; the
    /// result arrives through the completion callback.
    ///
    /// Fails only when the session has already closed or faulted.
    pub fn send(&self, name: &str, options: SendOptions) -> Result<()> {
        let SendOptions {
            options,
            parameters,
            on_complete,
        } = options;
        let command = Command::new(name, options, parameters);

        let (result, fault) = {
            let mut session = self.session.lock();
            let result = session.enqueue(QueuedCommand::new(command, on_complete));
            (result, session.take_fault())
        };
        self.publish_fault(fault);
        result
    }

    /// Like [`Client::send`], but delivers the completion on a channel.
    ///
    /// The receiver disconnects without a message if the command is
    /// cleared or abandoned when the connection closes.
    pub fn request(&self, name: &str, options: SendOptions) -> Result<Receiver<Completion>> {
        let (tx, rx) = channel::bounded(1);
        let options = options.on_complete(move |completion| {
            // Receiver may already be gone; nothing to report then
            let _ = tx.send(completion);
        });
        self.send(name, options)?;
        Ok(rx)
    }

    /// Commands queued but not yet written
    pub fn pending(&self) -> Vec<Command> {
        self.session.lock().pending()
    }

    /// Drop every command not yet written; their callbacks never run
    pub fn clear_pending(&self) -> Vec<Command> {
        self.session.lock().clear_pending()
    }

    /// The command currently awaiting its terminator
    pub fn executing(&self) -> Option<Command> {
        self.session.lock().executing().map(|q| q.command().clone())
    }

    pub fn state(&self) -> SessionState {
        self.session.lock().state()
    }

    // =========================================================================
    // Transport Input
    // =========================================================================

    /// Feed one line received from the server
    pub fn handle_line(&self, line: &str) {
        let (outcome, fault) = {
            let mut session = self.session.lock();
            let outcome = session.receive_line(line);
            (outcome, session.take_fault())
        };

        match outcome {
            Outcome::Ready => {
                self.events.publish(&Event::Connect);
            }
            Outcome::Resolved(resolved) => {
                resolved.run();
                // Dispatch only after the callback, which may have cleared the queue
                let fault = {
                    let mut session = self.session.lock();
                    session.dispatch();
                    session.take_fault()
                };
                self.publish_fault(fault);
            }
            Outcome::Notification(notification) => {
                tracing::debug!("Notification: {}", notification.name);
                self.events.publish(&Event::Notification(notification));
            }
            Outcome::Greeting | Outcome::Captured | Outcome::Ignored => {}
        }

        self.publish_fault(fault);
    }

    /// The transport closed
    pub fn handle_close(&self) {
        let abandoned = self.session.lock().close();
        tracing::debug!("Connection closed with {} pending command(s)", abandoned.len());
        self.events.publish(&Event::Close(abandoned));
    }

    /// The transport failed
    pub fn handle_error(&self, error: io::Error) {
        let fault = {
            let mut session = self.session.lock();
            session.fault(error);
            session.take_fault()
        };
        self.publish_fault(fault);
    }

    fn publish_fault(&self, fault: Option<io::Error>) {
        if let Some(error) = fault {
            tracing::warn!("Transport error: {}", error);
            self.events.publish(&Event::Error(QueryError::Io(error)));
        }
    }
}

impl<T> Client<T> {
    // =========================================================================
    // Subscriptions
    // =========================================================================

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    pub fn subscribe<F>(&self, topic: Topic, handler: F) -> SubscriptionId
    where
        F: Fn(&Event) + Send + Sync + 'static,
    {
        self.events.subscribe(topic, handler)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.events.unsubscribe(id)
    }

    /// Greeting consumed
    pub fn on_connect<F>(&self, handler: F) -> SubscriptionId
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.subscribe(Topic::Connect, move |_| handler())
    }

    /// Transport closed; receives the commands that were never dispatched
    pub fn on_close<F>(&self, handler: F) -> SubscriptionId
    where
        F: Fn(&[Command]) + Send + Sync + 'static,
    {
        self.subscribe(Topic::Close, move |event| {
            if let Event::Close(pending) = event {
                handler(pending);
            }
        })
    }

    /// Transport error
    pub fn on_error<F>(&self, handler: F) -> SubscriptionId
    where
        F: Fn(&QueryError) + Send + Sync + 'static,
    {
        self.subscribe(Topic::Error, move |event| {
            if let Event::Error(error) = event {
                handler(error);
            }
        })
    }

    /// Notifications named `name` (`notify<name>` on the wire)
    pub fn on_notification<F>(&self, name: impl Into<String>, handler: F) -> SubscriptionId
    where
        F: Fn(&Notification) + Send + Sync + 'static,
    {
        self.subscribe(Topic::Notification(name.into()), move |event| {
            if let Event::Notification(notification) = event {
                handler(notification);
            }
        })
    }
}

impl<T> std::fmt::Debug for Client<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("session", &*self.session.lock())
            .field("events", &self.events)
            .finish()
    }
}
