//! Network Module
//!
//! TCP transport for the client.
//!
//! ## Architecture
//! - The writing half of the socket is owned by the client's session and
//!   written only when a command is dispatched
//! - The reading half is pumped by [`Connection::run`], usually on its own
//!   thread, splitting the byte stream into lines

mod connection;
mod lines;
mod transport;

pub use connection::Connection;
pub use lines::LineSplitter;
pub use transport::Transport;
