//! # sqclient
//!
//! A client engine for line-oriented ServerQuery administration protocols:
//! - Reversible escaping of the text wire format
//! - Record parsing with integer coercion
//! - Strict single-in-flight command sequencing over one connection
//! - Classification of responses, terminators and pushed notifications
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                         Client                               │
//! │        send() / pending() / clear_pending() / on_*()         │
//! └──────────────┬──────────────────────────────▲───────────────┘
//!                │ enqueue                      │ completions, events
//! ┌──────────────▼──────────────────────────────┴───────────────┐
//! │                         Session                              │
//! │   greeting countdown · command queue · line classification   │
//! └──────────────┬──────────────────────────────▲───────────────┘
//!                │ write                        │ lines
//!         ┌──────▼──────┐                ┌──────┴──────┐
//!         │  Transport  │                │ LineSplitter│
//!         │ (TcpStream) │                │ (Connection)│
//!         └─────────────┘                └─────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod protocol;
pub mod session;
pub mod events;
pub mod network;
pub mod client;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use client::{Client, SendOptions};
pub use config::Config;
pub use error::{QueryError, Result, ServerError};
pub use events::{Event, Topic};
pub use network::{Connection, Transport};
pub use protocol::{Command, Record, Response, Value};
pub use session::{Completion, Notification, SessionState};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of sqclient
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
