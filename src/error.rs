//! Error types for sqclient
//!
//! Provides a unified error type for all operations, plus a typed view of
//! the error records the server returns for failed commands.

use std::fmt;

use thiserror::Error;

use crate::protocol::{Record, Value};

/// Result type alias using QueryError
pub type Result<T> = std::result::Result<T, QueryError>;

/// Unified error type for sqclient operations
#[derive(Debug, Error)]
pub enum QueryError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Connection Errors
    // -------------------------------------------------------------------------
    #[error("Failed to connect to {addr}: {source}")]
    Connect {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Connection closed")]
    Closed,

    #[error("Connection faulted by an earlier transport error")]
    Faulted,

    // -------------------------------------------------------------------------
    // Protocol Errors
    // -------------------------------------------------------------------------
    #[error("Protocol error: {0}")]
    Protocol(String),

    #[error(transparent)]
    Server(#[from] ServerError),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

/// A command rejected by the server (`error id=<non-zero> ...`)
#[derive(Debug, Clone, PartialEq)]
pub struct ServerError {
    /// Numeric error id reported by the server
    pub id: i64,

    /// Human readable message (`msg`)
    pub message: String,

    /// Optional detail (`extra_msg`)
    pub extra_message: Option<String>,

    /// Permission that was missing, if the server reported one (`failed_permid`)
    pub failed_permission: Option<i64>,

    /// The full error record as received
    pub record: Record,
}

impl ServerError {
    /// Build a typed error from a parsed `error` record
    pub fn from_record(record: Record) -> Self {
        let id = match record.get("id") {
            Some(Value::Int(id)) => *id,
            Some(Value::Str(s)) => s.parse().unwrap_or(-1),
            None => -1,
        };
        let message = record
            .get_str("msg")
            .map(str::to_string)
            .unwrap_or_default();
        let extra_message = record.get_str("extra_msg").map(str::to_string);
        let failed_permission = record.get_int("failed_permid");

        Self {
            id,
            message,
            extra_message,
            failed_permission,
            record,
        }
    }
}

impl fmt::Display for ServerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Server error {}: {}", self.id, self.message)?;
        if let Some(extra) = &self.extra_message {
            write!(f, " ({})", extra)?;
        }
        Ok(())
    }
}

impl std::error::Error for ServerError {}
