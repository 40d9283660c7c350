//! Shared test helpers
//!
//! An in-memory transport that records every byte written to it.

#![allow(dead_code)]

use std::io::{self, Write};
use std::sync::Arc;

use parking_lot::Mutex;
use sqclient::Client;

/// Cloneable in-memory transport; clones share the same buffer
#[derive(Debug, Clone, Default)]
pub struct Wire {
    written: Arc<Mutex<Vec<u8>>>,
}

impl Wire {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far, split into lines
    pub fn lines(&self) -> Vec<String> {
        let written = self.written.lock();
        String::from_utf8_lossy(&written)
            .lines()
            .map(str::to_string)
            .collect()
    }

    pub fn raw(&self) -> Vec<u8> {
        self.written.lock().clone()
    }
}

impl Write for Wire {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.written.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Transport whose writes always fail
#[derive(Debug, Clone, Copy, Default)]
pub struct BrokenWire;

impl Write for BrokenWire {
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "broken pipe"))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Standard two-line greeting
pub fn greet<T: sqclient::Transport>(client: &Client<T>) {
    client.handle_line("TS3");
    client.handle_line("Welcome to the TeamSpeak 3 ServerQuery interface.");
}

/// A client that has already consumed its greeting
pub fn ready_client() -> (Client<Wire>, Wire) {
    let wire = Wire::new();
    let client = Client::new(wire.clone());
    greet(&client);
    (client, wire)
}
