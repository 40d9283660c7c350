//! Line splitting
//!
//! Turns the raw byte stream into `\n`-terminated lines. Partial lines stay
//! buffered until the rest arrives.

use bytes::{Buf, BytesMut};

/// Accumulates bytes and yields complete lines
#[derive(Debug, Default)]
pub struct LineSplitter {
    buffer: BytesMut,
}

impl LineSplitter {
    pub fn new() -> Self {
        Self {
            buffer: BytesMut::with_capacity(4096),
        }
    }

    /// Append bytes read from the stream
    pub fn push(&mut self, data: &[u8]) {
        self.buffer.extend_from_slice(data);
    }

    /// Next complete line, without its `\n`.
    ///
    /// Invalid UTF-8 is replaced rather than rejected.
    pub fn next_line(&mut self) -> Option<String> {
        let end = self.buffer.iter().position(|&b| b == b'\n')?;
        let line = self.buffer.split_to(end);
        self.buffer.advance(1);
        Some(String::from_utf8_lossy(&line).into_owned())
    }

    /// Whatever is left once the stream has ended, if anything
    pub fn finish(&mut self) -> Option<String> {
        if self.buffer.is_empty() {
            return None;
        }
        let rest = self.buffer.split();
        Some(String::from_utf8_lossy(&rest).into_owned())
    }

    /// Bytes buffered but not yet returned as a line
    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }
}
