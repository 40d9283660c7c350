//! Outgoing half of a connection

use std::io::{self, Write};

/// Where dispatched command lines are written
///
/// Implemented for every `std::io::Write`, so a `TcpStream` (or a
/// `Vec<u8>` in tests) can be used directly.
pub trait Transport: Send {
    /// Write all of `bytes` and flush
    fn write(&mut self, bytes: &[u8]) -> io::Result<()>;
}

impl<W: Write + Send> Transport for W {
    fn write(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.write_all(bytes)?;
        self.flush()
    }
}
