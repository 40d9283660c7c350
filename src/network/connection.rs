//! Connection
//!
//! Opens a TCP connection to a query port and pumps received lines into a
//! [`Client`].

use std::io::{ErrorKind, Read};
use std::net::{TcpStream, ToSocketAddrs};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use super::lines::LineSplitter;
use crate::client::Client;
use crate::config::Config;
use crate::error::{QueryError, Result};

/// Read buffer size for the socket
const READ_CHUNK: usize = 4096;

/// A live TCP connection: the reading half plus the client that owns the
/// writing half
pub struct Connection {
    /// Reading half of the socket
    reader: TcpStream,

    /// Client writing commands to the other half
    client: Arc<Client<TcpStream>>,

    /// Byte stream to line splitter
    lines: LineSplitter,

    /// Peer address for logging
    peer_addr: String,
}

impl Connection {
    /// Connect to the server described by `config`
    pub fn open(config: &Config) -> Result<Self> {
        config.validate()?;
        let addr = config.addr();
        let stream = connect(&addr, config)?;
        Self::from_stream(stream, config)
    }

    /// Wrap an already connected stream
    pub fn from_stream(stream: TcpStream, config: &Config) -> Result<Self> {
        let peer_addr = stream
            .peer_addr()
            .map(|a| a.to_string())
            .unwrap_or_else(|_| "unknown".to_string());

        // Commands are single short lines; don't let Nagle hold them back
        stream.set_nodelay(true)?;
        stream.set_read_timeout(config.read_timeout())?;
        stream.set_write_timeout(config.write_timeout())?;

        let writer = stream.try_clone()?;
        let client = Arc::new(Client::from_config(writer, config));

        tracing::debug!("Connected to {}", peer_addr);

        Ok(Self {
            reader: stream,
            client,
            lines: LineSplitter::new(),
            peer_addr,
        })
    }

    /// The client for this connection
    pub fn client(&self) -> Arc<Client<TcpStream>> {
        Arc::clone(&self.client)
    }

    pub fn peer_addr(&self) -> &str {
        &self.peer_addr
    }

    /// Pump lines into the client until the connection ends (blocking).
    ///
    /// A clean close (EOF, reset, abort) returns `Ok`. An expired read
    /// timeout is not an error; reading simply resumes. Any other read error
    /// is reported to the client's error subscribers, followed by a close,
    /// and returned as [`QueryError::Faulted`].
    pub fn run(mut self) -> Result<()> {
        let mut chunk = [0u8; READ_CHUNK];

        loop {
            let n = match self.reader.read(&mut chunk) {
                Ok(n) => n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) if matches!(e.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut) => {
                    // Read timeout expired on an idle connection
                    tracing::trace!("No data from {} within read timeout", self.peer_addr);
                    continue;
                }
                Err(e)
                    if matches!(
                        e.kind(),
                        ErrorKind::ConnectionReset
                            | ErrorKind::ConnectionAborted
                            | ErrorKind::UnexpectedEof
                    ) =>
                {
                    tracing::debug!("Connection to {} ended: {}", self.peer_addr, e);
                    self.close();
                    return Ok(());
                }
                Err(e) => {
                    tracing::warn!("Error reading from {}: {}", self.peer_addr, e);
                    self.client.handle_error(e);
                    self.close();
                    return Err(QueryError::Faulted);
                }
            };

            if n == 0 {
                tracing::debug!("Server {} closed the connection", self.peer_addr);
                self.close();
                return Ok(());
            }

            self.lines.push(&chunk[..n]);
            while let Some(line) = self.lines.next_line() {
                self.client.handle_line(&line);
            }
        }
    }

    /// Run [`Connection::run`] on a background thread
    pub fn spawn(self) -> JoinHandle<Result<()>> {
        thread::spawn(move || self.run())
    }

    fn close(&mut self) {
        if let Some(tail) = self.lines.finish() {
            self.client.handle_line(&tail);
        }
        self.client.handle_close();
    }
}

/// Try every resolved address in turn
fn connect(addr: &str, config: &Config) -> Result<TcpStream> {
    let connect_err = |source| QueryError::Connect {
        addr: addr.to_string(),
        source,
    };

    let mut last_err = None;
    for socket_addr in addr.to_socket_addrs().map_err(connect_err)? {
        let attempt = match config.connect_timeout() {
            Some(timeout) => TcpStream::connect_timeout(&socket_addr, timeout),
            None => TcpStream::connect(socket_addr),
        };
        match attempt {
            Ok(stream) => return Ok(stream),
            Err(e) => {
                tracing::debug!("Connect to {} failed: {}", socket_addr, e);
                last_err = Some(e);
            }
        }
    }

    Err(connect_err(last_err.unwrap_or_else(|| {
        std::io::Error::new(ErrorKind::NotFound, "address resolved to nothing")
    })))
}
