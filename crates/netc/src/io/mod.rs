//! IO layer for the client
//!
//! This module provides the [`Connection`] handle that a
//! [`NetClient`](crate::NetClient) owns, and the dialers that produce it for
//! each supported [`Network`]. A connection is a plain blocking stream: reads
//! and writes go straight to the socket with no buffering in between.
//!
//! # Examples
//!
//! ```no_run
//! use netc::{Network, io};
//!
//! let conn = io::dial(&Network::Tcp, "127.0.0.1:5678")?;
//! println!("connected to {}", conn.peer_addr()?);
//! # Ok::<(), std::io::Error>(())
//! ```

use std::io::{self, Read, Write};
use std::net::{Shutdown, TcpStream};
#[cfg(unix)]
use std::os::unix::net::UnixStream;

use crate::Network;

mod tcp;
#[cfg(unix)]
mod unix;

/// A stream connection
///
/// The handle is exclusively owned; dropping it closes the socket. A handle
/// that has been [closed](Connection::close) stays in place as
/// [`Connection::Closed`] and fails every further operation.
#[derive(Debug)]
pub enum Connection {
    /// A TCP stream
    Tcp(TcpStream),
    /// A Unix domain stream socket
    #[cfg(unix)]
    Unix(UnixStream),
    /// The socket has been released
    Closed,
}

fn closed() -> io::Error {
    io::Error::new(io::ErrorKind::NotConnected, "use of closed connection")
}

impl Connection {
    /// A printable form of the remote end of the connection
    ///
    /// Unnamed Unix sockets are reported as `"(unnamed)"`.
    pub fn peer_addr(&self) -> io::Result<String> {
        match self {
            Connection::Tcp(stream) => Ok(stream.peer_addr()?.to_string()),
            #[cfg(unix)]
            Connection::Unix(stream) => {
                let addr = stream.peer_addr()?;
                Ok(addr
                    .as_pathname()
                    .map(|path| path.display().to_string())
                    .unwrap_or_else(|| "(unnamed)".to_string()))
            }
            Connection::Closed => Err(closed()),
        }
    }

    /// Whether the socket has been released by [`Connection::close`]
    pub fn is_closed(&self) -> bool {
        matches!(self, Connection::Closed)
    }

    /// Shut the socket down and release it
    ///
    /// A peer that already reset the connection is not an error. The socket
    /// is released even when the shutdown fails. Closing a closed handle
    /// fails with [`io::ErrorKind::NotConnected`].
    pub fn close(&mut self) -> io::Result<()> {
        if self.is_closed() {
            return Err(closed());
        }

        let res = match self.shutdown(Shutdown::Both) {
            Err(e) if e.kind() == io::ErrorKind::NotConnected => {
                tracing::trace!("peer already disconnected");
                Ok(())
            }
            other => other,
        };
        *self = Connection::Closed;
        res
    }

    /// Shut down the read half, write half or both halves of the connection
    pub fn shutdown(&self, how: Shutdown) -> io::Result<()> {
        match self {
            Connection::Tcp(stream) => stream.shutdown(how),
            #[cfg(unix)]
            Connection::Unix(stream) => stream.shutdown(how),
            Connection::Closed => Err(closed()),
        }
    }

    /// Create a new independently owned handle to the same socket
    pub fn try_clone(&self) -> io::Result<Self> {
        match self {
            Connection::Tcp(stream) => stream.try_clone().map(Connection::Tcp),
            #[cfg(unix)]
            Connection::Unix(stream) => stream.try_clone().map(Connection::Unix),
            Connection::Closed => Err(closed()),
        }
    }
}

impl Read for Connection {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            Connection::Tcp(stream) => stream.read(buf),
            #[cfg(unix)]
            Connection::Unix(stream) => stream.read(buf),
            Connection::Closed => Err(closed()),
        }
    }
}

impl Write for Connection {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Connection::Tcp(stream) => stream.write(buf),
            #[cfg(unix)]
            Connection::Unix(stream) => stream.write(buf),
            Connection::Closed => Err(closed()),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Connection::Tcp(stream) => stream.flush(),
            #[cfg(unix)]
            Connection::Unix(stream) => stream.flush(),
            Connection::Closed => Err(closed()),
        }
    }
}

impl From<TcpStream> for Connection {
    fn from(stream: TcpStream) -> Self {
        Connection::Tcp(stream)
    }
}

#[cfg(unix)]
impl From<UnixStream> for Connection {
    fn from(stream: UnixStream) -> Self {
        Connection::Unix(stream)
    }
}

/// Establish a connection to `address` over `network`
///
/// # Errors
///
/// Returns the platform error if the connection cannot be made, or an
/// [`io::ErrorKind::Unsupported`] error for networks that cannot be dialled
/// on this platform.
pub fn dial(network: &Network, address: &str) -> io::Result<Connection> {
    match network {
        Network::Tcp => tcp::dial(address, tcp::Family::Any).map(Connection::Tcp),
        Network::Tcp4 => tcp::dial(address, tcp::Family::V4).map(Connection::Tcp),
        Network::Tcp6 => tcp::dial(address, tcp::Family::V6).map(Connection::Tcp),
        #[cfg(unix)]
        Network::Unix => unix::dial(address).map(Connection::Unix),
        other => Err(io::Error::new(
            io::ErrorKind::Unsupported,
            format!("network {other} is not supported"),
        )),
    }
}
