//! Error types for the client.

use std::io;

use crate::Network;

/// A convenience wrapper around `Result` for [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Errors reported by [`NetClient`](crate::NetClient) operations, either
/// returned directly or handed to a response handler.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An operation needed a connection but none has been established.
    #[error("no available network connection")]
    NoConnection,

    /// The configured maximum read size is out of range, or its buffer could
    /// not be allocated.
    #[error(
        "invalid maximum read size {0}, must be between 0 and {limit}",
        limit = crate::MAX_READ_BYTES_LIMIT
    )]
    InvalidReadSize(i64),

    /// The network family cannot be dialled on this platform.
    #[error("unsupported network {0:?}")]
    UnsupportedNetwork(String),

    /// Establishing the connection failed.
    #[error("dialing {network} {address}: {source}")]
    Dial {
        /// The network family that was dialled.
        network: Network,
        /// The address that was dialled.
        address: String,
        /// The underlying failure.
        #[source]
        source: io::Error,
    },

    /// Writing to the connection failed.
    #[error("write failed: {0}")]
    Write(#[source] io::Error),

    /// Reading from the connection failed.
    #[error("read failed: {0}")]
    Read(#[source] io::Error),

    /// Closing the connection failed.
    #[error("close failed: {0}")]
    Close(#[source] io::Error),

    /// The peer closed its side of the connection.
    #[error("end of stream")]
    EndOfStream,

    /// A configuration could not be loaded.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl Error {
    /// Whether this is the graceful end of the stream rather than a failure
    pub fn is_end_of_stream(&self) -> bool {
        matches!(self, Error::EndOfStream)
    }
}
