//! Network client
//!
//! This crate wraps a blocking stream connection (TCP or Unix domain socket)
//! and adds a write-then-listen pattern on top of it: bytes are written with a
//! single call and, optionally, a response handler is invoked for every chunk
//! read back until it signals completion.
//!
//! ```no_run
//! use netc::NetClient;
//!
//! let mut client = NetClient::new("unix", "/tmp/mysocket");
//! client.connect()?;
//! client.write_and_listen(b"hello", |data, err, done| {
//!     if err.is_none() {
//!         println!("{}", String::from_utf8_lossy(data));
//!     }
//!     done.done();
//! })?;
//! client.close()?;
//! # Ok::<(), netc::Error>(())
//! ```
mod client;
pub mod config;
mod done;
mod error;
pub mod io;
mod network;
mod responses;

pub use client::NetClient;
pub use config::ClientConfig;
pub use done::Done;
pub use error::{Error, Result};
pub use io::Connection;
pub use network::Network;
pub use responses::Responses;

/// The default upper bound on the size of a single read
pub const DEFAULT_MAX_READ_BYTES: i64 = 2048;

/// The largest accepted maximum read size (64 MiB)
pub const MAX_READ_BYTES_LIMIT: i64 = 64 * 1024 * 1024;
