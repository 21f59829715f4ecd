use std::io::Write;

use crate::done::{self, Done};
use crate::{
    ClientConfig, Connection, DEFAULT_MAX_READ_BYTES, Error, MAX_READ_BYTES_LIMIT, Network,
    Responses, Result, io,
};

/// Client for a single stream connection
///
/// A client is created for one network family and address, which are fixed
/// for its lifetime. It holds at most one connection at a time: connecting
/// again replaces (and drops) the previous handle.
///
/// # Examples
///
/// ```no_run
/// use netc::NetClient;
///
/// let mut client = NetClient::new("tcp", "127.0.0.1:7000");
/// client.connect()?;
///
/// let written = client.write_and_listen(b"ping", |data, err, done| {
///     match err {
///         None => println!("received {} bytes", data.len()),
///         Some(e) => eprintln!("read failed: {e}"),
///     }
///     done.done();
/// })?;
/// assert_eq!(written, 4);
///
/// client.close()?;
/// # Ok::<(), netc::Error>(())
/// ```
#[derive(Debug)]
pub struct NetClient {
    network: Network,
    address: String,
    conn: Option<Connection>,
    max_read_bytes: i64,
}

impl NetClient {
    /// Create a client for `address` on `network`
    ///
    /// No I/O is performed until [`NetClient::connect`] is called.
    pub fn new(network: impl Into<Network>, address: impl Into<String>) -> Self {
        Self {
            network: network.into(),
            address: address.into(),
            conn: None,
            max_read_bytes: DEFAULT_MAX_READ_BYTES,
        }
    }

    /// Create a client from a loaded configuration
    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(config.network.clone(), config.address.clone())
            .with_max_read_bytes(config.max_read_bytes)
    }

    /// Set the maximum number of bytes taken by a single read
    ///
    /// Negative values, and values above [`MAX_READ_BYTES_LIMIT`], are
    /// accepted here and reported as [`Error::InvalidReadSize`] when a read
    /// loop starts.
    pub fn with_max_read_bytes(mut self, max_read_bytes: i64) -> Self {
        self.max_read_bytes = max_read_bytes;
        self
    }

    /// Set the maximum number of bytes taken by a single read, in place
    pub fn set_max_read_bytes(&mut self, max_read_bytes: i64) {
        self.max_read_bytes = max_read_bytes;
    }

    /// The maximum number of bytes taken by a single read
    pub fn max_read_bytes(&self) -> i64 {
        self.max_read_bytes
    }

    /// The network family this client dials
    pub fn network(&self) -> &Network {
        &self.network
    }

    /// The address or socket path this client dials
    pub fn address(&self) -> &str {
        &self.address
    }

    /// The current connection, if one has been established
    ///
    /// After [`NetClient::close`] the handle is still returned, shut down.
    pub fn conn(&self) -> Option<&Connection> {
        self.conn.as_ref()
    }

    /// Mutable access to the current connection, e.g. to set socket options
    pub fn conn_mut(&mut self) -> Option<&mut Connection> {
        self.conn.as_mut()
    }

    /// Establish a new connection
    ///
    /// On success any previous connection is replaced. On failure the
    /// previous connection, if any, is left untouched.
    #[tracing::instrument(skip(self), fields(network = %self.network, address = %self.address), level = "debug")]
    pub fn connect(&mut self) -> Result<()> {
        if !self.network.is_supported() {
            return Err(Error::UnsupportedNetwork(self.network.to_string()));
        }

        let conn = io::dial(&self.network, &self.address).map_err(|source| Error::Dial {
            network: self.network.clone(),
            address: self.address.clone(),
            source,
        })?;
        tracing::debug!("connection made");

        if self.conn.replace(conn).is_some() {
            tracing::debug!("replaced previous connection");
        }
        Ok(())
    }

    /// Write `data` with a single underlying write call
    ///
    /// Returns the number of bytes written, which may be less than
    /// `data.len()`. Short writes are not retried.
    pub fn write(&mut self, data: &[u8]) -> Result<usize> {
        let conn = self.conn.as_mut().ok_or(Error::NoConnection)?;
        let n = conn.write(data).map_err(Error::Write)?;
        tracing::trace!(requested = data.len(), written = n, "wrote data");
        Ok(n)
    }

    /// Write `data` and then block in the read loop with `handler`
    ///
    /// The handler is only invoked if the write succeeds. The returned byte
    /// count is that of the write; read failures are reported to the handler.
    /// See [`NetClient::listen`] for the loop semantics.
    pub fn write_and_listen<F>(&mut self, data: &[u8], handler: F) -> Result<usize>
    where
        F: FnMut(&[u8], Option<Error>, &Done),
    {
        let n = self.write(data)?;
        self.listen(handler);
        Ok(n)
    }

    /// Block reading from the connection, invoking `handler` once per read
    ///
    /// The handler receives the bytes read, an error if the read did not
    /// succeed, and a [`Done`] token. The loop stops before its next read
    /// once the token is signalled. It also stops after delivering
    /// [`Error::EndOfStream`] or a read error, whatever the handler does.
    ///
    /// If there is no connection or the maximum read size is out of range the
    /// handler is invoked once with the error and a token that does nothing.
    pub fn listen<F>(&mut self, mut handler: F)
    where
        F: FnMut(&[u8], Option<Error>, &Done),
    {
        let mut responses = match self.responses() {
            Ok(responses) => responses,
            Err(e) => {
                handler(&[], Some(e), &Done::noop());
                return;
            }
        };

        let (done, finished) = Done::channel();
        loop {
            if done::signalled(&finished) {
                tracing::trace!("read loop finished by handler");
                return;
            }

            match responses.next() {
                Some(Ok(chunk)) => handler(&chunk[..], None, &done),
                Some(Err(e)) => {
                    handler(&[], Some(e), &done);
                    return;
                }
                None => {
                    handler(&[], Some(Error::EndOfStream), &done);
                    return;
                }
            }
        }
    }

    /// Iterate over chunks read from the connection
    ///
    /// This is the pull-based form of [`NetClient::listen`]: dropping the
    /// iterator is the cancellation.
    pub fn responses(&mut self) -> Result<Responses<'_>> {
        let requested = self.max_read_bytes;
        let max_read_bytes = usize::try_from(requested)
            .ok()
            .filter(|_| requested <= MAX_READ_BYTES_LIMIT)
            .ok_or(Error::InvalidReadSize(requested))?;
        let conn = self.conn.as_mut().ok_or(Error::NoConnection)?;
        Responses::new(conn, max_read_bytes).map_err(|e| {
            tracing::debug!(error = %e, requested, "allocating read buffer");
            Error::InvalidReadSize(requested)
        })
    }

    /// Close the current connection
    ///
    /// The socket is shut down and released, but the handle stays in place as
    /// [`Connection::Closed`], so later writes fail with
    /// [`Error::Write`] rather than [`Error::NoConnection`]. A connection the
    /// peer has already reset closes without error.
    #[tracing::instrument(skip(self), fields(network = %self.network, address = %self.address), level = "debug")]
    pub fn close(&mut self) -> Result<()> {
        let conn = self.conn.as_mut().ok_or(Error::NoConnection)?;
        tracing::debug!("closing connection");
        conn.close().map_err(Error::Close)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_has_defaults() {
        let client = NetClient::new("unix", "/tmp/mysocket");
        assert_eq!(client.network(), &Network::Unix);
        assert_eq!(client.address(), "/tmp/mysocket");
        assert_eq!(client.max_read_bytes(), 2048);
        assert!(client.conn().is_none());
    }

    #[test]
    fn test_from_config() {
        let config = ClientConfig {
            network: Network::Tcp,
            address: "127.0.0.1:1".to_string(),
            max_read_bytes: 16,
        };
        let client = NetClient::from_config(&config);
        assert_eq!(client.network(), &Network::Tcp);
        assert_eq!(client.address(), "127.0.0.1:1");
        assert_eq!(client.max_read_bytes(), 16);
    }

    #[test]
    fn test_responses_checks_read_size_first() {
        let mut client = NetClient::new("tcp", "127.0.0.1:1").with_max_read_bytes(-5);
        assert!(matches!(
            client.responses().unwrap_err(),
            Error::InvalidReadSize(-5)
        ));

        client.set_max_read_bytes(8);
        assert!(matches!(
            client.responses().unwrap_err(),
            Error::NoConnection
        ));
    }

    #[test]
    fn test_oversized_read_size_is_rejected() {
        for size in [i64::MAX, MAX_READ_BYTES_LIMIT + 1] {
            let mut client = NetClient::new("tcp", "127.0.0.1:1").with_max_read_bytes(size);
            assert!(matches!(
                client.responses().unwrap_err(),
                Error::InvalidReadSize(s) if s == size
            ));
        }

        let mut client =
            NetClient::new("tcp", "127.0.0.1:1").with_max_read_bytes(MAX_READ_BYTES_LIMIT);
        assert!(matches!(
            client.responses().unwrap_err(),
            Error::NoConnection
        ));
    }

    #[test]
    fn test_unsupported_network() {
        let mut client = NetClient::new("udp", "127.0.0.1:9");
        let err = client.connect().unwrap_err();
        assert!(matches!(err, Error::UnsupportedNetwork(ref name) if name == "udp"));
        assert!(client.conn().is_none());
    }
}
