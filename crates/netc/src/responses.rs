use std::collections::TryReserveError;
use std::io::{self, Read};

use bytes::Bytes;

use crate::{Connection, Error, Result};

/// Lazy sequence of chunks read from a connection
///
/// Each call to [`next`](Iterator::next) performs one blocking read of at
/// most the client's maximum read size. The sequence ends with `None` when the
/// peer closes the stream, and ends after yielding the first read error.
///
/// A zero-sized read buffer never observes end-of-stream: every read yields
/// an empty chunk.
#[derive(Debug)]
pub struct Responses<'a> {
    conn: &'a mut Connection,
    buf: Vec<u8>,
    finished: bool,
}

impl<'a> Responses<'a> {
    /// Fails if the read buffer cannot be allocated.
    pub(crate) fn new(
        conn: &'a mut Connection,
        max_read_bytes: usize,
    ) -> std::result::Result<Self, TryReserveError> {
        let mut buf = Vec::new();
        buf.try_reserve_exact(max_read_bytes)?;
        buf.resize(max_read_bytes, 0);
        Ok(Self {
            conn,
            buf,
            finished: false,
        })
    }
}

impl Iterator for Responses<'_> {
    type Item = Result<Bytes>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        loop {
            match self.conn.read(&mut self.buf) {
                Ok(0) if !self.buf.is_empty() => {
                    tracing::trace!("end of stream");
                    self.finished = true;
                    return None;
                }
                Ok(n) => {
                    tracing::trace!(bytes = n, "read chunk");
                    return Some(Ok(Bytes::copy_from_slice(&self.buf[..n])));
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    tracing::trace!(error = %e, "read failed");
                    self.finished = true;
                    return Some(Err(Error::Read(e)));
                }
            }
        }
    }
}

impl std::iter::FusedIterator for Responses<'_> {}
