//! TCP dialer

use std::io;
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};

/// Which resolved addresses a TCP dial may use
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Family {
    Any,
    V4,
    V6,
}

impl Family {
    fn accepts(self, addr: &SocketAddr) -> bool {
        match self {
            Family::Any => true,
            Family::V4 => addr.is_ipv4(),
            Family::V6 => addr.is_ipv6(),
        }
    }
}

/// Connect to `address`, trying each resolved address of the requested family
/// in turn
///
/// The last connection error is returned if every candidate fails.
pub(crate) fn dial(address: &str, family: Family) -> io::Result<TcpStream> {
    if family == Family::Any {
        return TcpStream::connect(address);
    }

    let mut last_err = None;
    for addr in address.to_socket_addrs()?.filter(|a| family.accepts(a)) {
        match TcpStream::connect(addr) {
            Ok(stream) => return Ok(stream),
            Err(e) => {
                tracing::trace!(%addr, error = %e, "candidate address failed");
                last_err = Some(e);
            }
        }
    }

    Err(last_err.unwrap_or_else(|| {
        io::Error::new(
            io::ErrorKind::AddrNotAvailable,
            format!("no {family:?} address found for {address}"),
        )
    }))
}
