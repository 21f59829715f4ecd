//! Unix domain socket dialer

use std::io;
use std::os::unix::net::UnixStream;

pub(crate) fn dial(path: &str) -> io::Result<UnixStream> {
    UnixStream::connect(path)
}
