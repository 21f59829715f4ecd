//! Loopback peers for the client tests
#![allow(dead_code)]

use std::io::{IsTerminal, Read, Write};
use std::net::TcpListener;
#[cfg(unix)]
use std::os::unix::net::UnixListener;
use std::thread::{self, JoinHandle};

use tempfile::TempDir;
use tracing_subscriber::EnvFilter;

// test suite "constructor"
#[ctor::ctor]
fn init() {
    let in_ci = std::env::var("CI")
        .map(|val| val == "true")
        .unwrap_or(false);

    if std::io::stderr().is_terminal() || in_ci {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .try_init();
    } else {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .json()
            .try_init();
    }

    // error traces
    let _ = color_eyre::install();
}

/// How a peer treats each accepted connection
#[derive(Debug, Clone, Copy)]
pub enum Behaviour {
    /// Echo every chunk back until the client closes
    Echo,
    /// Close the connection straight away
    Hangup,
    /// Echo the first chunk back, then close
    EchoOnce,
    /// Wait for data and close without reading it, so the peer resets the
    /// connection (TCP only)
    Reset,
}

fn serve<S: Read + Write>(mut stream: S, behaviour: Behaviour) {
    let mut buf = [0u8; 1024];
    match behaviour {
        Behaviour::Hangup | Behaviour::Reset => {}
        Behaviour::EchoOnce => {
            if let Ok(n) = stream.read(&mut buf) {
                let _ = stream.write_all(&buf[..n]);
            }
        }
        Behaviour::Echo => loop {
            match stream.read(&mut buf) {
                Ok(0) | Err(_) => return,
                Ok(n) => {
                    if stream.write_all(&buf[..n]).is_err() {
                        return;
                    }
                }
            }
        },
    }
}

/// A peer listening on a loopback address
///
/// The listener serves `connections` clients, one after the other, and then
/// stops listening.
pub struct Peer {
    pub network: &'static str,
    pub address: String,
    handle: Option<JoinHandle<()>>,
    // keeps the Unix socket path alive
    _dir: Option<TempDir>,
}

impl Peer {
    pub fn tcp(behaviour: Behaviour, connections: usize) -> eyre::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0")?;
        let address = listener.local_addr()?.to_string();
        let handle = thread::spawn(move || {
            for _ in 0..connections {
                match listener.accept() {
                    Ok((stream, _)) if matches!(behaviour, Behaviour::Reset) => {
                        // closing with unread data pending sends an RST
                        let _ = stream.peek(&mut [0u8; 1]);
                    }
                    Ok((stream, _)) => serve(stream, behaviour),
                    Err(e) => {
                        tracing::warn!(error = %e, "accepting tcp connection");
                        return;
                    }
                }
            }
        });

        Ok(Self {
            network: "tcp",
            address,
            handle: Some(handle),
            _dir: None,
        })
    }

    #[cfg(unix)]
    pub fn unix(behaviour: Behaviour, connections: usize) -> eyre::Result<Self> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("netc.sock");
        let listener = UnixListener::bind(&path)?;
        let handle = thread::spawn(move || {
            for _ in 0..connections {
                match listener.accept() {
                    Ok((stream, _)) => serve(stream, behaviour),
                    Err(e) => {
                        tracing::warn!(error = %e, "accepting unix connection");
                        return;
                    }
                }
            }
        });

        Ok(Self {
            network: "unix",
            address: path.display().to_string(),
            handle: Some(handle),
            _dir: Some(dir),
        })
    }

    pub fn new(network: &str, behaviour: Behaviour, connections: usize) -> eyre::Result<Self> {
        match network {
            "tcp" => Self::tcp(behaviour, connections),
            #[cfg(unix)]
            "unix" => Self::unix(behaviour, connections),
            other => eyre::bail!("no test peer for network {other}"),
        }
    }

    /// Wait for the peer to finish serving its connections
    pub fn join(mut self) {
        if let Some(handle) = self.handle.take() {
            handle.join().unwrap();
        }
    }
}
