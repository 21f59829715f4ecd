use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Transport family used when dialling
///
/// Names follow the usual lowercase conventions (`tcp`, `tcp4`, `tcp6`,
/// `unix`). Parsing never fails: unknown names are kept in
/// [`Network::Other`] and rejected when the client tries to connect.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Network {
    /// TCP over any resolved address family
    Tcp,
    /// TCP restricted to IPv4 addresses
    Tcp4,
    /// TCP restricted to IPv6 addresses
    Tcp6,
    /// Unix domain stream socket
    Unix,
    /// A name that is not understood
    Other(String),
}

impl Network {
    /// The canonical name of this network
    pub fn as_str(&self) -> &str {
        match self {
            Network::Tcp => "tcp",
            Network::Tcp4 => "tcp4",
            Network::Tcp6 => "tcp6",
            Network::Unix => "unix",
            Network::Other(name) => name,
        }
    }

    /// Whether this network can be dialled on the current platform
    pub fn is_supported(&self) -> bool {
        match self {
            Network::Tcp | Network::Tcp4 | Network::Tcp6 => true,
            Network::Unix => cfg!(unix),
            Network::Other(_) => false,
        }
    }
}

impl FromStr for Network {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "tcp" => Network::Tcp,
            "tcp4" => Network::Tcp4,
            "tcp6" => Network::Tcp6,
            "unix" => Network::Unix,
            other => Network::Other(other.to_string()),
        })
    }
}

impl From<&str> for Network {
    fn from(s: &str) -> Self {
        let Ok(network) = s.parse::<Network>();
        network
    }
}

impl From<String> for Network {
    fn from(s: String) -> Self {
        Network::from(s.as_str())
    }
}

impl From<Network> for String {
    fn from(network: Network) -> Self {
        match network {
            Network::Other(name) => name,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_names() {
        assert_eq!(Network::from("tcp"), Network::Tcp);
        assert_eq!(Network::from("tcp4"), Network::Tcp4);
        assert_eq!(Network::from("tcp6"), Network::Tcp6);
        assert_eq!(Network::from("unix"), Network::Unix);
    }

    #[test]
    fn test_unknown_names_are_kept() {
        let network = Network::from("udp");
        assert_eq!(network, Network::Other("udp".to_string()));
        assert_eq!(network.to_string(), "udp");
        assert!(!network.is_supported());
    }

    #[test]
    fn test_display_round_trips_through_parse() {
        for network in [Network::Tcp, Network::Tcp4, Network::Tcp6, Network::Unix] {
            assert_eq!(Network::from(network.to_string()), network);
        }
    }
}
