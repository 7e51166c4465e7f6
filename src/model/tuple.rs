use std::fmt;
use std::net::Ipv4Addr;

use crate::error::SockOwnerError;

use super::endpoint::split_endpoint;

/// IPv4 TCP 4-tuple as seen from the local socket.
///
/// Equality is exact on all four fields. `0.0.0.0` is an ordinary address
/// here, not a wildcard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionTuple {
    pub source_address: Ipv4Addr,
    pub source_port: u16,
    pub dest_address: Ipv4Addr,
    pub dest_port: u16,
}

impl ConnectionTuple {
    pub const UNSPECIFIED: Self = Self {
        source_address: Ipv4Addr::UNSPECIFIED,
        source_port: 0,
        dest_address: Ipv4Addr::UNSPECIFIED,
        dest_port: 0,
    };

    pub fn new(
        source_address: Ipv4Addr,
        source_port: u16,
        dest_address: Ipv4Addr,
        dest_port: u16,
    ) -> Self {
        Self {
            source_address,
            source_port,
            dest_address,
            dest_port,
        }
    }

    /// Build a tuple from two `host:port` strings, rejecting malformed input.
    ///
    /// See [`ConnectionQuery::parse`](super::ConnectionQuery::parse) for the
    /// lenient form.
    pub fn try_parse(source_endpoint: &str, dest_endpoint: &str) -> Result<Self, SockOwnerError> {
        let (source_address, source_port) = parse_endpoint_strict(source_endpoint)?;
        let (dest_address, dest_port) = parse_endpoint_strict(dest_endpoint)?;
        Ok(Self::new(source_address, source_port, dest_address, dest_port))
    }

    pub fn matches(&self, other: &ConnectionTuple) -> bool {
        self.source_address == other.source_address
            && self.source_port == other.source_port
            && self.dest_address == other.dest_address
            && self.dest_port == other.dest_port
    }

    /// True when every field is zero.
    pub fn is_unspecified(&self) -> bool {
        self.matches(&Self::UNSPECIFIED)
    }
}

impl Default for ConnectionTuple {
    fn default() -> Self {
        Self::UNSPECIFIED
    }
}

impl fmt::Display for ConnectionTuple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{} -> {}:{}",
            self.source_address, self.source_port, self.dest_address, self.dest_port
        )
    }
}

fn parse_endpoint_strict(endpoint: &str) -> Result<(Ipv4Addr, u16), SockOwnerError> {
    let invalid = |reason: String| SockOwnerError::InvalidEndpoint {
        endpoint: endpoint.to_string(),
        reason,
    };
    let parts = split_endpoint(endpoint).map_err(invalid)?;
    let address = parts.address.map_err(invalid)?;
    let port = parts.port.map_err(invalid)?;
    Ok((address, port))
}
