use std::fmt;
use std::net::Ipv4Addr;

use super::ConnectionTuple;
use super::endpoint::split_endpoint;

/// A tuple to look for, where each field may have failed to parse.
///
/// An unparsed field (`None`) never equals any table value, so a query
/// with one matches nothing. A literal `0.0.0.0` or port `0` is kept as
/// `Some` and compares like any other value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ConnectionQuery {
    pub source_address: Option<Ipv4Addr>,
    pub source_port: Option<u16>,
    pub dest_address: Option<Ipv4Addr>,
    pub dest_port: Option<u16>,
}

impl ConnectionQuery {
    /// Build a query from two `host:port` strings without failing.
    ///
    /// Host and port are parsed independently; a `host:port` string that
    /// cannot be split at all leaves both of its fields unparsed.
    pub fn parse(source_endpoint: &str, dest_endpoint: &str) -> Self {
        let (source_address, source_port) = parse_endpoint_lenient(source_endpoint);
        let (dest_address, dest_port) = parse_endpoint_lenient(dest_endpoint);
        Self {
            source_address,
            source_port,
            dest_address,
            dest_port,
        }
    }

    /// Exact match on all four fields. Always false while any field is
    /// unparsed.
    pub fn matches(&self, tuple: &ConnectionTuple) -> bool {
        self.source_address == Some(tuple.source_address)
            && self.source_port == Some(tuple.source_port)
            && self.dest_address == Some(tuple.dest_address)
            && self.dest_port == Some(tuple.dest_port)
    }

    /// Names of the fields that failed to parse, in tuple order.
    pub fn unparsed_fields(&self) -> Vec<&'static str> {
        [
            ("source address", self.source_address.is_none()),
            ("source port", self.source_port.is_none()),
            ("destination address", self.dest_address.is_none()),
            ("destination port", self.dest_port.is_none()),
        ]
        .into_iter()
        .filter_map(|(name, unparsed)| unparsed.then_some(name))
        .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.to_tuple().is_some()
    }

    pub fn to_tuple(&self) -> Option<ConnectionTuple> {
        Some(ConnectionTuple::new(
            self.source_address?,
            self.source_port?,
            self.dest_address?,
            self.dest_port?,
        ))
    }
}

impl From<ConnectionTuple> for ConnectionQuery {
    fn from(tuple: ConnectionTuple) -> Self {
        Self {
            source_address: Some(tuple.source_address),
            source_port: Some(tuple.source_port),
            dest_address: Some(tuple.dest_address),
            dest_port: Some(tuple.dest_port),
        }
    }
}

/// Same layout as [`ConnectionTuple`]'s Display, with `?` for unparsed fields.
impl fmt::Display for ConnectionQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_field(f, self.source_address)?;
        f.write_str(":")?;
        write_field(f, self.source_port)?;
        f.write_str(" -> ")?;
        write_field(f, self.dest_address)?;
        f.write_str(":")?;
        write_field(f, self.dest_port)
    }
}

fn write_field(f: &mut fmt::Formatter<'_>, value: Option<impl fmt::Display>) -> fmt::Result {
    match value {
        Some(v) => write!(f, "{v}"),
        None => f.write_str("?"),
    }
}

fn parse_endpoint_lenient(endpoint: &str) -> (Option<Ipv4Addr>, Option<u16>) {
    match split_endpoint(endpoint) {
        Ok(parts) => (parts.address.ok(), parts.port.ok()),
        Err(reason) => {
            log::debug!("endpoint {endpoint:?}: {reason}");
            (None, None)
        }
    }
}
