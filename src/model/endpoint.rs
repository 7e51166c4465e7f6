use std::net::{IpAddr, Ipv4Addr};

/// A `host:port` string split into independently parsed halves.
pub(crate) struct EndpointParts {
    pub address: Result<Ipv4Addr, String>,
    pub port: Result<u16, String>,
}

/// Split `host:port` or `[host]:port`. An unbracketed host may not contain
/// a colon.
pub(crate) fn split_endpoint(endpoint: &str) -> Result<EndpointParts, String> {
    let (host, port) = if let Some(rest) = endpoint.strip_prefix('[') {
        let (host, after) = rest
            .split_once(']')
            .ok_or_else(|| "missing ']' in address".to_string())?;
        let port = after
            .strip_prefix(':')
            .ok_or_else(|| "missing port".to_string())?;
        (host, port)
    } else {
        let (host, port) = endpoint
            .rsplit_once(':')
            .ok_or_else(|| "missing port".to_string())?;
        if host.contains(':') {
            return Err("too many colons in address".to_string());
        }
        (host, port)
    };

    Ok(EndpointParts {
        address: parse_host(host),
        port: port
            .parse::<u16>()
            .map_err(|_| format!("'{port}' is not a valid port")),
    })
}

/// IPv4-mapped IPv6 hosts (`::ffff:a.b.c.d`) are folded to their IPv4 form.
fn parse_host(host: &str) -> Result<Ipv4Addr, String> {
    match host.parse::<IpAddr>() {
        Ok(IpAddr::V4(v4)) => Ok(v4),
        Ok(IpAddr::V6(v6)) => v6
            .to_ipv4_mapped()
            .ok_or_else(|| format!("'{host}' is not an IPv4 address")),
        Err(_) => Err(format!("'{host}' is not an IP address")),
    }
}
