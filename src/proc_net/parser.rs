use std::net::Ipv4Addr;

use crate::model::{ConnectionTuple, TcpState};

// Positional columns of a /proc/net/tcp data line.
const FIELD_SLOT: usize = 0;
const FIELD_LOCAL: usize = 1;
const FIELD_REMOTE: usize = 2;
const FIELD_STATE: usize = 3;
const FIELD_UID: usize = 7;
const FIELD_INODE: usize = 9;

/// One decoded row of the connection table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    pub slot: u32,
    pub tuple: ConnectionTuple,
    pub inode: u64,
    pub state: Option<TcpState>,
    pub uid: Option<u32>,
}

/// Parse one line of /proc/net/tcp.
///
/// Each data line has the format:
///   sl  local_address rem_address st tx_queue:rx_queue tr:tm->when retrnsmt uid timeout inode ...
///
/// Fields are whitespace-separated and counted by position; anything after
/// the inode is ignored. Returns `None` when a required field (slot, either
/// address or port, inode) is missing or malformed, or when the inode is 0.
/// The column header line is rejected the same way.
pub fn parse_line(line: &str) -> Option<TableRow> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() <= FIELD_INODE {
        return None;
    }

    let slot: u32 = fields[FIELD_SLOT].strip_suffix(':')?.parse().ok()?;
    let (source_address, source_port) = parse_addr_v4(fields[FIELD_LOCAL])?;
    let (dest_address, dest_port) = parse_addr_v4(fields[FIELD_REMOTE])?;

    let inode: u64 = fields[FIELD_INODE].parse().ok()?;
    // inode 0 means no socket owner (e.g. TIME_WAIT)
    if inode == 0 {
        return None;
    }

    let state = parse_hex(fields[FIELD_STATE], 2)
        .and_then(|v| u8::try_from(v).ok())
        .and_then(TcpState::from_kernel);
    let uid = fields[FIELD_UID].parse().ok();

    Some(TableRow {
        slot,
        tuple: ConnectionTuple::new(source_address, source_port, dest_address, dest_port),
        inode,
        state,
        uid,
    })
}

/// Parse an IPv4 endpoint in /proc/net/tcp format: "AABBCCDD:PPPP".
///
/// The address is the kernel's packed 32-bit value printed in hex; its
/// least-significant byte is the first octet of the dotted quad. The port is
/// a plain 16-bit value.
pub fn parse_addr_v4(s: &str) -> Option<(Ipv4Addr, u16)> {
    let (addr_hex, port_hex) = s.split_once(':')?;
    if addr_hex.len() != 8 || port_hex.len() != 4 {
        return None;
    }
    let raw = parse_hex(addr_hex, 8)?;
    let port = u16::try_from(parse_hex(port_hex, 4)?).ok()?;
    Some((decode_packed_v4(raw), port))
}

/// `0x0100007F` -> 127.0.0.1. Byte extraction, independent of host endianness.
pub fn decode_packed_v4(raw: u32) -> Ipv4Addr {
    Ipv4Addr::from(raw.to_le_bytes())
}

/// Hex digits only: `from_str_radix` alone would also take a leading sign.
fn parse_hex(s: &str, max_digits: usize) -> Option<u32> {
    if s.is_empty() || s.len() > max_digits || !s.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    u32::from_str_radix(s, 16).ok()
}
