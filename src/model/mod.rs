mod endpoint;
pub mod query;
pub mod tuple;

pub use query::ConnectionQuery;
pub use tuple::ConnectionTuple;

use serde::Serialize;

/// TCP socket state as reported in the `st` column of `/proc/net/tcp`.
#[derive(Clone, Copy, Serialize, Debug, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TcpState {
    Established,
    SynSent,
    SynReceived,
    #[serde(rename = "FIN_WAIT_1")]
    FinWait1,
    #[serde(rename = "FIN_WAIT_2")]
    FinWait2,
    TimeWait,
    Closed,
    CloseWait,
    LastAck,
    Listen,
    Closing,
    NewSynReceived,
}

impl TcpState {
    /// Map the kernel's state number (include/net/tcp_states.h).
    ///
    ///   01=ESTABLISHED, 02=SYN_SENT, 03=SYN_RECV, 04=FIN_WAIT1,
    ///   05=FIN_WAIT2, 06=TIME_WAIT, 07=CLOSE, 08=CLOSE_WAIT,
    ///   09=LAST_ACK, 0A=LISTEN, 0B=CLOSING, 0C=NEW_SYN_RECV
    pub fn from_kernel(value: u8) -> Option<Self> {
        match value {
            0x01 => Some(Self::Established),
            0x02 => Some(Self::SynSent),
            0x03 => Some(Self::SynReceived),
            0x04 => Some(Self::FinWait1),
            0x05 => Some(Self::FinWait2),
            0x06 => Some(Self::TimeWait),
            0x07 => Some(Self::Closed),
            0x08 => Some(Self::CloseWait),
            0x09 => Some(Self::LastAck),
            0x0A => Some(Self::Listen),
            0x0B => Some(Self::Closing),
            0x0C => Some(Self::NewSynReceived),
            _ => None,
        }
    }
}

impl std::fmt::Display for TcpState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Established => write!(f, "ESTABLISHED"),
            Self::SynSent => write!(f, "SYN_SENT"),
            Self::SynReceived => write!(f, "SYN_RECEIVED"),
            Self::FinWait1 => write!(f, "FIN_WAIT_1"),
            Self::FinWait2 => write!(f, "FIN_WAIT_2"),
            Self::TimeWait => write!(f, "TIME_WAIT"),
            Self::Closed => write!(f, "CLOSED"),
            Self::CloseWait => write!(f, "CLOSE_WAIT"),
            Self::LastAck => write!(f, "LAST_ACK"),
            Self::Listen => write!(f, "LISTEN"),
            Self::Closing => write!(f, "CLOSING"),
            Self::NewSynReceived => write!(f, "NEW_SYN_RECEIVED"),
        }
    }
}
