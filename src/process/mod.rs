// Process lookup: which process holds a given socket inode.
//
// The resolver only depends on the ProcessLookup trait. ProcfsLookup is the
// Linux implementation: it scans /proc/<pid>/fd/ for "socket:[INODE]" links.

pub mod procfs;

pub use procfs::{DEFAULT_PROC_ROOT, ProcfsLookup, parse_socket_inode};

use serde::Serialize;

use crate::error::SockOwnerError;

/// The process found holding a socket.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ProcessRecord {
    pub pid: u32,
    pub command: String,
    pub cmdline: Option<String>,
}

pub trait ProcessLookup {
    /// `Ok(None)` when no process holds the inode (closed socket, exited
    /// process, or one we are not allowed to inspect).
    fn find_process_for_inode(&self, inode: u64) -> Result<Option<ProcessRecord>, SockOwnerError>;
}
