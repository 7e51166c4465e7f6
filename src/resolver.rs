// Connection -> owning process resolution.
//
// 1. Read /proc/net/tcp once -> rows of (tuple, inode)
// 2. First row whose tuple matches the target wins
// 3. Ask the ProcessLookup which process holds that inode (best-effort)

use std::path::PathBuf;

use crate::error::SockOwnerError;
use crate::model::{ConnectionQuery, ConnectionTuple, TcpState};
use crate::proc_net::{DEFAULT_TCP_TABLE, TcpTable};
use crate::process::{ProcessLookup, ProcessRecord};

/// Where the resolver reads the connection table from. The process tree is
/// the [`ProcessLookup`]'s concern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverConfig {
    pub tcp_table: PathBuf,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            tcp_table: PathBuf::from(DEFAULT_TCP_TABLE),
        }
    }
}

/// A table row that matched the target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionMatch {
    pub tuple: ConnectionTuple,
    pub inode: u64,
    pub state: Option<TcpState>,
    pub uid: Option<u32>,
    /// `None` when the owner could not be determined.
    pub process: Option<ProcessRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Found(ConnectionMatch),
    NotFound,
}

impl Resolution {
    pub fn inode(&self) -> Option<u64> {
        match self {
            Self::Found(m) => Some(m.inode),
            Self::NotFound => None,
        }
    }
}

pub struct ConnectionResolver<L> {
    config: ResolverConfig,
    lookup: L,
}

impl<L: ProcessLookup> ConnectionResolver<L> {
    pub fn new(config: ResolverConfig, lookup: L) -> Self {
        Self { config, lookup }
    }

    /// Resolve `target` against a fresh read of the connection table.
    ///
    /// An unreadable table is an error (`TableUnavailable`); a readable table
    /// without a matching row is `Ok(Resolution::NotFound)`.
    pub fn resolve(&self, target: &ConnectionQuery) -> Result<Resolution, SockOwnerError> {
        let table = TcpTable::open(&self.config.tcp_table)?;
        Ok(self.resolve_in(&table, target))
    }

    /// Inode of the connection, or `None` for any failure including an
    /// unreadable table.
    pub fn resolve_inode(&self, target: &ConnectionQuery) -> Option<u64> {
        match self.resolve(target) {
            Ok(resolution) => resolution.inode(),
            Err(e) => {
                log::debug!("resolve {target}: {e}");
                None
            }
        }
    }

    /// Resolve `target` against an already loaded snapshot.
    ///
    /// Duplicate tuples are not checked for: the first matching row wins.
    /// A query with an unparsed field matches no row.
    pub fn resolve_in(&self, table: &TcpTable, target: &ConnectionQuery) -> Resolution {
        let Some(row) = table.rows().find(|row| target.matches(&row.tuple)) else {
            log::debug!("no table row matches {target}");
            return Resolution::NotFound;
        };
        log::debug!("{target} matched slot {} inode {}", row.slot, row.inode);

        let process = match self.lookup.find_process_for_inode(row.inode) {
            Ok(Some(record)) => Some(record),
            Ok(None) => {
                log::debug!("no process holds socket inode {}", row.inode);
                None
            }
            Err(e) => {
                log::warn!("process lookup for inode {} failed: {e}", row.inode);
                None
            }
        };

        Resolution::Found(ConnectionMatch {
            tuple: row.tuple,
            inode: row.inode,
            state: row.state,
            uid: row.uid,
            process,
        })
    }
}
