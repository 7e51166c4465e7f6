use std::fs;
use std::path::{Path, PathBuf};

use crate::error::SockOwnerError;

use super::{ProcessLookup, ProcessRecord};

pub const DEFAULT_PROC_ROOT: &str = "/proc";

/// Finds socket owners by walking `<proc_root>/<pid>/fd/`.
///
/// Every lookup is a fresh scan of the whole process tree; nothing is cached.
#[derive(Debug, Clone)]
pub struct ProcfsLookup {
    proc_root: PathBuf,
}

impl ProcfsLookup {
    pub fn new(proc_root: impl Into<PathBuf>) -> Self {
        Self {
            proc_root: proc_root.into(),
        }
    }

    fn read_record(&self, pid: u32) -> ProcessRecord {
        let pid_dir = self.proc_root.join(pid.to_string());
        ProcessRecord {
            pid,
            command: read_comm(&pid_dir),
            cmdline: read_cmdline(&pid_dir),
        }
    }
}

impl Default for ProcfsLookup {
    fn default() -> Self {
        Self::new(DEFAULT_PROC_ROOT)
    }
}

impl ProcessLookup for ProcfsLookup {
    fn find_process_for_inode(&self, inode: u64) -> Result<Option<ProcessRecord>, SockOwnerError> {
        let proc_dir =
            fs::read_dir(&self.proc_root).map_err(|source| SockOwnerError::ProcUnavailable {
                path: self.proc_root.clone(),
                source,
            })?;

        for entry in proc_dir.flatten() {
            // Only numeric directories (PIDs)
            let pid: u32 = match entry.file_name().to_string_lossy().parse() {
                Ok(v) => v,
                Err(_) => continue,
            };

            // May fail with EACCES for other users' processes, or the
            // process may have exited since read_dir listed it.
            let fd_entries = match fs::read_dir(entry.path().join("fd")) {
                Ok(d) => d,
                Err(e) => {
                    log::trace!("pid {pid}: cannot list fds: {e}");
                    continue;
                }
            };

            for fd_entry in fd_entries.flatten() {
                let Ok(link) = fs::read_link(fd_entry.path()) else {
                    continue;
                };
                if parse_socket_inode(&link.to_string_lossy()) == Some(inode) {
                    return Ok(Some(self.read_record(pid)));
                }
            }
        }

        Ok(None)
    }
}

/// Parse a readlink result like "socket:[12345]" -> Some(12345)
pub fn parse_socket_inode(link: &str) -> Option<u64> {
    let s = link.strip_prefix("socket:[")?;
    let s = s.strip_suffix(']')?;
    s.parse().ok()
}

fn read_comm(pid_dir: &Path) -> String {
    match fs::read_to_string(pid_dir.join("comm")) {
        Ok(s) => s.trim().to_string(),
        Err(_) => String::new(),
    }
}

/// Arguments are NUL-separated; kernel threads have an empty cmdline.
fn read_cmdline(pid_dir: &Path) -> Option<String> {
    let raw = fs::read(pid_dir.join("cmdline")).ok()?;
    let args: Vec<String> = raw
        .split(|b| *b == 0)
        .filter(|arg| !arg.is_empty())
        .map(|arg| String::from_utf8_lossy(arg).into_owned())
        .collect();
    if args.is_empty() {
        None
    } else {
        Some(args.join(" "))
    }
}
