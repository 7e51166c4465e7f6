use std::fs;
use std::path::Path;
use std::str::Lines;

use crate::error::SockOwnerError;

use super::parser::{TableRow, parse_line};

pub const DEFAULT_TCP_TABLE: &str = "/proc/net/tcp";

/// A point-in-time snapshot of the TCP connection table.
///
/// The resource is read exactly once, in [`TcpTable::open`]. The kernel
/// regenerates the file on every read, so a later `open` may see different
/// rows.
#[derive(Debug, Clone)]
pub struct TcpTable {
    content: String,
}

impl TcpTable {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, SockOwnerError> {
        let path = path.as_ref();
        let content =
            fs::read_to_string(path).map_err(|source| SockOwnerError::TableUnavailable {
                path: path.to_path_buf(),
                source,
            })?;
        log::debug!("read {} bytes from {}", content.len(), path.display());
        Ok(Self { content })
    }

    pub fn from_content(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }

    /// Size of the snapshot in bytes.
    pub fn len(&self) -> usize {
        self.content.len()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Decoded rows, in table order. Lines that do not parse (the column
    /// header among them) are skipped.
    pub fn rows(&self) -> Rows<'_> {
        Rows {
            lines: self.content.lines(),
        }
    }
}

/// Lazy iterator over the rows of a [`TcpTable`].
pub struct Rows<'a> {
    lines: Lines<'a>,
}

impl Iterator for Rows<'_> {
    type Item = TableRow;

    fn next(&mut self) -> Option<TableRow> {
        for line in self.lines.by_ref() {
            if let Some(row) = parse_line(line) {
                return Some(row);
            }
            if !line.trim().is_empty() {
                log::trace!("skipping unparseable table line: {line:?}");
            }
        }
        None
    }
}

impl std::iter::FusedIterator for Rows<'_> {}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "  sl  local_address rem_address   st tx_queue rx_queue tr tm->when retrnsmt   uid  timeout inode\n";

    #[test]
    fn header_only_yields_nothing() {
        let table = TcpTable::from_content(HEADER);
        assert_eq!(table.rows().count(), 0);
    }

    #[test]
    fn empty_content_yields_nothing() {
        let table = TcpTable::from_content("");
        assert!(table.is_empty());
        assert_eq!(table.rows().count(), 0);
    }

    #[test]
    fn rows_come_back_in_table_order() {
        let content = format!(
            "{HEADER}\
   0: 0100007F:0035 00000000:0000 0A 00000000:00000000 00:00000000 00000000     0        0 111 1 0000000000000000 100 0 0 10 0
   1: 0100007F:1F90 00000000:0000 0A 00000000:00000000 00:00000000 00000000     0        0 222 1 0000000000000000 100 0 0 10 0
"
        );
        let table = TcpTable::from_content(content);
        let inodes: Vec<u64> = table.rows().map(|r| r.inode).collect();
        assert_eq!(inodes, vec![111, 222]);
    }

    #[test]
    fn malformed_lines_are_skipped_not_zeroed() {
        let content = format!(
            "{HEADER}\
garbage line
   0: 0100007F:0035 00000000:0000 0A 00000000:00000000 00:00000000 00000000     0        0 111 1 0000000000000000 100 0 0 10 0

   1: XXXXXXXX:1F90 00000000:0000 0A 00000000:00000000 00:00000000 00000000     0        0 222 1 0000000000000000 100 0 0 10 0
"
        );
        let table = TcpTable::from_content(content);
        let rows: Vec<TableRow> = table.rows().collect();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].inode, 111);
        assert!(rows.iter().all(|r| !r.tuple.is_unspecified()));
    }

    #[test]
    fn rows_is_single_pass() {
        let content = format!(
            "{HEADER}   0: 0100007F:0035 00000000:0000 0A 00000000:00000000 00:00000000 00000000     0        0 111 1\n"
        );
        let table = TcpTable::from_content(content);
        let mut rows = table.rows();
        assert!(rows.next().is_some());
        assert!(rows.next().is_none());
        assert!(rows.next().is_none());
    }

    #[test]
    fn open_missing_file_is_table_unavailable() {
        let path = std::env::temp_dir().join("sockowner_scanner_missing_table");
        std::fs::remove_file(&path).ok();
        match TcpTable::open(&path) {
            Err(SockOwnerError::TableUnavailable { path: p, source }) => {
                assert_eq!(p, path);
                assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
            }
            other => panic!("expected TableUnavailable, got {other:?}"),
        }
    }

    #[test]
    fn open_reads_file_once() {
        let path = std::env::temp_dir().join(format!(
            "sockowner_scanner_table_{}",
            std::process::id()
        ));
        let content = format!(
            "{HEADER}   0: 0100007F:0035 00000000:0000 0A 00000000:00000000 00:00000000 00000000     0        0 4242 1\n"
        );
        std::fs::write(&path, &content).unwrap();

        let table = TcpTable::open(&path).unwrap();
        // later changes to the resource do not affect the snapshot
        std::fs::remove_file(&path).ok();

        assert_eq!(table.len(), content.len());
        let rows: Vec<TableRow> = table.rows().collect();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].inode, 4242);
    }
}
