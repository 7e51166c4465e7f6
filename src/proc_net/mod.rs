// Linux TCP connection table (/proc/net/tcp).
//
// parser:  one table line -> TableRow (tuple, inode, state, uid)
// scanner: one read of the whole table -> lazy iterator of TableRow

pub mod parser;
pub mod scanner;

pub use parser::{TableRow, parse_line};
pub use scanner::{DEFAULT_TCP_TABLE, Rows, TcpTable};
