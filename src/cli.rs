use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::error::SockOwnerError;
use crate::model::{ConnectionQuery, ConnectionTuple};
use crate::proc_net::DEFAULT_TCP_TABLE;
use crate::process::{DEFAULT_PROC_ROOT, ProcfsLookup};
use crate::resolver::ResolverConfig;

#[derive(Parser, Debug)]
#[command(
    name = "sockowner",
    version,
    about = "Find the process that owns a TCP connection"
)]
pub struct Cli {
    /// Local endpoint of the connection, as host:port
    pub source: String,

    /// Remote endpoint of the connection, as host:port
    pub dest: String,

    /// TCP connection table to read
    #[arg(long, default_value = DEFAULT_TCP_TABLE, value_parser = validate_path)]
    pub table: PathBuf,

    /// Root of the process information filesystem
    #[arg(long, default_value = DEFAULT_PROC_ROOT, value_parser = validate_path)]
    pub proc_root: PathBuf,

    /// Output format [default: pretty]
    #[arg(long, default_value = "pretty")]
    pub format: OutputFormat,

    /// Look up the connection even when some endpoint fields do not parse;
    /// such fields match no row
    #[arg(long)]
    pub lenient: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Pretty,
    Json,
}

impl Cli {
    /// The connection to look up, parsed according to `--lenient`.
    pub fn target(&self) -> Result<ConnectionQuery, SockOwnerError> {
        if self.lenient {
            Ok(ConnectionQuery::parse(&self.source, &self.dest))
        } else {
            ConnectionTuple::try_parse(&self.source, &self.dest).map(ConnectionQuery::from)
        }
    }

    pub fn resolver_config(&self) -> ResolverConfig {
        ResolverConfig {
            tcp_table: self.table.clone(),
        }
    }

    pub fn lookup(&self) -> ProcfsLookup {
        ProcfsLookup::new(&self.proc_root)
    }
}

fn validate_path(s: &str) -> Result<PathBuf, String> {
    if s.trim().is_empty() {
        Err("path must not be empty".to_string())
    } else {
        Ok(PathBuf::from(s))
    }
}
