use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum SockOwnerError {
    #[error("cannot read connection table {}: {source}", path.display())]
    TableUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot read process information root {}: {source}", path.display())]
    ProcUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid endpoint '{endpoint}': {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },
    #[error("serialization error: {0}")]
    Serialization(#[source] std::io::Error),
    #[error("output error: {0}")]
    Output(#[source] std::io::Error),
}
