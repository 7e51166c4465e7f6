use std::io::Write;

use serde::Serialize;

use crate::error::SockOwnerError;
use crate::model::{ConnectionQuery, TcpState};
use crate::process::ProcessRecord;
use crate::resolver::Resolution;

#[derive(Serialize)]
struct JsonResolution<'a> {
    found: bool,
    tuple: String,
    inode: Option<u64>,
    state: Option<TcpState>,
    uid: Option<u32>,
    process: Option<&'a ProcessRecord>,
}

impl<'a> JsonResolution<'a> {
    fn new(target: &ConnectionQuery, resolution: &'a Resolution) -> Self {
        match resolution {
            Resolution::Found(m) => Self {
                found: true,
                tuple: m.tuple.to_string(),
                inode: Some(m.inode),
                state: m.state,
                uid: m.uid,
                process: m.process.as_ref(),
            },
            Resolution::NotFound => Self {
                found: false,
                tuple: target.to_string(),
                inode: None,
                state: None,
                uid: None,
                process: None,
            },
        }
    }
}

/// Write a resolution as a JSON object to the given writer.
pub fn write_json(
    target: &ConnectionQuery,
    resolution: &Resolution,
    writer: &mut impl Write,
) -> Result<(), SockOwnerError> {
    serde_json::to_writer_pretty(&mut *writer, &JsonResolution::new(target, resolution))
        .map_err(|e| SockOwnerError::Serialization(std::io::Error::other(e.to_string())))?;
    writeln!(writer).map_err(SockOwnerError::Output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ConnectionTuple;
    use crate::resolver::ConnectionMatch;

    fn target() -> ConnectionTuple {
        ConnectionTuple::try_parse("192.168.1.100:443", "10.0.0.2:50000").unwrap()
    }

    fn render(resolution: &Resolution) -> serde_json::Value {
        render_for(&target().into(), resolution)
    }

    fn render_for(query: &ConnectionQuery, resolution: &Resolution) -> serde_json::Value {
        let mut buf = Vec::new();
        write_json(query, resolution, &mut buf).unwrap();
        let output = String::from_utf8(buf).unwrap();
        assert!(output.ends_with('\n'));
        serde_json::from_str(&output).unwrap()
    }

    #[test]
    fn found_is_valid_json() {
        let resolution = Resolution::Found(ConnectionMatch {
            tuple: target(),
            inode: 67890,
            state: Some(TcpState::Established),
            uid: Some(1000),
            process: Some(ProcessRecord {
                pid: 4321,
                command: "curl".to_string(),
                cmdline: None,
            }),
        });
        let parsed = render(&resolution);
        assert_eq!(parsed["found"], true);
        assert_eq!(parsed["tuple"], "192.168.1.100:443 -> 10.0.0.2:50000");
        assert_eq!(parsed["inode"], 67890);
        assert_eq!(parsed["state"], "ESTABLISHED");
        assert_eq!(parsed["uid"], 1000);
        assert_eq!(parsed["process"]["pid"], 4321);
        assert_eq!(parsed["process"]["command"], "curl");
        assert!(parsed["process"]["cmdline"].is_null());
    }

    #[test]
    fn not_found_has_null_fields() {
        let parsed = render(&Resolution::NotFound);
        assert_eq!(parsed["found"], false);
        assert_eq!(parsed["tuple"], "192.168.1.100:443 -> 10.0.0.2:50000");
        assert!(parsed["inode"].is_null());
        assert!(parsed["process"].is_null());
    }

    #[test]
    fn not_found_tuple_marks_unparsed_fields() {
        let query = ConnectionQuery::parse("192.168.1.100:443", "nowhere");
        let parsed = render_for(&query, &Resolution::NotFound);
        assert_eq!(parsed["found"], false);
        assert_eq!(parsed["tuple"], "192.168.1.100:443 -> ?:?");
    }
}
