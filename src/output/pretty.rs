use std::io::Write;

use crate::error::SockOwnerError;
use crate::model::ConnectionQuery;
use crate::process::ProcessRecord;
use crate::resolver::{ConnectionMatch, Resolution};

/// Write a resolution as a few human-readable lines.
pub fn write_pretty(
    target: &ConnectionQuery,
    resolution: &Resolution,
    writer: &mut impl Write,
) -> Result<(), SockOwnerError> {
    write_pretty_inner(target, resolution, writer).map_err(SockOwnerError::Output)
}

fn write_pretty_inner(
    target: &ConnectionQuery,
    resolution: &Resolution,
    w: &mut impl Write,
) -> Result<(), std::io::Error> {
    writeln!(w, "{target}")?;
    match resolution {
        Resolution::Found(m) => {
            writeln!(w, "{}", describe_socket(m))?;
            match &m.process {
                Some(process) => write_process(w, process)?,
                None => writeln!(w, "no owning process found")?,
            }
        }
        Resolution::NotFound => writeln!(w, "connection not found")?,
    }
    Ok(())
}

fn describe_socket(m: &ConnectionMatch) -> String {
    let mut line = format!("inode {}", m.inode);
    if let Some(state) = m.state {
        line.push_str(&format!(", state {state}"));
    }
    if let Some(uid) = m.uid {
        line.push_str(&format!(", uid {uid}"));
    }
    line
}

fn write_process(w: &mut impl Write, process: &ProcessRecord) -> Result<(), std::io::Error> {
    writeln!(w, "Found in cmd {} (pid = {})", process.command, process.pid)?;
    if let Some(cmdline) = &process.cmdline {
        writeln!(w, "cmdline: {cmdline}")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ConnectionTuple, TcpState};

    fn target() -> ConnectionTuple {
        ConnectionTuple::try_parse("127.0.0.1:8080", "10.0.0.2:443").unwrap()
    }

    fn render_for(query: &ConnectionQuery, resolution: &Resolution) -> String {
        let mut buf = Vec::new();
        write_pretty(query, resolution, &mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    fn render(resolution: &Resolution) -> String {
        render_for(&target().into(), resolution)
    }

    #[test]
    fn found_with_process() {
        let resolution = Resolution::Found(ConnectionMatch {
            tuple: target(),
            inode: 67890,
            state: Some(TcpState::Established),
            uid: Some(1000),
            process: Some(ProcessRecord {
                pid: 4321,
                command: "nginx".to_string(),
                cmdline: Some("nginx -g daemon off;".to_string()),
            }),
        });
        assert_eq!(
            render(&resolution),
            "127.0.0.1:8080 -> 10.0.0.2:443\n\
             inode 67890, state ESTABLISHED, uid 1000\n\
             Found in cmd nginx (pid = 4321)\n\
             cmdline: nginx -g daemon off;\n"
        );
    }

    #[test]
    fn found_without_process() {
        let resolution = Resolution::Found(ConnectionMatch {
            tuple: target(),
            inode: 5,
            state: None,
            uid: None,
            process: None,
        });
        assert_eq!(
            render(&resolution),
            "127.0.0.1:8080 -> 10.0.0.2:443\ninode 5\nno owning process found\n"
        );
    }

    #[test]
    fn not_found() {
        assert_eq!(
            render(&Resolution::NotFound),
            "127.0.0.1:8080 -> 10.0.0.2:443\nconnection not found\n"
        );
    }

    #[test]
    fn not_found_shows_unparsed_fields() {
        let query = ConnectionQuery::parse("127.0.0.1:http", "10.0.0.2:443");
        assert_eq!(
            render_for(&query, &Resolution::NotFound),
            "127.0.0.1:? -> 10.0.0.2:443\nconnection not found\n"
        );
    }
}
