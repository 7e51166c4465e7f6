pub mod json;
pub mod pretty;

use std::io::Write;

use crate::cli::OutputFormat;
use crate::error::SockOwnerError;
use crate::model::ConnectionQuery;
use crate::resolver::Resolution;

/// Write the outcome of resolving `target` in the specified format.
pub fn write_resolution(
    target: &ConnectionQuery,
    resolution: &Resolution,
    format: OutputFormat,
    writer: &mut impl Write,
) -> Result<(), SockOwnerError> {
    match format {
        OutputFormat::Pretty => pretty::write_pretty(target, resolution, writer),
        OutputFormat::Json => json::write_json(target, resolution, writer),
    }
}
