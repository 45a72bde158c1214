//! Response rendering for the binary.

use std::io::Write;

use crate::transport::Response;

/// Write `response` the way curl does: the body, preceded by the status
/// line and headers when `include` is set.
pub fn write_response<W: Write>(
    out: &mut W,
    response: &Response,
    include: bool,
) -> std::io::Result<()> {
    if include {
        write!(out, "{}\r\n", response.status_line())?;
        for (name, value) in &response.headers {
            write!(out, "{name}: {value}\r\n")?;
        }
        out.write_all(b"\r\n")?;
    }
    out.write_all(&response.body)?;
    out.flush()
}
