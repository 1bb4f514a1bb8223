use fprep_core::{FprepError, Result};

/// The header row and where the numeric body starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub names: Vec<String>,
    /// Offset of the first byte after the header's line terminator.
    pub body_offset: usize,
}

/// Splits the first line of `bytes` on `delimiter`.
pub fn parse_header(bytes: &[u8], delimiter: u8, terminator: u8) -> Result<Header> {
    let line_end = memchr::memchr(terminator, bytes).ok_or(FprepError::MissingHeader)?;
    let mut line = &bytes[..line_end];
    if terminator == b'\n' {
        if let Some(stripped) = line.strip_suffix(b"\r") {
            line = stripped;
        }
    }

    let names = line
        .split(|&b| b == delimiter)
        .map(|name| String::from_utf8_lossy(name).into_owned())
        .collect::<Vec<_>>();

    tracing::debug!("Header: {} columns, body at byte {}", names.len(), line_end + 1);
    Ok(Header {
        names,
        body_offset: line_end + 1,
    })
}
