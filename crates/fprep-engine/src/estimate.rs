/// Result of sampling the front of the body. A guess, used only to reserve
/// storage before casting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SizeEstimate {
    pub lines: usize,
    pub columns: usize,
    pub bytes_per_float: usize,
    pub floats: usize,
}

/// Predicts how many floats a file of `total_len` bytes holds from the first
/// `sample_bytes` bytes of its body.
pub fn estimate(
    body: &[u8],
    total_len: usize,
    sample_bytes: usize,
    delimiter: u8,
    terminator: u8,
    scaling: f32,
) -> SizeEstimate {
    let sample = &body[..sample_bytes.min(body.len())];
    if sample.is_empty() {
        return SizeEstimate::default();
    }

    let first_line = match memchr::memchr(terminator, sample) {
        Some(end) => &sample[..end],
        None => sample,
    };
    let columns = memchr::memchr_iter(delimiter, first_line).count() + 1;

    // Only complete lines count; a sample without any terminator is one line.
    let (lines, consumed) = match memchr::memrchr(terminator, sample) {
        Some(last) => (memchr::memchr_iter(terminator, sample).count(), last + 1),
        None => (1, sample.len()),
    };

    let delimiter_bytes = (columns - 1) * lines;
    let float_bytes = consumed.saturating_sub(delimiter_bytes).saturating_sub(lines);
    let bytes_per_float = (float_bytes / (columns * lines)).max(1);
    let floats = (total_len as f64 * scaling as f64 / bytes_per_float as f64) as usize;

    tracing::debug!(
        "Size estimate: {} lines x {} columns sampled, {} bytes/float, ~{} floats",
        lines,
        columns,
        bytes_per_float,
        floats
    );
    SizeEstimate {
        lines,
        columns,
        bytes_per_float,
        floats,
    }
}
