use core::ops::Range;

/// Splits `bytes` into `workers` contiguous, line-aligned ranges.
///
/// Each cut is placed right after the first `terminator` found at or after
/// `start + len / workers`, so no line straddles two ranges. The last range
/// runs to the end of the region. Concatenating the ranges in index order
/// yields `bytes` exactly. Small inputs may leave trailing ranges empty.
pub fn partition(bytes: &[u8], terminator: u8, workers: usize) -> Vec<Range<usize>> {
    if workers == 0 {
        return Vec::new();
    }
    let len = bytes.len();
    let chunk = len / workers;

    let mut ranges = Vec::with_capacity(workers);
    let mut start = 0usize;
    for _ in 1..workers {
        let target = start.saturating_add(chunk).min(len);
        let end = match memchr::memchr(terminator, &bytes[target..]) {
            Some(offset) => target + offset + 1,
            None => len,
        };
        ranges.push(start..end);
        start = end;
    }
    ranges.push(start..len);

    for (idx, range) in ranges.iter().enumerate() {
        if range.is_empty() {
            tracing::warn!("Partition {} is empty ({} bytes over {} workers)", idx, len, workers);
        }
    }
    ranges
}
