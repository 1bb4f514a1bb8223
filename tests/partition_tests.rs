//! # Ingestion Tests: Line-Aligned Partitioning
//!
//! Validates that partitions cover the buffer exactly, in order, and never
//! split a line.

use fprep_engine::partition::partition;
use proptest::prelude::*;
use std::time::Instant;

fn assert_line_aligned(bytes: &[u8], workers: usize) {
    let ranges = partition(bytes, b'\n', workers);
    assert_eq!(ranges.len(), workers);

    // Contiguous, starting at 0 and ending at len.
    assert_eq!(ranges[0].start, 0);
    assert_eq!(ranges[workers - 1].end, bytes.len());
    for pair in ranges.windows(2) {
        assert_eq!(pair[0].end, pair[1].start);
    }

    // Every interior boundary sits right after a terminator, or at the end.
    for range in &ranges[..workers - 1] {
        assert!(range.end == bytes.len() || bytes[range.end - 1] == b'\n');
    }

    let rebuilt: Vec<u8> = ranges.iter().flat_map(|r| bytes[r.clone()].iter().copied()).collect();
    assert_eq!(rebuilt, bytes);
}

/// Verifies that a single worker gets the whole buffer.
#[test]
fn test_partition_single_worker() {
    let t = Instant::now();

    let bytes = b"1.0,2.0\n3.0,4.0\n";
    let ranges = partition(bytes, b'\n', 1);
    assert_eq!(ranges, vec![0..bytes.len()]);

    let overhead = t.elapsed();
    println!("test_partition_single_worker: Testing Overhead = {:?}", overhead);
}

/// Verifies that boundaries snap forward past the next terminator.
#[test]
fn test_partition_snaps_to_line_end() {
    let bytes = b"11,22\n33,44\n55,66\n77,88\n";
    let ranges = partition(bytes, b'\n', 2);

    // Midpoint is byte 12, which is already a line start; the cut lands after
    // the terminator that follows it.
    assert_eq!(ranges[0], 0..18);
    assert_eq!(ranges[1], 18..24);
    assert_line_aligned(bytes, 2);
}

/// Verifies that more workers than lines yields empty trailing partitions.
#[test]
fn test_partition_more_workers_than_lines() {
    let t = Instant::now();

    let bytes = b"1,2\n3,4\n";
    let ranges = partition(bytes, b'\n', 8);
    assert_line_aligned(bytes, 8);
    assert!(ranges.iter().filter(|r| r.is_empty()).count() >= 6);

    let overhead = t.elapsed();
    println!("test_partition_more_workers_than_lines: Testing Overhead = {:?}", overhead);
}

/// Verifies that a body without a trailing terminator keeps its last line.
#[test]
fn test_partition_without_trailing_terminator() {
    let bytes = b"1,2\n3,4\n5,6";
    assert_line_aligned(bytes, 3);
}

/// Verifies the degenerate inputs.
#[test]
fn test_partition_degenerate_inputs() {
    assert!(partition(b"1,2\n", b'\n', 0).is_empty());

    let ranges = partition(b"", b'\n', 4);
    assert_eq!(ranges.len(), 4);
    assert!(ranges.iter().all(|r| r.is_empty()));
}

proptest! {
    #[test]
    fn prop_partitions_reconstruct_input(
        lines in prop::collection::vec("[0-9.,x]{0,12}", 0..64),
        trailing in any::<bool>(),
        workers in 1usize..16,
    ) {
        let mut text = lines.join("\n");
        if trailing {
            text.push('\n');
        }
        assert_line_aligned(text.as_bytes(), workers);
    }
}
