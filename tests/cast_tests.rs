//! # Ingestion Tests: Casting, Header and Size Estimate
//!
//! Validates fault-tolerant text to f32 casting, the running totals, header
//! parsing and the size estimator.

use fprep_core::{EngineConfig, FprepError};
use fprep_engine::cast::{cast_range, parse_token};
use fprep_engine::estimate::estimate;
use fprep_engine::header::parse_header;
use fprep_engine::Dataset;
use std::time::Instant;

fn config(workers: usize) -> EngineConfig {
    EngineConfig {
        workers,
        ..EngineConfig::default()
    }
}

/// Verifies the basic two-line, two-column case.
#[test]
fn test_cast_range_basic() {
    let t = Instant::now();

    let out = cast_range(b"1.0,2.0\n3.0,4.0\n", b',', b'\n', 0);
    assert_eq!(out.values, vec![1.0, 2.0, 3.0, 4.0]);
    assert_eq!(out.min, 1.0);
    assert_eq!(out.max, 4.0);

    let overhead = t.elapsed();
    println!("test_cast_range_basic: Testing Overhead = {:?}", overhead);
}

/// Verifies that malformed and empty tokens are skipped without failing.
#[test]
fn test_cast_range_skips_malformed_tokens() {
    let out = cast_range(b"1.0,x,3.0\n", b',', b'\n', 16);
    assert_eq!(out.values, vec![1.0, 3.0]);

    let out = cast_range(b"1.0,,2.0\n,\n", b',', b'\n', 16);
    assert_eq!(out.values, vec![1.0, 2.0]);

    let out = cast_range(b"abc,def\n", b',', b'\n', 16);
    assert!(out.values.is_empty());
}

/// Verifies that surrounding whitespace and CRLF endings do not break tokens.
#[test]
fn test_cast_range_whitespace_and_crlf() {
    let out = cast_range(b"1.5, 2.5\r\n-3e2,\t4\r\n", b',', b'\n', 0);
    assert_eq!(out.values, vec![1.5, 2.5, -300.0, 4.0]);
    assert_eq!(out.min, -300.0);
}

#[test]
fn test_parse_token() {
    assert_eq!(parse_token(b"0.25"), Some(0.25));
    assert_eq!(parse_token(b"-1e-3"), Some(-1e-3));
    assert_eq!(parse_token(b"1.0.0"), None);
    assert_eq!(parse_token(&[0xff, 0xfe]), None);
}

/// Verifies header splitting, CRLF stripping and the body offset.
#[test]
fn test_parse_header() {
    let header = parse_header(b"a,b,c\r\n1,2,3\n", b',', b'\n').unwrap();
    assert_eq!(header.names, vec!["a", "b", "c"]);
    assert_eq!(header.body_offset, 7);

    let err = parse_header(b"a,b,c", b',', b'\n').unwrap_err();
    assert!(matches!(err, FprepError::MissingHeader));
}

/// Verifies the estimator on a sample of complete lines.
#[test]
fn test_estimate_complete_lines() {
    let body = b"1.5,2.5\n3.5,4.5\n";
    let guess = estimate(body, 300, 4096, b',', b'\n', 1.0);
    assert_eq!(guess.lines, 2);
    assert_eq!(guess.columns, 2);
    // 16 bytes - 2 delimiters - 2 terminators = 12 bytes over 4 floats.
    assert_eq!(guess.bytes_per_float, 3);
    assert_eq!(guess.floats, 100);

    let scaled = estimate(body, 300, 4096, b',', b'\n', 2.0);
    assert_eq!(scaled.floats, 200);
}

/// Verifies that a sample cut mid-line ignores the partial tail and that an
/// empty body estimates nothing.
#[test]
fn test_estimate_partial_and_empty() {
    let body = b"1.5,2.5\n3.5,4.5\n5.5,6.";
    let guess = estimate(body, 300, 20, b',', b'\n', 1.0);
    assert_eq!(guess.lines, 2);
    assert_eq!(guess.bytes_per_float, 3);

    let empty = estimate(b"", 10, 4096, b',', b'\n', 1.0);
    assert_eq!(empty.floats, 0);
}

/// Verifies the full load path on a small file and the running totals.
#[test]
fn test_dataset_load_small() {
    let t = Instant::now();

    let dataset = Dataset::load(b"a,b\n1.0,2.0\n3.0,4.0\n", config(1)).unwrap();
    assert_eq!(dataset.headers(), ["a", "b"]);
    assert_eq!(dataset.columns(), 2);
    assert_eq!(dataset.count(), 4);
    assert_eq!(dataset.totals().min(), 1.0);
    assert_eq!(dataset.totals().max(), 4.0);
    assert_eq!(dataset.values().collect::<Vec<_>>(), vec![1.0, 2.0, 3.0, 4.0]);

    let overhead = t.elapsed();
    println!("test_dataset_load_small: Testing Overhead = {:?}", overhead);
}

/// Verifies that parallel casting keeps every value in file order.
#[test]
fn test_dataset_load_parallel_preserves_order() {
    let t = Instant::now();

    let mut text = String::from("x,y\n");
    let mut expected = Vec::new();
    for i in 0..500 {
        text.push_str(&format!("{},{}.5\n", i, i));
        expected.push(i as f32);
        expected.push(i as f32 + 0.5);
    }

    let dataset = Dataset::load(text.as_bytes(), config(4)).unwrap();
    assert_eq!(dataset.partitions().len(), 4);
    assert_eq!(dataset.count(), expected.len());
    assert_eq!(dataset.partitions().iter().map(Vec::len).sum::<usize>(), expected.len());
    assert_eq!(dataset.values().collect::<Vec<_>>(), expected);
    assert_eq!(dataset.totals().min(), 0.0);
    assert_eq!(dataset.totals().max(), 499.5);

    let overhead = t.elapsed();
    println!("test_dataset_load_parallel_preserves_order: Testing Overhead = {:?}", overhead);
}

/// Verifies that a header-only file loads with nothing cast.
#[test]
fn test_dataset_load_header_only() {
    let dataset = Dataset::load(b"a,b\n", config(3)).unwrap();
    assert_eq!(dataset.count(), 0);
    assert_eq!(dataset.totals().min(), 0.0);
    assert_eq!(dataset.totals().max(), 0.0);
    assert!(dataset.partitions().iter().all(Vec::is_empty));
}

/// Verifies that a missing header and a bad config are reported.
#[test]
fn test_dataset_load_errors() {
    let err = Dataset::load(b"1,2,3", config(2)).unwrap_err();
    assert!(matches!(err, FprepError::MissingHeader));

    let err = Dataset::load(b"a\n1\n", config(0)).unwrap_err();
    assert!(matches!(err, FprepError::NoWorkers));
}

/// Verifies a custom delimiter end to end.
#[test]
fn test_dataset_load_semicolon_delimiter() {
    let config = EngineConfig {
        workers: 2,
        delimiter: b';',
        ..EngineConfig::default()
    };
    let dataset = Dataset::load(b"a;b\n1;2\n3;4\n", config).unwrap();
    assert_eq!(dataset.headers(), ["a", "b"]);
    assert_eq!(dataset.values().collect::<Vec<_>>(), vec![1.0, 2.0, 3.0, 4.0]);
}
