//! # Engine Tests: Fork-Join Dispatch
//!
//! Validates worker indexing, thread naming, exclusive partition ownership
//! and panic propagation.

use fprep_core::FprepError;
use fprep_engine::WorkerSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

/// Verifies that results come back in worker order.
#[test]
fn test_fork_join_results_in_worker_order() {
    let t = Instant::now();

    let workers = WorkerSet::new(6, false).unwrap();
    let results = workers.fork_join("order", |idx| idx * 10).unwrap();
    assert_eq!(results, vec![0, 10, 20, 30, 40, 50]);

    let overhead = t.elapsed();
    println!("test_fork_join_results_in_worker_order: Testing Overhead = {:?}", overhead);
}

/// Verifies that every worker runs on its own named thread.
#[test]
fn test_fork_join_thread_names() {
    let workers = WorkerSet::new(3, false).unwrap();
    let names = workers
        .fork_join("naming", |_| std::thread::current().name().map(String::from))
        .unwrap();
    assert_eq!(
        names,
        vec![
            Some("fprep-naming-0".to_string()),
            Some("fprep-naming-1".to_string()),
            Some("fprep-naming-2".to_string()),
        ]
    );
}

/// Verifies that the call returns only after every worker finished.
#[test]
fn test_fork_join_is_a_barrier() {
    let workers = WorkerSet::new(4, false).unwrap();
    let done = AtomicUsize::new(0);
    workers
        .fork_join("barrier", |_| {
            std::thread::sleep(std::time::Duration::from_millis(5));
            done.fetch_add(1, Ordering::SeqCst);
        })
        .unwrap();
    assert_eq!(done.load(Ordering::SeqCst), 4);
}

/// Verifies that worker `i` gets part `i` and nothing else.
#[test]
fn test_fork_join_mut_exclusive_parts() {
    let workers = WorkerSet::new(4, false).unwrap();
    let mut parts = vec![vec![0u32; 3]; 4];
    let lens = workers
        .fork_join_mut("mutate", &mut parts, |idx, part| {
            for slot in part.iter_mut() {
                *slot = idx as u32;
            }
            part.len()
        })
        .unwrap();
    assert_eq!(lens, vec![3; 4]);
    for (idx, part) in parts.iter().enumerate() {
        assert!(part.iter().all(|&v| v == idx as u32));
    }
}

/// Verifies that pinning still runs every worker, with or without core ids.
#[test]
fn test_fork_join_pinned() {
    let workers = WorkerSet::new(2, true).unwrap();
    let results = workers.fork_join("pinned", |idx| idx).unwrap();
    assert_eq!(results, vec![0, 1]);
}

#[test]
fn test_worker_set_rejects_zero() {
    assert!(matches!(WorkerSet::new(0, false), Err(FprepError::NoWorkers)));
}

/// Verifies that a worker panic surfaces on the caller.
#[test]
#[should_panic(expected = "worker 1 failed")]
fn test_fork_join_propagates_panic() {
    let workers = WorkerSet::new(2, false).unwrap();
    let _ = workers.fork_join("panic", |idx| {
        if idx == 1 {
            panic!("worker 1 failed");
        }
        idx
    });
}
