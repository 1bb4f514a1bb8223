use std::collections::BTreeMap;
use std::sync::{Mutex, PoisonError};

use fprep_core::bits::{to_bits, trailing_run};
use fprep_core::{ForcedPattern, Result, SchemeKey, SchemeResult};

use super::SamplePlan;
use crate::dispatch::WorkerSet;

/// Results keyed by (multiplier, bit width), ordered by multiplier first.
pub type MultiplicationTable = BTreeMap<SchemeKey, SchemeResult>;

#[derive(Debug, Clone, PartialEq)]
pub struct MultiplicationResult {
    pub table: MultiplicationTable,
    pub sampled: usize,
}

/// Statistics of one pattern over one worker's sample.
///
/// Zeros go straight to the skipped bucket and stay out of the error terms.
pub fn analyze_sample(sample: &[f32], pattern: &ForcedPattern, mean_factor: f32) -> SchemeResult {
    let mut result = SchemeResult::default();
    let multiplier = pattern.multiplier() as f32;

    for &value in sample {
        if value == 0.0 {
            result.histogram.record_skipped();
            continue;
        }

        let scaled = pattern.apply(value);
        result.histogram.record(trailing_run(to_bits(scaled)));

        let deviation = scaled / multiplier - value;
        result.mse += mean_factor * deviation * deviation;

        let relative = (deviation / value).abs();
        if relative > result.max_relative_deviation {
            result.max_relative_deviation = relative;
        }
    }
    result
}

pub fn run_multiplication(
    partitions: &[Vec<f32>],
    patterns: &[ForcedPattern],
    plan: &SamplePlan,
    workers: &WorkerSet,
) -> Result<MultiplicationResult> {
    tracing::info!(
        "Multiplication: {} (M, P) pairs, {} values per worker",
        patterns.len(),
        plan.per_worker
    );

    // Every pair gets its slot before any worker runs.
    let table: MultiplicationTable = patterns
        .iter()
        .map(|pattern| (pattern.key(), SchemeResult::default()))
        .collect();
    let shared = Mutex::new(MultiplicationResult { table, sampled: 0 });

    workers.fork_join("multiplication", |idx| {
        let sample = partitions.get(idx).map(|p| plan.front(p)).unwrap_or(&[]);
        let local: Vec<(SchemeKey, SchemeResult)> = patterns
            .iter()
            .map(|pattern| (pattern.key(), analyze_sample(sample, pattern, plan.mean_factor)))
            .collect();

        let mut shared = shared.lock().unwrap_or_else(PoisonError::into_inner);
        for (key, result) in &local {
            shared.table.entry(*key).or_default().merge(result);
        }
        shared.sampled += sample.len();
    })?;

    Ok(shared.into_inner().unwrap_or_else(PoisonError::into_inner))
}
