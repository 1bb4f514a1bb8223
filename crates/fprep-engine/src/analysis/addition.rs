use std::sync::{Mutex, PoisonError};

use fprep_core::Result;

use super::SamplePlan;
use crate::cast::RunningTotals;
use crate::dispatch::WorkerSet;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdditionResult {
    pub bias: f32,
    /// Mean squared round-trip error of `(v + bias) - bias`.
    pub error: f32,
    pub sampled: usize,
}

/// `2^(ceil(log2(max - min)) + 1) - min`.
///
/// A zero, negative or non-finite range uses exponent 0.
pub fn compute_bias(min: f32, max: f32) -> f32 {
    let range = max as f64 - min as f64;
    let exponent = if range > 0.0 && range.is_finite() {
        range.log2().ceil()
    } else {
        0.0
    };
    (2f64.powf(exponent + 1.0) - min as f64) as f32
}

/// Squared round-trip error of one value, in single precision.
#[inline(always)]
fn round_trip_error(value: f32, bias: f32) -> f32 {
    let reconstructed = (value + bias) - bias;
    let delta = reconstructed - value;
    delta * delta
}

pub fn run_addition(
    partitions: &[Vec<f32>],
    totals: &RunningTotals,
    plan: &SamplePlan,
    workers: &WorkerSet,
) -> Result<AdditionResult> {
    let bias = compute_bias(totals.min(), totals.max());
    tracing::info!(
        "Addition: bias {} from range [{}, {}], {} values per worker",
        bias,
        totals.min(),
        totals.max(),
        plan.per_worker
    );

    let shared = Mutex::new(AdditionResult {
        bias,
        error: 0.0,
        sampled: 0,
    });

    workers.fork_join("addition", |idx| {
        let sample = partitions.get(idx).map(|p| plan.front(p)).unwrap_or(&[]);
        let mut error = 0.0f32;
        for &value in sample {
            error += plan.mean_factor * round_trip_error(value, bias);
        }

        let mut result = shared.lock().unwrap_or_else(PoisonError::into_inner);
        result.error += error;
        result.sampled += sample.len();
    })?;

    Ok(shared.into_inner().unwrap_or_else(PoisonError::into_inner))
}
