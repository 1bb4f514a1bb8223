use std::sync::{Mutex, PoisonError};

use fprep_core::bits::{to_bits, trailing_run_po5};
use fprep_core::{Result, POWERS_OF_FIVE};
use fprep_dsa::TrailingRunHistogram;

use super::SamplePlan;
use crate::dispatch::WorkerSet;

/// One histogram per entry of [`POWERS_OF_FIVE`], same order.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PowersOfFiveResult {
    pub histograms: [TrailingRunHistogram; 3],
    pub sampled: usize,
}

impl PowersOfFiveResult {
    pub fn for_power(&self, multiplier: u32) -> Option<&TrailingRunHistogram> {
        POWERS_OF_FIVE
            .iter()
            .position(|&m| m == multiplier)
            .map(|idx| &self.histograms[idx])
    }
}

pub fn analyze_sample(sample: &[f32]) -> [TrailingRunHistogram; 3] {
    let mut histograms = [TrailingRunHistogram::new(); 3];
    for &value in sample {
        for (histogram, &power) in histograms.iter_mut().zip(POWERS_OF_FIVE.iter()) {
            let scaled = value * power as f32;
            histogram.record(trailing_run_po5(to_bits(scaled)));
        }
    }
    histograms
}

pub fn run_powers_of_five(
    partitions: &[Vec<f32>],
    plan: &SamplePlan,
    workers: &WorkerSet,
) -> Result<PowersOfFiveResult> {
    tracing::info!("Powers of five: {} values per worker", plan.per_worker);
    let shared = Mutex::new(PowersOfFiveResult::default());

    workers.fork_join("powers", |idx| {
        let sample = partitions.get(idx).map(|p| plan.front(p)).unwrap_or(&[]);
        let local = analyze_sample(sample);

        let mut shared = shared.lock().unwrap_or_else(PoisonError::into_inner);
        for (dst, src) in shared.histograms.iter_mut().zip(local.iter()) {
            dst.merge(src);
        }
        shared.sampled += sample.len();
    })?;

    Ok(shared.into_inner().unwrap_or_else(PoisonError::into_inner))
}
