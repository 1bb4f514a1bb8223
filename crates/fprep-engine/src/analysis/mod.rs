//! Sampled statistics over the cast partitions.
//!
//! Every analysis takes the same deterministic sample: the first
//! `per_worker` values of each partition. Workers accumulate privately and
//! merge into the shared result with a single lock acquisition each.

pub mod addition;
pub mod multiplication;
pub mod powers;

pub use addition::{compute_bias, run_addition, AdditionResult};
pub use multiplication::{run_multiplication, MultiplicationResult, MultiplicationTable};
pub use powers::{run_powers_of_five, PowersOfFiveResult};

/// How many values each worker samples, and the weight of one squared error.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplePlan {
    pub per_worker: usize,
    /// `per_worker * workers`; values short partitions cannot supply are
    /// simply not sampled.
    pub planned: usize,
    pub mean_factor: f32,
}

impl SamplePlan {
    /// `count * percent / 100` values, floored to a multiple of `workers`.
    pub fn new(count: usize, percent: usize, workers: usize) -> Self {
        let workers = workers.max(1);
        let per_worker = count.saturating_mul(percent) / 100 / workers;
        let planned = per_worker * workers;
        let mean_factor = if planned == 0 { 0.0 } else { 1.0 / planned as f32 };
        if planned == 0 {
            tracing::warn!("Sample is empty: {} values at {}% over {} workers", count, percent, workers);
        }
        Self {
            per_worker,
            planned,
            mean_factor,
        }
    }

    /// The sampled prefix of one partition.
    #[inline]
    pub fn front<'a>(&self, partition: &'a [f32]) -> &'a [f32] {
        &partition[..self.per_worker.min(partition.len())]
    }
}
