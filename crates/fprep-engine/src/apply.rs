use fprep_core::{ForcedPattern, Result};

use crate::dispatch::WorkerSet;

/// Per-element transform applied to the whole dataset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Transform {
    /// `v + bias`.
    Add(f32),
    /// Forced pattern then scaling; zeros are left untouched.
    Force(ForcedPattern),
    /// `v * multiplier`.
    Scale(f32),
}

impl Transform {
    #[inline(always)]
    pub fn apply(&self, value: f32) -> f32 {
        match self {
            Transform::Add(bias) => value + bias,
            Transform::Force(pattern) => {
                if value == 0.0 {
                    value
                } else {
                    pattern.apply(value)
                }
            }
            Transform::Scale(multiplier) => value * multiplier,
        }
    }
}

/// Rewrites every partition in place, worker `i` owning partition `i`.
///
/// Returns the number of values transformed.
pub fn apply_in_place(partitions: &mut [Vec<f32>], transform: Transform, workers: &WorkerSet) -> Result<usize> {
    let counts = workers.fork_join_mut("apply", partitions, |_, partition| {
        for value in partition.iter_mut() {
            *value = transform.apply(*value);
        }
        partition.len()
    })?;
    Ok(counts.into_iter().sum())
}
