use core::ops::Range;
use std::sync::{Mutex, PoisonError};

use fprep_core::Result;

use crate::dispatch::WorkerSet;

/// Count, minimum and maximum over every successfully cast value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunningTotals {
    pub count: usize,
    min: f32,
    max: f32,
}

impl RunningTotals {
    pub const fn new() -> Self {
        Self {
            count: 0,
            min: f32::INFINITY,
            max: f32::NEG_INFINITY,
        }
    }

    /// Folds one partition's local totals in.
    pub fn merge(&mut self, count: usize, min: f32, max: f32) {
        self.count += count;
        if min < self.min {
            self.min = min;
        }
        if max > self.max {
            self.max = max;
        }
    }

    /// Smallest value seen, 0 when nothing was cast.
    pub fn min(&self) -> f32 {
        if self.count == 0 {
            0.0
        } else {
            self.min
        }
    }

    /// Largest value seen, 0 when nothing was cast.
    pub fn max(&self) -> f32 {
        if self.count == 0 {
            0.0
        } else {
            self.max
        }
    }
}

impl Default for RunningTotals {
    fn default() -> Self {
        Self::new()
    }
}

/// One worker's cast output.
#[derive(Debug, Clone, PartialEq)]
pub struct CastOutput {
    pub values: Vec<f32>,
    pub min: f32,
    pub max: f32,
}

#[inline(always)]
fn is_separator(byte: u8, delimiter: u8, terminator: u8) -> bool {
    byte == delimiter || byte == terminator || byte.is_ascii_whitespace()
}

/// Parses one token; `None` for anything that is not a float.
#[inline]
pub fn parse_token(token: &[u8]) -> Option<f32> {
    core::str::from_utf8(token).ok()?.parse::<f32>().ok()
}

/// Casts every token of `bytes` to `f32`, skipping tokens that do not parse.
///
/// `capacity` is a size hint; the returned vector is trimmed to the number of
/// values actually cast.
pub fn cast_range(bytes: &[u8], delimiter: u8, terminator: u8, capacity: usize) -> CastOutput {
    let mut values = Vec::with_capacity(capacity);
    let mut min = f32::INFINITY;
    let mut max = f32::NEG_INFINITY;
    let mut skipped = 0usize;

    for token in bytes
        .split(|&b| is_separator(b, delimiter, terminator))
        .filter(|token| !token.is_empty())
    {
        match parse_token(token) {
            Some(value) => {
                if value < min {
                    min = value;
                }
                if value > max {
                    max = value;
                }
                values.push(value);
            }
            None => skipped += 1,
        }
    }

    if skipped > 0 {
        tracing::debug!("Cast: skipped {} malformed tokens", skipped);
    }
    values.shrink_to_fit();
    CastOutput { values, min, max }
}

/// Cast phase: worker `i` casts `body[ranges[i]]` into its own partition.
///
/// Each worker merges its local count/min/max into the shared totals under
/// one lock acquisition at the end of its range.
pub fn cast_partitions(
    body: &[u8],
    ranges: &[Range<usize>],
    delimiter: u8,
    terminator: u8,
    capacity_per_worker: usize,
    workers: &WorkerSet,
) -> Result<(Vec<Vec<f32>>, RunningTotals)> {
    let shared = Mutex::new(RunningTotals::new());

    let partitions = workers.fork_join("cast", |idx| {
        let Some(range) = ranges.get(idx) else {
            return Vec::new();
        };
        // Every float needs at least one digit and one separator.
        let capacity = capacity_per_worker.min(range.len() / 2 + 1);
        let out = cast_range(&body[range.clone()], delimiter, terminator, capacity);
        tracing::debug!("Cast worker {}: {} values from {} bytes", idx, out.values.len(), range.len());

        let mut totals = shared.lock().unwrap_or_else(PoisonError::into_inner);
        totals.merge(out.values.len(), out.min, out.max);
        out.values
    })?;

    let totals = shared.into_inner().unwrap_or_else(PoisonError::into_inner);
    Ok((partitions, totals))
}
