use core::fmt;
use core::ops::Index;

/// Number of buckets: index 0 is never written, 1..=31 are run lengths,
/// 32 holds full-width runs and skipped (zero) values.
pub const BUCKETS: usize = 33;

/// Bucket reserved for values the analysis skips, e.g. exact zeros.
pub const SKIPPED_BUCKET: usize = 32;

/// Counts of low-order bit-run lengths.
///
/// Plain counters, no atomics: every worker owns a private histogram and the
/// shared copy is only touched inside one locked merge per worker.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct TrailingRunHistogram {
    buckets: [u64; BUCKETS],
}

static_assertions::assert_eq_size!(TrailingRunHistogram, [u64; BUCKETS]);

impl TrailingRunHistogram {
    pub const fn new() -> Self {
        Self {
            buckets: [0; BUCKETS],
        }
    }

    /// Records one run of length `run` (1..=32).
    #[inline(always)]
    pub fn record(&mut self, run: usize) {
        debug_assert!((1..BUCKETS).contains(&run), "run length {} out of range", run);
        self.buckets[run] += 1;
    }

    /// Records a value that was skipped by the analysis.
    #[inline(always)]
    pub fn record_skipped(&mut self) {
        self.buckets[SKIPPED_BUCKET] += 1;
    }

    /// Adds every bucket of `other` into `self`.
    pub fn merge(&mut self, other: &Self) {
        for (dst, src) in self.buckets.iter_mut().zip(other.buckets.iter()) {
            *dst += *src;
        }
    }

    pub fn get(&self, run: usize) -> u64 {
        self.buckets.get(run).copied().unwrap_or(0)
    }

    /// Sum over all buckets.
    pub fn total(&self) -> u64 {
        self.buckets.iter().sum()
    }

    /// `(run_length, count)` pairs for run lengths 1..=32.
    pub fn runs(&self) -> impl Iterator<Item = (usize, u64)> + '_ {
        self.buckets.iter().copied().enumerate().skip(1)
    }
}

impl Default for TrailingRunHistogram {
    fn default() -> Self {
        Self::new()
    }
}

impl Index<usize> for TrailingRunHistogram {
    type Output = u64;

    fn index(&self, run: usize) -> &u64 {
        &self.buckets[run]
    }
}

impl fmt::Debug for TrailingRunHistogram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TrailingRunHistogram")
            .field("total", &self.total())
            .field("skipped", &self.buckets[SKIPPED_BUCKET])
            .finish()
    }
}
