//! IEEE-754 bit access and trailing-run counting.
//!
//! All conversions are value-to-value bit casts; no float storage is ever
//! aliased as an integer.

/// Raw bit pattern of `value`.
#[inline(always)]
pub fn to_bits(value: f32) -> u32 {
    value.to_bits()
}

/// Float with the raw bit pattern `bits`.
#[inline(always)]
pub fn from_bits(bits: u32) -> f32 {
    f32::from_bits(bits)
}

/// Length of the run of bits equal to bit 0, counted from bit 0 upward.
///
/// Returns a bucket index in `1..=32`; 32 means every bit matches.
#[inline(always)]
pub fn trailing_run(bits: u32) -> usize {
    // Normalize so the run is made of zeros, then count them.
    let normalized = if bits & 1 == 1 { !bits } else { bits };
    normalized.trailing_zeros() as usize
}

/// Trailing run after treating a lone disagreeing bit 0 as noise.
///
/// If bit 0 differs from bit 1, bit 0 is flipped before counting, so the
/// result reflects the pattern above it.
#[inline(always)]
pub fn trailing_run_po5(bits: u32) -> usize {
    let adjusted = if (bits ^ (bits >> 1)) & 1 == 1 {
        bits ^ 1
    } else {
        bits
    };
    trailing_run(adjusted)
}

#[cfg(kani)]
mod proofs {
    use super::*;

    #[kani::proof]
    fn prove_trailing_run_in_bucket_range() {
        let bits: u32 = kani::any();
        let run = trailing_run(bits);
        assert!(run >= 1 && run <= 32);
        let run = trailing_run_po5(bits);
        assert!(run >= 2 && run <= 32);
    }
}
