use core::fmt;
use core::str::FromStr;

use fprep_dsa::TrailingRunHistogram;

use crate::bits::{from_bits, to_bits};
use crate::error::{FprepError, Result};
use crate::patterns::template_for;

/// Multipliers of the powers-of-five family.
pub const POWERS_OF_FIVE: [u32; 3] = [5, 25, 125];

/// Identifies one forced-pattern configuration. Orders by multiplier, then
/// bit width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SchemeKey {
    pub multiplier: u32,
    pub bit_width: u32,
}

/// Statistics of one (multiplier, bit width) pair.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SchemeResult {
    pub histogram: TrailingRunHistogram,
    pub mse: f32,
    pub max_relative_deviation: f32,
}

impl SchemeResult {
    /// Folds a worker-local result into this one.
    pub fn merge(&mut self, other: &Self) {
        self.histogram.merge(&other.histogram);
        self.mse += other.mse;
        if other.max_relative_deviation > self.max_relative_deviation {
            self.max_relative_deviation = other.max_relative_deviation;
        }
    }
}

/// Overwrites the low `bit_width` bits of a value with the top bits of the
/// multiplier's template, then scales by the multiplier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForcedPattern {
    multiplier: u32,
    bit_width: u32,
    keep_mask: u32,
    insert: u32,
}

impl ForcedPattern {
    pub fn new(multiplier: u32, bit_width: u32) -> Result<Self> {
        let template = template_for(multiplier).ok_or(FprepError::UnknownMultiplier(multiplier))?;
        if !(1..=31).contains(&bit_width) {
            return Err(FprepError::InvalidBitWidth(bit_width));
        }
        Ok(Self {
            multiplier,
            bit_width,
            keep_mask: u32::MAX << bit_width,
            insert: template >> (32 - bit_width),
        })
    }

    pub fn key(&self) -> SchemeKey {
        SchemeKey {
            multiplier: self.multiplier,
            bit_width: self.bit_width,
        }
    }

    pub fn multiplier(&self) -> u32 {
        self.multiplier
    }

    pub fn bit_width(&self) -> u32 {
        self.bit_width
    }

    /// `value` with its low bits replaced by the template bits.
    #[inline(always)]
    pub fn force(&self, value: f32) -> f32 {
        from_bits((to_bits(value) & self.keep_mask) | self.insert)
    }

    /// Forces the pattern and scales by the multiplier.
    #[inline(always)]
    pub fn apply(&self, value: f32) -> f32 {
        self.force(value) * self.multiplier as f32
    }
}

impl FromStr for ForcedPattern {
    type Err = FprepError;

    /// Parses `"M,P"`, e.g. `"3,12"`.
    fn from_str(text: &str) -> Result<Self> {
        let malformed = || FprepError::MalformedParams(text.to_string());
        let (m, p) = text.split_once(',').ok_or_else(malformed)?;
        let m = m.trim().parse::<u32>().map_err(|_| malformed())?;
        let p = p.trim().parse::<u32>().map_err(|_| malformed())?;
        Self::new(m, p)
    }
}

impl fmt::Display for ForcedPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.multiplier, self.bit_width)
    }
}

/// A transform family together with its parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scheme {
    /// Additive bias, derived from the dataset range by the addition analysis.
    Addition,
    Multiplication(ForcedPattern),
    /// Scaling by one of [`POWERS_OF_FIVE`].
    PowersOfFive(u32),
}

impl Scheme {
    pub fn powers_of_five(multiplier: u32) -> Result<Self> {
        if POWERS_OF_FIVE.contains(&multiplier) {
            Ok(Scheme::PowersOfFive(multiplier))
        } else {
            Err(FprepError::InvalidPowerOfFive(multiplier))
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Scheme::Addition => "addition",
            Scheme::Multiplication(_) => "multiplication",
            Scheme::PowersOfFive(_) => "powers of five",
        }
    }
}
