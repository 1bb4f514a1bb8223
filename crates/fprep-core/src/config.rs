use std::path::Path;

use serde::{Deserialize, Deserializer};

use crate::error::{FprepError, Result};
use crate::patterns::template_for;

/// Everything the engine needs from the outside, as plain values.
///
/// The engine never probes the machine itself: the worker default is computed
/// here, once, and threaded in through this struct.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct EngineConfig {
    pub workers: usize,
    /// Bytes sampled from the front of the body by the size estimator.
    pub sample_bytes: usize,
    /// Scales the estimated float count before storage is reserved.
    pub guess_scaling: f32,
    /// Share of the dataset, in percent, fed to each analysis.
    pub test_percent: usize,
    #[serde(deserialize_with = "single_byte")]
    pub delimiter: u8,
    #[serde(deserialize_with = "single_byte")]
    pub line_terminator: u8,
    /// Candidate multipliers for the forced-pattern analysis.
    pub multipliers: Vec<u32>,
    /// Candidate bit widths for the forced-pattern analysis.
    pub bit_widths: Vec<u32>,
    /// Pin worker `i` to core `i` (modulo the core count).
    pub pin_workers: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            workers: default_workers(),
            sample_bytes: 4096,
            guess_scaling: 1.0,
            test_percent: 10,
            delimiter: b',',
            line_terminator: b'\n',
            multipliers: vec![3, 5, 7, 9, 11],
            bit_widths: vec![10, 12, 14, 15, 16, 17, 18, 20],
            pin_workers: false,
        }
    }
}

/// One worker per logical core, leaving one for the invoking thread.
pub fn default_workers() -> usize {
    num_cpus::get().saturating_sub(1).max(1)
}

impl EngineConfig {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        tracing::debug!("Loading engine config from {}", path.as_ref().display());
        Self::from_toml_str(&text)
    }

    /// Rejects values the engine cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.workers == 0 {
            return Err(FprepError::NoWorkers);
        }
        if !(1..=100).contains(&self.test_percent) {
            return Err(FprepError::InvalidSamplePercent(self.test_percent));
        }
        if let Some(&m) = self.multipliers.iter().find(|&&m| template_for(m).is_none()) {
            return Err(FprepError::UnknownMultiplier(m));
        }
        if let Some(&p) = self.bit_widths.iter().find(|&&p| !(1..=31).contains(&p)) {
            return Err(FprepError::InvalidBitWidth(p));
        }
        Ok(())
    }
}

fn single_byte<'de, D>(deserializer: D) -> std::result::Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let text = String::deserialize(deserializer)?;
    match text.as_bytes() {
        [byte] => Ok(*byte),
        _ => Err(serde::de::Error::custom(FprepError::InvalidByte {
            field: "delimiter/line_terminator",
            value: text,
        })),
    }
}
