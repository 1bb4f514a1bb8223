use std::collections::BTreeSet;

use fprep_core::{EngineConfig, ForcedPattern, Result, Scheme};

use crate::analysis::{
    run_addition, run_multiplication, run_powers_of_five, AdditionResult, MultiplicationResult,
    PowersOfFiveResult, SamplePlan,
};
use crate::apply::{apply_in_place, Transform};
use crate::cast::{cast_partitions, RunningTotals};
use crate::dispatch::WorkerSet;
use crate::estimate::{estimate, SizeEstimate};
use crate::header::parse_header;
use crate::partition::partition;

/// All parsed data and analysis results of one run.
///
/// Owns one float partition per worker. Partition order is the original byte
/// order, so iterating partitions in index order yields the values in file
/// order.
#[derive(Debug)]
pub struct Dataset {
    config: EngineConfig,
    workers: WorkerSet,
    headers: Vec<String>,
    source_len: usize,
    estimate: SizeEstimate,
    partitions: Vec<Vec<f32>>,
    totals: RunningTotals,
    addition: Option<AdditionResult>,
    multiplication: Option<MultiplicationResult>,
    powers_of_five: Option<PowersOfFiveResult>,
    applied: Option<Scheme>,
}

impl Dataset {
    /// Parses the header, estimates the size, partitions the body and casts
    /// it in parallel.
    pub fn load(bytes: &[u8], config: EngineConfig) -> Result<Self> {
        config.validate()?;
        let workers = WorkerSet::new(config.workers, config.pin_workers)?;

        let header = parse_header(bytes, config.delimiter, config.line_terminator)?;
        let body = &bytes[header.body_offset..];

        let estimate = estimate(
            body,
            bytes.len(),
            config.sample_bytes,
            config.delimiter,
            config.line_terminator,
            config.guess_scaling,
        );
        let ranges = partition(body, config.line_terminator, workers.workers());
        let (partitions, totals) = cast_partitions(
            body,
            &ranges,
            config.delimiter,
            config.line_terminator,
            estimate.floats / workers.workers(),
            &workers,
        )?;

        tracing::info!(
            "Loaded {} floats ({} columns) over {} partitions, range [{}, {}]",
            totals.count,
            header.names.len(),
            partitions.len(),
            totals.min(),
            totals.max()
        );

        Ok(Self {
            config,
            workers,
            headers: header.names,
            source_len: bytes.len(),
            estimate,
            partitions,
            totals,
            addition: None,
            multiplication: None,
            powers_of_five: None,
            applied: None,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn columns(&self) -> usize {
        self.headers.len()
    }

    /// Length in bytes of the source region, header included.
    pub fn source_len(&self) -> usize {
        self.source_len
    }

    pub fn estimate(&self) -> &SizeEstimate {
        &self.estimate
    }

    pub fn partitions(&self) -> &[Vec<f32>] {
        &self.partitions
    }

    pub fn totals(&self) -> &RunningTotals {
        &self.totals
    }

    pub fn count(&self) -> usize {
        self.totals.count
    }

    /// Every value in original file order.
    pub fn values(&self) -> impl Iterator<Item = f32> + '_ {
        self.partitions.iter().flat_map(|p| p.iter().copied())
    }

    pub fn sample_plan(&self) -> SamplePlan {
        SamplePlan::new(self.totals.count, self.config.test_percent, self.workers.workers())
    }

    /// The configured (M, P) grid, deduplicated and ordered.
    pub fn patterns(&self) -> Result<Vec<ForcedPattern>> {
        let keys: BTreeSet<(u32, u32)> = self
            .config
            .multipliers
            .iter()
            .flat_map(|&m| self.config.bit_widths.iter().map(move |&p| (m, p)))
            .collect();
        keys.into_iter().map(|(m, p)| ForcedPattern::new(m, p)).collect()
    }

    pub fn run_addition(&mut self) -> Result<&AdditionResult> {
        let plan = self.sample_plan();
        let result = run_addition(&self.partitions, &self.totals, &plan, &self.workers)?;
        Ok(&*self.addition.insert(result))
    }

    pub fn run_multiplication(&mut self) -> Result<&MultiplicationResult> {
        let plan = self.sample_plan();
        let patterns = self.patterns()?;
        let result = run_multiplication(&self.partitions, &patterns, &plan, &self.workers)?;
        Ok(&*self.multiplication.insert(result))
    }

    pub fn run_powers_of_five(&mut self) -> Result<&PowersOfFiveResult> {
        let plan = self.sample_plan();
        let result = run_powers_of_five(&self.partitions, &plan, &self.workers)?;
        Ok(&*self.powers_of_five.insert(result))
    }

    /// Applies `scheme` to every value of the dataset in place.
    ///
    /// Addition uses the bias of the last addition analysis, running it first
    /// if it has not run yet. Returns the number of values transformed.
    pub fn apply(&mut self, scheme: Scheme) -> Result<usize> {
        let transform = match scheme {
            Scheme::Addition => {
                let bias = match self.addition.map(|result| result.bias) {
                    Some(bias) => bias,
                    None => self.run_addition()?.bias,
                };
                Transform::Add(bias)
            }
            Scheme::Multiplication(pattern) => Transform::Force(pattern),
            Scheme::PowersOfFive(multiplier) => Transform::Scale(multiplier as f32),
        };

        tracing::info!("Applying {} ({:?}) to {} values", scheme.name(), transform, self.totals.count);
        let transformed = apply_in_place(&mut self.partitions, transform, &self.workers)?;
        self.applied = Some(scheme);
        Ok(transformed)
    }

    pub fn addition(&self) -> Option<&AdditionResult> {
        self.addition.as_ref()
    }

    pub fn multiplication(&self) -> Option<&MultiplicationResult> {
        self.multiplication.as_ref()
    }

    pub fn powers_of_five(&self) -> Option<&PowersOfFiveResult> {
        self.powers_of_five.as_ref()
    }

    pub fn applied(&self) -> Option<Scheme> {
        self.applied
    }
}
