//! CSV export of analysis results and of the (possibly transformed) dataset.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use fprep_core::Result;
use fprep_dsa::histogram::BUCKETS;
use fprep_dsa::TrailingRunHistogram;
use fprep_engine::Dataset;

/// `<root>/reports/<name>`.
pub fn report_dir(root: &Path, name: &str) -> PathBuf {
    root.join("reports").join(name)
}

/// Files written by [`export_results`]; `None` for analyses that did not run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ReportPaths {
    pub addition: Option<PathBuf>,
    pub multiplication: Option<PathBuf>,
    pub powers_of_five: Option<PathBuf>,
}

fn run_header(first: &str) -> String {
    let mut header = first.to_string();
    for run in 1..BUCKETS {
        header.push_str(&format!(",{}", run));
    }
    header
}

fn run_row(histogram: &TrailingRunHistogram) -> String {
    histogram.runs().map(|(_, count)| format!(",{}", count)).collect()
}

/// Writes `addition.csv`, `multiplication.csv` and `powersOfFive.csv` into
/// `dir`, creating it if needed.
pub fn export_results(dir: &Path, dataset: &Dataset) -> Result<ReportPaths> {
    fs::create_dir_all(dir)?;
    let mut paths = ReportPaths::default();

    if let Some(addition) = dataset.addition() {
        let path = dir.join("addition.csv");
        let totals = dataset.totals();
        let mut out = BufWriter::new(File::create(&path)?);
        writeln!(out, "Param,Value")?;
        writeln!(out, "Error,{:e}", addition.error)?;
        writeln!(out, "Bias,{}", addition.bias)?;
        writeln!(out, "Max,{}", totals.max())?;
        writeln!(out, "Min,{}", totals.min())?;
        out.flush()?;
        paths.addition = Some(path);
    }

    if let Some(multiplication) = dataset.multiplication() {
        let path = dir.join("multiplication.csv");
        let mut out = BufWriter::new(File::create(&path)?);
        writeln!(out, "{}", run_header("M,P,MSE,Max%dev"))?;
        for (key, scheme) in &multiplication.table {
            writeln!(
                out,
                "{},{},{:e},{}{}",
                key.multiplier,
                key.bit_width,
                scheme.mse,
                scheme.max_relative_deviation,
                run_row(&scheme.histogram)
            )?;
        }
        out.flush()?;
        paths.multiplication = Some(path);
    }

    if let Some(powers) = dataset.powers_of_five() {
        let path = dir.join("powersOfFive.csv");
        let mut out = BufWriter::new(File::create(&path)?);
        writeln!(out, "{}", run_header("Power/Trailing"))?;
        for (exponent, histogram) in powers.histograms.iter().enumerate() {
            writeln!(out, "{}{}", exponent + 1, run_row(histogram))?;
        }
        out.flush()?;
        paths.powers_of_five = Some(path);
    }

    tracing::info!("Exported analysis results to {}", dir.display());
    Ok(paths)
}

/// Writes the header row and then every value in file order, `columns`
/// values per line, using the configured delimiter and terminator.
///
/// Returns the number of lines written after the header.
pub fn export_preprocessed(path: &Path, dataset: &Dataset) -> Result<usize> {
    let delimiter = dataset.config().delimiter;
    let terminator = dataset.config().line_terminator;
    let columns = dataset.columns().max(1);

    let mut out = BufWriter::with_capacity(8 << 20, File::create(path)?);
    for (idx, name) in dataset.headers().iter().enumerate() {
        if idx > 0 {
            out.write_all(&[delimiter])?;
        }
        out.write_all(name.as_bytes())?;
    }
    out.write_all(&[terminator])?;

    let partitions = dataset.partitions();
    let mut column = 0;
    let mut lines = 0;
    for (idx, partition) in partitions.iter().enumerate() {
        for value in partition {
            if column > 0 {
                out.write_all(&[delimiter])?;
            }
            write!(out, "{}", value)?;
            column += 1;
            if column == columns {
                out.write_all(&[terminator])?;
                column = 0;
                lines += 1;
            }
        }
        tracing::info!("Export: partition {}/{} written", idx + 1, partitions.len());
    }
    if column != 0 {
        // Ragged tail: close the last, incomplete line.
        out.write_all(&[terminator])?;
        lines += 1;
    }
    out.flush()?;

    tracing::info!("Exported {} lines to {}", lines, path.display());
    Ok(lines)
}
