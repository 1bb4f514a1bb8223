//! Plain-text tables for the console.

use fprep_core::POWERS_OF_FIVE;
use fprep_dsa::histogram::BUCKETS;
use fprep_dsa::TrailingRunHistogram;
use fprep_engine::{AdditionResult, Dataset, MultiplicationResult, PowersOfFiveResult, RunningTotals};

use crate::metrics::Metric;

fn row(cells: &[String], widths: &[usize]) -> String {
    let mut line = String::new();
    for (idx, cell) in cells.iter().enumerate() {
        let width = widths.get(idx).or(widths.last()).copied().unwrap_or(8);
        line.push_str(&format!("{:<width$}", cell, width = width));
    }
    line.truncate(line.trim_end().len());
    line.push('\n');
    line
}

fn run_header(first: &[&str]) -> Vec<String> {
    first
        .iter()
        .map(|s| s.to_string())
        .chain((1..BUCKETS).map(|run| run.to_string()))
        .collect()
}

fn run_cells(histogram: &TrailingRunHistogram) -> impl Iterator<Item = String> + '_ {
    histogram.runs().map(|(_, count)| count.to_string())
}

pub fn metrics_table(metrics: &[Metric]) -> String {
    let widths = [30, 20, 20, 30];
    let mut out = row(
        &["Name", "Duration (ms)", "Size", "Throughput"].map(String::from),
        &widths,
    );
    for metric in metrics {
        out.push_str(&row(
            &[
                metric.name.clone(),
                metric.duration.as_millis().to_string(),
                metric.bytes.to_string(),
                format!("{:.1}MB/s", metric.throughput_mb_per_s()),
            ],
            &widths,
        ));
    }
    out
}

pub fn dimensions(dataset: &Dataset) -> String {
    let columns = dataset.columns().max(1);
    format!(
        "Amount of floats: {} | Columns: {} | Amount of rows: {}\n",
        dataset.count(),
        dataset.columns(),
        dataset.count() / columns
    )
}

/// One row per power of five, labelled by exponent.
pub fn powers_table(result: &PowersOfFiveResult) -> String {
    let widths = [16, 8];
    let mut out = row(&run_header(&["Power/Trailing"]), &widths);
    for (exponent, histogram) in (1..=POWERS_OF_FIVE.len()).zip(result.histograms.iter()) {
        let cells: Vec<String> = core::iter::once(exponent.to_string())
            .chain(run_cells(histogram))
            .collect();
        out.push_str(&row(&cells, &widths));
    }
    out
}

pub fn addition_table(result: &AdditionResult, totals: &RunningTotals) -> String {
    let widths = [10, 20];
    let mut out = row(&["Param", "Value"].map(String::from), &widths);
    for (param, value) in [
        ("Error", format!("{:e}", result.error)),
        ("Bias", result.bias.to_string()),
        ("Max", totals.max().to_string()),
        ("Min", totals.min().to_string()),
    ] {
        out.push_str(&row(&[param.to_string(), value], &widths));
    }
    out
}

/// Repeats the column header whenever the multiplier changes.
pub fn multiplication_table(result: &MultiplicationResult) -> String {
    let widths = [6, 6, 16, 14, 8];
    let header = run_header(&["M", "P", "MSE", "Max % Dev"]);
    let mut out = String::new();
    let mut last_multiplier = None;

    for (key, scheme) in &result.table {
        if last_multiplier != Some(key.multiplier) {
            out.push_str(&row(&header, &widths));
            last_multiplier = Some(key.multiplier);
        }
        let cells: Vec<String> = [
            key.multiplier.to_string(),
            key.bit_width.to_string(),
            format!("{:e}", scheme.mse),
            format!("{}", 100.0 * scheme.max_relative_deviation),
        ]
        .into_iter()
        .chain(run_cells(&scheme.histogram))
        .collect();
        out.push_str(&row(&cells, &widths));
    }
    out
}
