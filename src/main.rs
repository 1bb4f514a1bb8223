//! fprep: characterizes how a float dataset survives bit-level transforms
//! and optionally applies one.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use fprep_core::{EngineConfig, ForcedPattern, Scheme};
use fprep_dsa::MappedFile;
use fprep_engine::Dataset;
use fprep_report::{export_preprocessed, export_results, report_dir, tables, MetricLog, PhaseTimer};

#[derive(Parser)]
#[command(name = "fprep")]
#[command(about = "Float Preprocessor - bit-pattern analysis of delimited float datasets")]
#[command(version)]
struct Cli {
    /// File to preprocess (header row + delimited floats)
    #[arg(short = 'f', long)]
    file: PathBuf,

    /// Output file for the transformed dataset
    #[arg(short = 'o', long, default_value = "preprocessed_output.csv")]
    output: PathBuf,

    /// TOML engine configuration; flags below override it
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Scales the size guess to reserve more memory for the dataset
    #[arg(short = 'g', long)]
    guess: Option<f32>,

    /// Percentage of the dataset analyzed
    #[arg(short = 's', long = "sizet")]
    sample_percent: Option<usize>,

    /// Worker threads (default: logical cores - 1)
    #[arg(short = 't', long)]
    threads: Option<usize>,

    /// Bytes scanned at the start for the size guess; raise for many columns
    #[arg(short = 'b', long)]
    bytes: Option<usize>,

    /// Pin worker i to core i
    #[arg(long)]
    pin: bool,

    /// Print all analysis results
    #[arg(short = 'x', long)]
    xprint: bool,

    /// Export analysis results to reports/<NAME>/
    #[arg(short = 'y', long, value_name = "NAME")]
    yprint: Option<String>,

    /// Print phase metrics and dataset dimensions
    #[arg(short = 'z', long)]
    zprint: bool,

    /// Apply the multiplication scheme (see --wparam) and export
    #[arg(short = 'm', long, conflicts_with_all = ["add", "pow"])]
    multi: bool,

    /// Analyze and apply the addition scheme and export
    #[arg(short = 'a', long, conflicts_with = "pow")]
    add: bool,

    /// Apply the powers-of-five scheme (see --power) and export
    #[arg(short = 'p', long)]
    pow: bool,

    /// Multiplication scheme parameters, format M,P
    #[arg(short = 'w', long, default_value = "3,12")]
    wparam: String,

    /// Multiplier for the powers-of-five scheme (5, 25 or 125)
    #[arg(long, default_value_t = 25)]
    power: u32,

    /// Log verbosity level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    log_level: tracing::Level,
}

impl Cli {
    fn engine_config(&self) -> Result<EngineConfig> {
        let mut config = match &self.config {
            Some(path) => EngineConfig::load(path)
                .with_context(|| format!("reading config {}", path.display()))?,
            None => EngineConfig::default(),
        };
        if let Some(guess) = self.guess {
            config.guess_scaling = guess;
        }
        if let Some(percent) = self.sample_percent {
            config.test_percent = percent;
        }
        if let Some(threads) = self.threads {
            config.workers = threads;
        }
        if let Some(bytes) = self.bytes {
            config.sample_bytes = bytes;
        }
        config.pin_workers |= self.pin;
        config.validate()?;
        Ok(config)
    }

    fn scheme(&self) -> Result<Option<Scheme>> {
        let scheme = if self.multi {
            let pattern: ForcedPattern = self
                .wparam
                .parse()
                .with_context(|| format!("parsing --wparam {:?}", self.wparam))?;
            Some(Scheme::Multiplication(pattern))
        } else if self.add {
            Some(Scheme::Addition)
        } else if self.pow {
            Some(Scheme::powers_of_five(self.power)?)
        } else {
            None
        };
        Ok(scheme)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // -z wants the per-phase info lines as well.
    let level = if cli.zprint {
        cli.log_level.max(tracing::Level::INFO)
    } else {
        cli.log_level
    };
    tracing_subscriber::fmt().with_max_level(level).with_target(false).init();

    let config = cli.engine_config()?;
    let scheme = cli.scheme()?;

    let source = MappedFile::open(&cli.file).with_context(|| format!("loading {}", cli.file.display()))?;

    let mut metrics = MetricLog::new();
    let timer = PhaseTimer::start("Load and casting", source.len());
    let mut dataset = Dataset::load(source.as_bytes(), config)?;
    metrics.push(timer.finish());
    drop(source);

    match scheme {
        Some(scheme) => apply_scheme(&mut dataset, scheme, &cli, &mut metrics)?,
        None => analyze_all(&mut dataset, &mut metrics)?,
    }

    if cli.zprint {
        println!("{}", tables::metrics_table(metrics.as_slice()));
        print!("{}", tables::dimensions(&dataset));
    }
    if cli.xprint {
        if let Some(powers) = dataset.powers_of_five() {
            println!("{}", tables::powers_table(powers));
        }
        if let Some(addition) = dataset.addition() {
            println!("{}", tables::addition_table(addition, dataset.totals()));
        }
        if let Some(multiplication) = dataset.multiplication() {
            print!("{}", tables::multiplication_table(multiplication));
        }
    }
    if let Some(name) = &cli.yprint {
        let dir = report_dir(&std::env::current_dir()?, name);
        export_results(&dir, &dataset).with_context(|| format!("exporting reports to {}", dir.display()))?;
    }
    Ok(())
}

fn analyze_all(dataset: &mut Dataset, metrics: &mut MetricLog) -> Result<()> {
    let timer = PhaseTimer::start("Analysis of addition", 0);
    let sampled = dataset.run_addition()?.sampled;
    metrics.push(timer.finish_with(sampled * 4));

    let timer = PhaseTimer::start("Analysis of multiplication", 0);
    let pairs = dataset.patterns()?.len();
    let sampled = dataset.run_multiplication()?.sampled;
    metrics.push(timer.finish_with(sampled * 4 * pairs));

    let timer = PhaseTimer::start("Analysis of powers of five", 0);
    let sampled = dataset.run_powers_of_five()?.sampled;
    metrics.push(timer.finish_with(sampled * 12));
    Ok(())
}

fn apply_scheme(dataset: &mut Dataset, scheme: Scheme, cli: &Cli, metrics: &mut MetricLog) -> Result<()> {
    if scheme == Scheme::Addition {
        let timer = PhaseTimer::start("Analysis of addition", 0);
        let sampled = dataset.run_addition()?.sampled;
        metrics.push(timer.finish_with(sampled * 4));
    }

    let timer = PhaseTimer::start(format!("{} performance", scheme.name()), dataset.count() * 4);
    dataset.apply(scheme)?;
    metrics.push(timer.finish());

    let lines = export_preprocessed(&cli.output, dataset)
        .with_context(|| format!("writing {}", cli.output.display()))?;
    println!("Exported {} rows to {}", lines, cli.output.display());
    Ok(())
}
