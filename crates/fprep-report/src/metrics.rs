use std::time::{Duration, Instant};

/// Wall time and data volume of one phase.
#[derive(Debug, Clone, PartialEq)]
pub struct Metric {
    pub name: String,
    pub duration: Duration,
    pub bytes: usize,
}

impl Metric {
    /// Throughput in MB/s (bytes per microsecond).
    ///
    /// The duration is clamped to one microsecond so a phase faster than the
    /// clock resolution never divides by zero.
    pub fn throughput_mb_per_s(&self) -> f64 {
        let micros = self.duration.as_micros().max(1);
        self.bytes as f64 / micros as f64
    }
}

/// Measures one phase. Sizes that are only known afterwards go to
/// [`PhaseTimer::finish_with`].
#[derive(Debug)]
pub struct PhaseTimer {
    name: String,
    bytes: usize,
    start: Instant,
}

impl PhaseTimer {
    pub fn start(name: impl Into<String>, bytes: usize) -> Self {
        Self {
            name: name.into(),
            bytes,
            start: Instant::now(),
        }
    }

    pub fn finish(self) -> Metric {
        let bytes = self.bytes;
        self.finish_with(bytes)
    }

    pub fn finish_with(self, bytes: usize) -> Metric {
        let metric = Metric {
            name: self.name,
            duration: self.start.elapsed(),
            bytes,
        };
        tracing::info!(
            "{}: {:?}, {} bytes, {:.1} MB/s",
            metric.name,
            metric.duration,
            metric.bytes,
            metric.throughput_mb_per_s()
        );
        metric
    }
}

/// Metrics in the order phases ran.
#[derive(Debug, Default, Clone)]
pub struct MetricLog {
    metrics: Vec<Metric>,
}

impl MetricLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, metric: Metric) {
        self.metrics.push(metric);
    }

    pub fn as_slice(&self) -> &[Metric] {
        &self.metrics
    }

    pub fn is_empty(&self) -> bool {
        self.metrics.is_empty()
    }
}
