//! # fprep-engine: Parallel Ingestion and Analysis
//!
//! Phases run as synchronous fork-join rounds over a fixed worker set:
//! cast, then any of the three analyses, then an optional application.
//! Partition `i` is owned by worker `i` in every phase.

pub mod analysis;
pub mod apply;
pub mod cast;
pub mod dataset;
pub mod dispatch;
pub mod estimate;
pub mod header;
pub mod partition;

pub use analysis::{AdditionResult, MultiplicationResult, PowersOfFiveResult, SamplePlan};
pub use apply::Transform;
pub use cast::RunningTotals;
pub use dataset::Dataset;
pub use dispatch::WorkerSet;
pub use estimate::SizeEstimate;
