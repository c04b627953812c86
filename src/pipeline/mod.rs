//! Claim pipeline: concurrent per-claim processing and run reports.

pub mod orchestrator;
pub mod report;
pub mod runner;
pub mod state;

pub use orchestrator::{ClaimPipeline, PipelineOutput, Timings};
pub use report::{ParallelInfo, Report, ReportMeta, phase_time};
pub use runner::FactChecker;
pub use state::{ClaimProgress, ClaimState};
