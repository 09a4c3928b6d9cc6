//! Validation, scoring, and auto-fix engine for resource-allocation intake
//! data.
//!
//! The crate receives already-shaped `Client`/`Worker`/`Task` rows, reports
//! every data problem as a [`engine::Finding`], blends the findings into a
//! 0-100 quality score, and deterministically repairs the subset of findings
//! flagged auto-fixable. [`workspace::Workspace`] ties the pieces together
//! for callers that want commit-and-revalidate sequencing handled for them.

pub mod config;
pub mod engine;
pub mod error;
pub mod export;
pub mod ingest;
pub mod telemetry;
pub mod workspace;
