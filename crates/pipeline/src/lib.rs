//! Generation-pipeline orchestration.
//!
//! Ties the pure state machines in `storyreel-core` to persistence
//! (`storyreel-db`) and the provider adapter (`storyreel-provider`):
//!
//! - [`tracker`]: the create -> poll -> finalize lifecycle of one job,
//!   with placeholder-first persistence for resumability.
//! - [`batch`]: sequential per-project batch generation with isolated
//!   per-scene failures.
//! - [`chain`]: the video continuation chain (append, lookup, continue).
//! - [`stage`]: scene breakdown, confirmations, and reactive project
//!   stage advancement.
//! - [`store`] / [`frame`]: artifact storage and last-frame extraction
//!   collaborators behind trait seams.

pub mod batch;
pub mod chain;
pub mod error;
pub mod frame;
pub mod stage;
pub mod store;
pub mod tracker;

pub use error::{PipelineError, PipelineResult};
