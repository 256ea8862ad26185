//! Pure domain logic for the story-to-video pipeline.
//!
//! No I/O lives here: this crate defines the shared ID/timestamp types,
//! the domain error taxonomy, the project-stage and scene-status state
//! machines, the bounded polling loop, the story breakdown splitter, and
//! the process-wide capability cache. Persistence and provider calls are
//! layered on top in `storyreel-db`, `storyreel-provider`, and
//! `storyreel-pipeline`.

pub mod breakdown;
pub mod capability;
pub mod error;
pub mod polling;
pub mod stage;
pub mod status;
pub mod types;
