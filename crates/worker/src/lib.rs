//! Background worker that sweeps in-flight generation tasks.
//!
//! The API starts tasks and answers polls on demand; this worker picks
//! up whatever is still in flight (e.g. after a server restart or an
//! abandoned browser tab) and finalizes tasks whose provider job has
//! since finished. It never fails a task on age alone: a long-running
//! job is logged, not cancelled.

pub mod config;
pub mod sweep;
