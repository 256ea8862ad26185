//! Entity models and DTOs, one module per table group.

pub mod artifact;
pub mod chain;
pub mod material;
pub mod project;
pub mod scene;
