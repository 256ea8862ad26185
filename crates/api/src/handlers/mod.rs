//! HTTP handlers, grouped per resource.

pub mod chain;
pub mod generation;
pub mod material;
pub mod project;
pub mod scene;
