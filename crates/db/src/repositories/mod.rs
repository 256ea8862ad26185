//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod chain_repo;
pub mod image_repo;
pub mod material_repo;
pub mod project_repo;
pub mod scene_repo;
pub mod video_repo;

pub use chain_repo::VideoChainRepo;
pub use image_repo::ImageRepo;
pub use material_repo::MaterialRepo;
pub use project_repo::ProjectRepo;
pub use scene_repo::SceneRepo;
pub use video_repo::VideoRepo;
