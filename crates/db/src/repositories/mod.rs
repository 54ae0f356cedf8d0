//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that accept
//! `&PgPool` as the first argument. Methods that must join a caller's unit of
//! work take `&mut sqlx::Transaction<'_, sqlx::Postgres>` instead.

pub mod activity_log_repo;
pub mod annotation_repo;
pub mod class_repo;
pub mod dataset_repo;
pub mod progress_marker_repo;
pub mod task_repo;
pub mod text_pair_repo;
pub mod user_repo;

pub use activity_log_repo::ActivityLogRepo;
pub use annotation_repo::AnnotationRepo;
pub use class_repo::ClassRepo;
pub use dataset_repo::DatasetRepo;
pub use progress_marker_repo::ProgressMarkerRepo;
pub use task_repo::TaskRepo;
pub use text_pair_repo::TextPairRepo;
pub use user_repo::UserRepo;
