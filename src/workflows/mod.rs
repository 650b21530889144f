mod blocking;
pub mod candidates;
pub mod documents;
pub mod exams;
pub mod repository;

pub(crate) use blocking::offload;
pub use repository::RepositoryError;
