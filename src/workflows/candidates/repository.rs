use super::domain::{CandidateId, CandidateRecord};
use crate::workflows::RepositoryError;

/// Storage abstraction for candidate accounts.
pub trait CandidateRepository: Send + Sync {
    /// Fails with `Conflict` when the email is already registered.
    fn insert(&self, record: CandidateRecord) -> Result<CandidateRecord, RepositoryError>;
    /// Fails with `NotFound` when the id is unknown.
    fn update(&self, record: CandidateRecord) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &CandidateId) -> Result<Option<CandidateRecord>, RepositoryError>;
    fn find_by_email(&self, email: &str) -> Result<Option<CandidateRecord>, RepositoryError>;
    /// Every candidate in registration order.
    fn all(&self) -> Result<Vec<CandidateRecord>, RepositoryError>;
}
