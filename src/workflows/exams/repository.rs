use super::domain::ExamForm;
use crate::workflows::RepositoryError;

/// Storage abstraction for published exam windows.
pub trait ExamFormRepository: Send + Sync {
    fn insert(&self, form: ExamForm) -> Result<ExamForm, RepositoryError>;
    /// Most recently created window, if any.
    fn latest(&self) -> Result<Option<ExamForm>, RepositoryError>;
    /// Every window, newest first.
    fn list(&self) -> Result<Vec<ExamForm>, RepositoryError>;
}
