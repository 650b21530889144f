use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use chrono::Utc;

use super::domain::{ExamForm, ExamFormViolation, NewExamForm};
use super::repository::ExamFormRepository;
use crate::error::json_error;
use crate::workflows::RepositoryError;

/// Publishes and looks up exam windows.
pub struct ExamFormService<E> {
    repository: Arc<E>,
}

impl<E> ExamFormService<E>
where
    E: ExamFormRepository + 'static,
{
    pub fn new(repository: Arc<E>) -> Self {
        Self { repository }
    }

    pub fn create(&self, request: NewExamForm) -> Result<ExamForm, ExamFormError> {
        let form = request.validate(Utc::now())?;
        let stored = self.repository.insert(form)?;
        tracing::info!(
            exam_form_id = %stored.id.0,
            exam_name = %stored.exam_name,
            held_date = %stored.held_date,
            "exam form published"
        );
        Ok(stored)
    }

    /// The live window. Missing windows surface as `NoForms`.
    pub fn latest(&self) -> Result<ExamForm, ExamFormError> {
        self.repository.latest()?.ok_or(ExamFormError::NoForms)
    }

    /// Every window, newest first. An empty history is an empty list.
    pub fn list(&self) -> Result<Vec<ExamForm>, ExamFormError> {
        Ok(self.repository.list()?)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ExamFormError {
    #[error(transparent)]
    Invalid(#[from] ExamFormViolation),
    #[error("No forms found")]
    NoForms,
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error("background task failed: {0}")]
    Worker(#[from] tokio::task::JoinError),
}

impl ExamFormError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ExamFormError::Invalid(_) => StatusCode::BAD_REQUEST,
            ExamFormError::NoForms | ExamFormError::Repository(RepositoryError::NotFound) => {
                StatusCode::NOT_FOUND
            }
            ExamFormError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
            ExamFormError::Repository(RepositoryError::Unavailable(_)) | ExamFormError::Worker(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ExamFormError {
    fn into_response(self) -> Response {
        match &self {
            ExamFormError::Invalid(violation) => {
                tracing::warn!(%violation, "exam form rejected");
            }
            ExamFormError::Repository(RepositoryError::Unavailable(_)) | ExamFormError::Worker(_) => {
                tracing::error!(error = %self, "exam form request failed");
            }
            _ => {}
        }
        json_error(self.status_code(), self.to_string())
    }
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::sync::Mutex;

    use tracing_subscriber::fmt::MakeWriter;

    use super::*;

    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl CapturedLogs {
        fn text(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().expect("log buffer poisoned")).into_owned()
        }
    }

    impl io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0
                .lock()
                .expect("log buffer poisoned")
                .extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for CapturedLogs {
        type Writer = CapturedLogs;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    #[test]
    fn rejected_forms_are_logged_as_warnings() {
        let logs = CapturedLogs::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(logs.clone())
            .with_ansi(false)
            .finish();

        let response = tracing::subscriber::with_default(subscriber, || {
            ExamFormError::Invalid(ExamFormViolation::EndNotAfterStart).into_response()
        });

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let text = logs.text();
        assert!(text.contains("WARN"), "{text}");
        assert!(text.contains("exam form rejected"), "{text}");
        assert!(text.contains("End date must be after start date"), "{text}");
    }

    #[test]
    fn missing_window_is_not_logged_as_a_warning() {
        let logs = CapturedLogs::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(logs.clone())
            .with_ansi(false)
            .finish();

        let response =
            tracing::subscriber::with_default(subscriber, || ExamFormError::NoForms.into_response());

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(!logs.text().contains("WARN"));
    }
}
