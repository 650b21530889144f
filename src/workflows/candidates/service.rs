use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use chrono::Utc;

use super::domain::{
    ApplyRequest, CandidateId, CandidateProfile, CandidateRecord, CandidateStatus, CandidateView,
    ExamSnapshot, LoginRequest, ProfileUpdate, SignupRequest,
};
use super::repository::CandidateRepository;
use super::validation::{
    normalize_email, validate_email, validate_name, validate_submission, validate_update,
    CandidateViolation,
};
use crate::auth::{IssuedToken, PasswordError, PasswordService, Session, SessionAuthority, SessionError};
use crate::config::DocumentConfig;
use crate::error::json_error;
use crate::workflows::documents::{render_bundle, DocumentContext, DocumentError, PaperSize, RenderedDocument};
use crate::workflows::exams::ExamFormRepository;
use crate::workflows::RepositoryError;

/// Candidate-facing operations plus the admin review surface (see `review`).
pub struct CandidateService<C, E> {
    pub(super) candidates: Arc<C>,
    pub(super) exams: Arc<E>,
    pub(super) passwords: PasswordService,
    pub(super) authority: Arc<SessionAuthority>,
    pub(super) documents: DocumentConfig,
}

impl<C, E> CandidateService<C, E>
where
    C: CandidateRepository + 'static,
    E: ExamFormRepository + 'static,
{
    pub fn new(
        candidates: Arc<C>,
        exams: Arc<E>,
        authority: Arc<SessionAuthority>,
        documents: DocumentConfig,
    ) -> Self {
        Self {
            candidates,
            exams,
            passwords: PasswordService::new(),
            authority,
            documents,
        }
    }

    pub fn authority(&self) -> &Arc<SessionAuthority> {
        &self.authority
    }

    /// Register an account. Optional profile fields in the request are kept.
    pub fn signup(&self, request: SignupRequest) -> Result<CandidateView, CandidateError> {
        let SignupRequest {
            name,
            email,
            password,
            confirm_password,
            details,
        } = request;

        let present = |value: Option<String>| value.filter(|raw| !raw.trim().is_empty());
        let (Some(name), Some(email), Some(password)) =
            (present(name), present(email), present(password))
        else {
            return Err(CandidateViolation::MissingCredentials.into());
        };

        validate_name(&name)?;
        validate_email(&email)?;
        if let Some(confirm) = confirm_password {
            if confirm != password {
                return Err(CandidateViolation::PasswordMismatch.into());
            }
        }
        let current_date = validate_update(&details)?;

        let email = normalize_email(&email);
        if self.candidates.find_by_email(&email)?.is_some() {
            tracing::warn!(%email, "signup rejected: email already registered");
            return Err(CandidateError::AlreadyExists);
        }

        let mut profile = CandidateProfile {
            name: name.trim().to_string(),
            ..CandidateProfile::default()
        };
        details.apply(&mut profile, current_date);

        let now = Utc::now();
        let record = CandidateRecord {
            id: CandidateId::generate(),
            email,
            password_hash: self.passwords.hash(&password)?,
            status: CandidateStatus::Pending,
            created_at: now,
            updated_at: now,
            submitted_at: None,
            exam: None,
            profile,
        };

        let stored = self.candidates.insert(record).map_err(|err| match err {
            RepositoryError::Conflict => CandidateError::AlreadyExists,
            other => other.into(),
        })?;
        tracing::info!(candidate_id = %stored.id.0, "candidate registered");
        Ok(stored.view())
    }

    pub fn login(&self, request: LoginRequest) -> Result<IssuedToken, CandidateError> {
        let email = normalize_email(&request.email);
        let record = self
            .candidates
            .find_by_email(&email)?
            .ok_or(CandidateError::InvalidCredentials)?;

        if !self.passwords.verify(&request.password, &record.password_hash) {
            tracing::warn!(candidate_id = %record.id.0, "login rejected: wrong password");
            return Err(CandidateError::InvalidCredentials);
        }

        let token = self.authority.issue(&record.email)?;
        tracing::info!(candidate_id = %record.id.0, role = token.role.label(), "session issued");
        Ok(token)
    }

    pub fn profile(&self, session: &Session) -> Result<CandidateView, CandidateError> {
        Ok(self.record_for(session)?.view())
    }

    /// Apply a partial edit. Email, password, and status are never touched here.
    pub fn update_profile(
        &self,
        session: &Session,
        update: ProfileUpdate,
    ) -> Result<CandidateView, CandidateError> {
        let current_date = validate_update(&update)?;
        let mut record = self.record_for(session)?;

        update.apply(&mut record.profile, current_date);
        record.updated_at = Utc::now();
        self.candidates.update(record.clone())?;

        tracing::info!(candidate_id = %record.id.0, "profile updated");
        Ok(record.view())
    }

    /// Final submission against the live exam window.
    pub fn submit_application(
        &self,
        session: &Session,
        request: ApplyRequest,
    ) -> Result<CandidateView, CandidateError> {
        if !request.declaration_accepted {
            return Err(CandidateViolation::DeclarationNotAccepted.into());
        }
        let current_date = validate_update(&request.details)?;

        let mut record = self.record_for(session)?;
        request.details.apply(&mut record.profile, current_date);
        validate_submission(&record.email, &record.profile)?;

        let exam = self.exams.latest()?.ok_or(CandidateError::NoExamForm)?;
        let now = Utc::now();
        if record.profile.current_date.is_none() {
            record.profile.current_date = Some(now.date_naive());
        }
        record.exam = Some(ExamSnapshot::from(&exam));
        record.status = CandidateStatus::Pending;
        record.submitted_at = Some(now);
        record.updated_at = now;
        self.candidates.update(record.clone())?;

        tracing::info!(
            candidate_id = %record.id.0,
            exam_form_id = %exam.id.0,
            "application submitted"
        );
        Ok(record.view())
    }

    /// The candidate's own bundle, on US Legal paper.
    pub fn preview_documents(&self, session: &Session) -> Result<RenderedDocument, CandidateError> {
        let record = self.record_for(session)?;
        self.render(&record, PaperSize::Legal, "application-preview.pdf".to_string())
    }

    pub(super) fn render(
        &self,
        record: &CandidateRecord,
        paper: PaperSize,
        file_name: String,
    ) -> Result<RenderedDocument, CandidateError> {
        // Before submission the bundle previews the live window.
        let live_exam = match &record.exam {
            Some(_) => None,
            None => self.exams.latest()?.map(|form| ExamSnapshot::from(&form)),
        };
        let ctx = DocumentContext {
            email: &record.email,
            profile: &record.profile,
            exam: record.exam.as_ref().or(live_exam.as_ref()),
            config: &self.documents,
        };
        Ok(render_bundle(&ctx, paper, file_name)?)
    }

    fn record_for(&self, session: &Session) -> Result<CandidateRecord, CandidateError> {
        self.candidates
            .find_by_email(&session.email)?
            .ok_or(CandidateError::NotFound)
    }
}

/// Error raised by the candidate service.
#[derive(Debug, thiserror::Error)]
pub enum CandidateError {
    #[error(transparent)]
    Invalid(#[from] CandidateViolation),
    #[error("User already exists")]
    AlreadyExists,
    #[error("Invalid email or password")]
    InvalidCredentials,
    #[error("User not found")]
    NotFound,
    #[error("No forms found")]
    NoExamForm,
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Password(#[from] PasswordError),
    #[error(transparent)]
    Document(#[from] DocumentError),
    #[error("export failed: {0}")]
    Export(#[from] csv::Error),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error("background task failed: {0}")]
    Worker(#[from] tokio::task::JoinError),
}

impl CandidateError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            CandidateError::Invalid(_) => StatusCode::BAD_REQUEST,
            CandidateError::AlreadyExists | CandidateError::Repository(RepositoryError::Conflict) => {
                StatusCode::CONFLICT
            }
            CandidateError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            CandidateError::NotFound
            | CandidateError::NoExamForm
            | CandidateError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
            CandidateError::Session(err) => err.status_code(),
            CandidateError::Password(_)
            | CandidateError::Document(_)
            | CandidateError::Export(_)
            | CandidateError::Worker(_)
            | CandidateError::Repository(RepositoryError::Unavailable(_)) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for CandidateError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "candidate request failed");
        } else if let CandidateError::Invalid(violation) = &self {
            tracing::warn!(%violation, "candidate input rejected");
        }

        let message = match &self {
            CandidateError::Repository(RepositoryError::NotFound) => "User not found".to_string(),
            CandidateError::Repository(RepositoryError::Conflict) => {
                "User already exists".to_string()
            }
            other => other.to_string(),
        };
        json_error(status, message)
    }
}
