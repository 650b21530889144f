use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::{Duration, NaiveDate, Utc};
use serde_json::Value;

use crate::auth::{Role, Session, SessionAuthority};
use crate::config::DocumentConfig;
use crate::workflows::candidates::domain::{
    ApplyRequest, CandidateId, CandidateRecord, ProfileUpdate, SignupRequest,
};
use crate::workflows::candidates::repository::CandidateRepository;
use crate::workflows::candidates::{Answer, CandidateService};
use crate::workflows::exams::{ExamForm, ExamFormId, ExamFormRepository, HeldDate};
use crate::workflows::RepositoryError;

pub(super) const ADMIN_EMAIL: &str = "admin@portal.in";

pub(super) type TestService = CandidateService<MemoryCandidates, MemoryForms>;

#[derive(Default)]
pub(super) struct MemoryCandidates {
    records: Mutex<Vec<CandidateRecord>>,
}

impl MemoryCandidates {
    pub(super) fn snapshot(&self) -> Vec<CandidateRecord> {
        self.records.lock().expect("repository mutex poisoned").clone()
    }
}

impl CandidateRepository for MemoryCandidates {
    fn insert(&self, record: CandidateRecord) -> Result<CandidateRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.iter().any(|existing| existing.email == record.email) {
            return Err(RepositoryError::Conflict);
        }
        guard.push(record.clone());
        Ok(record)
    }

    fn update(&self, record: CandidateRecord) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        let slot = guard
            .iter_mut()
            .find(|existing| existing.id == record.id)
            .ok_or(RepositoryError::NotFound)?;
        *slot = record;
        Ok(())
    }

    fn fetch(&self, id: &CandidateId) -> Result<Option<CandidateRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.iter().find(|record| &record.id == id).cloned())
    }

    fn find_by_email(&self, email: &str) -> Result<Option<CandidateRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.iter().find(|record| record.email == email).cloned())
    }

    fn all(&self) -> Result<Vec<CandidateRecord>, RepositoryError> {
        Ok(self.snapshot())
    }
}

#[derive(Default)]
pub(super) struct MemoryForms {
    forms: Mutex<Vec<ExamForm>>,
}

impl ExamFormRepository for MemoryForms {
    fn insert(&self, form: ExamForm) -> Result<ExamForm, RepositoryError> {
        self.forms
            .lock()
            .expect("forms mutex poisoned")
            .push(form.clone());
        Ok(form)
    }

    fn latest(&self) -> Result<Option<ExamForm>, RepositoryError> {
        Ok(self.forms.lock().expect("forms mutex poisoned").last().cloned())
    }

    fn list(&self) -> Result<Vec<ExamForm>, RepositoryError> {
        let mut forms = self.forms.lock().expect("forms mutex poisoned").clone();
        forms.reverse();
        Ok(forms)
    }
}

pub(super) struct UnavailableCandidates;

impl CandidateRepository for UnavailableCandidates {
    fn insert(&self, _record: CandidateRecord) -> Result<CandidateRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn update(&self, _record: CandidateRecord) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: &CandidateId) -> Result<Option<CandidateRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn find_by_email(&self, _email: &str) -> Result<Option<CandidateRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn all(&self) -> Result<Vec<CandidateRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) fn authority() -> Arc<SessionAuthority> {
    Arc::new(SessionAuthority::new(
        "candidate-tests-secret",
        Duration::hours(2),
        BTreeSet::from([ADMIN_EMAIL.to_string()]),
    ))
}

pub(super) fn exam_form() -> ExamForm {
    ExamForm {
        id: ExamFormId("form-1".to_string()),
        exam_name: "CCAT".to_string(),
        held_date: HeldDate::parse("April 2025").expect("valid held date"),
        start_date: NaiveDate::from_ymd_opt(2025, 4, 5).expect("valid date"),
        end_date: NaiveDate::from_ymd_opt(2025, 4, 7).expect("valid date"),
        exam_count: 3,
        created_at: Utc::now(),
    }
}

pub(super) fn build_service() -> (TestService, Arc<MemoryCandidates>, Arc<MemoryForms>) {
    let candidates = Arc::new(MemoryCandidates::default());
    let forms = Arc::new(MemoryForms::default());
    let service = CandidateService::new(
        candidates.clone(),
        forms.clone(),
        authority(),
        DocumentConfig::default(),
    );
    (service, candidates, forms)
}

pub(super) fn signup(name: &str, email: &str) -> SignupRequest {
    SignupRequest {
        name: Some(name.to_string()),
        email: Some(email.to_string()),
        password: Some("s3cret-pass".to_string()),
        confirm_password: Some("s3cret-pass".to_string()),
        details: ProfileUpdate::default(),
    }
}

pub(super) fn session(email: &str) -> Session {
    Session {
        email: email.to_string(),
        role: Role::Candidate,
    }
}

/// Every field a submission needs, in the shape the form sends it.
pub(super) fn completed_profile(phone: &str, aadhaar: &str) -> ProfileUpdate {
    ProfileUpdate {
        phone: Some(phone.to_string()),
        aadhaar_no: Some(aadhaar.to_string()),
        son_of: Some("Ravi Verma".to_string()),
        resident: Some("Pune".to_string()),
        exam_city_preference1: Some("Pune".to_string()),
        previous_cda_experience: Some(Answer::Yes),
        penalty_clause_agreement: Some(true),
        covid_declaration_agreement: Some(true),
        account_holder_name: Some("Asha Verma".to_string()),
        ifsc: Some("SBIN0001234".to_string()),
        ..ProfileUpdate::default()
    }
}

pub(super) fn apply(details: ProfileUpdate) -> ApplyRequest {
    ApplyRequest {
        declaration_accepted: true,
        details,
    }
}

/// Register and submit a candidate, returning its id.
pub(super) fn submitted_candidate(
    service: &TestService,
    name: &str,
    email: &str,
    phone: &str,
) -> CandidateId {
    let view = service.signup(signup(name, email)).expect("signup succeeds");
    service
        .submit_application(&session(email), apply(completed_profile(phone, "123412341234")))
        .expect("submission succeeds");
    view.id
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
