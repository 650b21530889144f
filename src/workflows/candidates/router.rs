use std::sync::Arc;

use axum::{
    extract::{FromRef, Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;

use super::domain::{ApplyRequest, CandidateId, LoginRequest, ProfileUpdate, SignupRequest};
use super::repository::CandidateRepository;
use super::review::{RemarkRequest, ReviewQuery, StatusUpdate};
use super::service::CandidateService;
use crate::auth::{AdminSession, Session, SessionAuthority};
use crate::workflows::documents::RenderedDocument;
use crate::workflows::exams::ExamFormRepository;
use crate::workflows::offload;

/// Shared state for candidate and review endpoints.
pub struct CandidateRouterState<C, E> {
    pub service: Arc<CandidateService<C, E>>,
    pub authority: Arc<SessionAuthority>,
}

impl<C, E> Clone for CandidateRouterState<C, E> {
    fn clone(&self) -> Self {
        Self {
            service: self.service.clone(),
            authority: self.authority.clone(),
        }
    }
}

impl<C, E> FromRef<CandidateRouterState<C, E>> for Arc<SessionAuthority> {
    fn from_ref(state: &CandidateRouterState<C, E>) -> Self {
        state.authority.clone()
    }
}

/// Router exposing account, application, and admin review endpoints.
pub fn candidate_router<C, E>(service: Arc<CandidateService<C, E>>) -> Router
where
    C: CandidateRepository + 'static,
    E: ExamFormRepository + 'static,
{
    let authority = service.authority().clone();
    Router::new()
        .route("/api/auth/signup", post(signup_handler::<C, E>))
        .route("/api/auth/login", post(login_handler::<C, E>))
        .route(
            "/api/user",
            get(profile_handler::<C, E>).put(update_profile_handler::<C, E>),
        )
        .route("/api/user/apply", post(apply_handler::<C, E>))
        .route("/api/user/documents", get(preview_handler::<C, E>))
        .route("/api/admin/users", get(list_handler::<C, E>))
        .route("/api/admin/users/export", get(export_handler::<C, E>))
        .route("/api/admin/dashboard", get(dashboard_handler::<C, E>))
        .route(
            "/api/admin/candidate/:id",
            get(candidate_handler::<C, E>).put(status_handler::<C, E>),
        )
        .route(
            "/api/admin/candidate/:id/documents",
            get(candidate_documents_handler::<C, E>),
        )
        .route(
            "/api/admin/candidate/:id/remark",
            post(remark_handler::<C, E>),
        )
        .with_state(CandidateRouterState { service, authority })
}

fn pdf_response(document: RenderedDocument) -> Response {
    let disposition = format!("attachment; filename=\"{}\"", document.file_name);
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        document.bytes,
    )
        .into_response()
}

pub(crate) async fn signup_handler<C, E>(
    State(state): State<CandidateRouterState<C, E>>,
    Json(request): Json<SignupRequest>,
) -> Response
where
    C: CandidateRepository + 'static,
    E: ExamFormRepository + 'static,
{
    let service = state.service.clone();
    match offload(move || service.signup(request)).await {
        Ok(_) => (
            StatusCode::CREATED,
            Json(json!({ "message": "User created successfully" })),
        )
            .into_response(),
        Err(error) => error.into_response(),
    }
}

pub(crate) async fn login_handler<C, E>(
    State(state): State<CandidateRouterState<C, E>>,
    Json(request): Json<LoginRequest>,
) -> Response
where
    C: CandidateRepository + 'static,
    E: ExamFormRepository + 'static,
{
    let service = state.service.clone();
    match offload(move || service.login(request)).await {
        Ok(token) => Json(token).into_response(),
        Err(error) => error.into_response(),
    }
}

pub(crate) async fn profile_handler<C, E>(
    State(state): State<CandidateRouterState<C, E>>,
    session: Session,
) -> Response
where
    C: CandidateRepository + 'static,
    E: ExamFormRepository + 'static,
{
    let service = state.service.clone();
    match offload(move || service.profile(&session)).await {
        Ok(view) => Json(view).into_response(),
        Err(error) => error.into_response(),
    }
}

pub(crate) async fn update_profile_handler<C, E>(
    State(state): State<CandidateRouterState<C, E>>,
    session: Session,
    Json(update): Json<ProfileUpdate>,
) -> Response
where
    C: CandidateRepository + 'static,
    E: ExamFormRepository + 'static,
{
    let service = state.service.clone();
    match offload(move || service.update_profile(&session, update)).await {
        Ok(view) => Json(json!({
            "message": "User updated successfully",
            "user": view,
        }))
        .into_response(),
        Err(error) => error.into_response(),
    }
}

pub(crate) async fn apply_handler<C, E>(
    State(state): State<CandidateRouterState<C, E>>,
    session: Session,
    Json(request): Json<ApplyRequest>,
) -> Response
where
    C: CandidateRepository + 'static,
    E: ExamFormRepository + 'static,
{
    let service = state.service.clone();
    match offload(move || service.submit_application(&session, request)).await {
        Ok(view) => Json(json!({
            "message": "Application submitted successfully",
            "user": view,
        }))
        .into_response(),
        Err(error) => error.into_response(),
    }
}

pub(crate) async fn preview_handler<C, E>(
    State(state): State<CandidateRouterState<C, E>>,
    session: Session,
) -> Response
where
    C: CandidateRepository + 'static,
    E: ExamFormRepository + 'static,
{
    let service = state.service.clone();
    match offload(move || service.preview_documents(&session)).await {
        Ok(document) => pdf_response(document),
        Err(error) => error.into_response(),
    }
}

pub(crate) async fn list_handler<C, E>(
    State(state): State<CandidateRouterState<C, E>>,
    _admin: AdminSession,
    Query(query): Query<ReviewQuery>,
) -> Response
where
    C: CandidateRepository + 'static,
    E: ExamFormRepository + 'static,
{
    let service = state.service.clone();
    match offload(move || service.list(&query)).await {
        Ok(page) => Json(page).into_response(),
        Err(error) => error.into_response(),
    }
}

pub(crate) async fn dashboard_handler<C, E>(
    State(state): State<CandidateRouterState<C, E>>,
    _admin: AdminSession,
) -> Response
where
    C: CandidateRepository + 'static,
    E: ExamFormRepository + 'static,
{
    let service = state.service.clone();
    match offload(move || service.dashboard()).await {
        Ok(dashboard) => Json(dashboard).into_response(),
        Err(error) => error.into_response(),
    }
}

pub(crate) async fn candidate_handler<C, E>(
    State(state): State<CandidateRouterState<C, E>>,
    _admin: AdminSession,
    Path(id): Path<String>,
) -> Response
where
    C: CandidateRepository + 'static,
    E: ExamFormRepository + 'static,
{
    let service = state.service.clone();
    match offload(move || service.candidate(&CandidateId(id))).await {
        Ok(view) => Json(view).into_response(),
        Err(error) => error.into_response(),
    }
}

pub(crate) async fn status_handler<C, E>(
    State(state): State<CandidateRouterState<C, E>>,
    AdminSession(admin): AdminSession,
    Path(id): Path<String>,
    Json(update): Json<StatusUpdate>,
) -> Response
where
    C: CandidateRepository + 'static,
    E: ExamFormRepository + 'static,
{
    let service = state.service.clone();
    match offload(move || service.update_status(&CandidateId(id), &update)).await {
        Ok(view) => {
            tracing::debug!(admin = %admin.email, "status change applied");
            Json(view).into_response()
        }
        Err(error) => error.into_response(),
    }
}

pub(crate) async fn candidate_documents_handler<C, E>(
    State(state): State<CandidateRouterState<C, E>>,
    _admin: AdminSession,
    Path(id): Path<String>,
) -> Response
where
    C: CandidateRepository + 'static,
    E: ExamFormRepository + 'static,
{
    let service = state.service.clone();
    match offload(move || service.candidate_documents(&CandidateId(id))).await {
        Ok(document) => pdf_response(document),
        Err(error) => error.into_response(),
    }
}

pub(crate) async fn remark_handler<C, E>(
    State(state): State<CandidateRouterState<C, E>>,
    _admin: AdminSession,
    Path(id): Path<String>,
    Json(request): Json<RemarkRequest>,
) -> Response
where
    C: CandidateRepository + 'static,
    E: ExamFormRepository + 'static,
{
    let service = state.service.clone();
    match offload(move || service.remark(&CandidateId(id), &request)).await {
        Ok(link) => Json(link).into_response(),
        Err(error) => error.into_response(),
    }
}

pub(crate) async fn export_handler<C, E>(
    State(state): State<CandidateRouterState<C, E>>,
    _admin: AdminSession,
) -> Response
where
    C: CandidateRepository + 'static,
    E: ExamFormRepository + 'static,
{
    let service = state.service.clone();
    match offload(move || service.export_csv()).await {
        Ok(bytes) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
                (header::CONTENT_DISPOSITION, "attachment; filename=\"candidates.csv\""),
            ],
            bytes,
        )
            .into_response(),
        Err(error) => error.into_response(),
    }
}
