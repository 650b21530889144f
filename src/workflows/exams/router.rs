use std::sync::Arc;

use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};

use super::domain::NewExamForm;
use super::repository::ExamFormRepository;
use super::service::ExamFormService;
use crate::auth::{AdminSession, SessionAuthority};
use crate::workflows::offload;

/// Shared state for the exam form endpoints.
pub struct ExamRouterState<E> {
    pub service: Arc<ExamFormService<E>>,
    pub authority: Arc<SessionAuthority>,
}

impl<E> Clone for ExamRouterState<E> {
    fn clone(&self) -> Self {
        Self {
            service: self.service.clone(),
            authority: self.authority.clone(),
        }
    }
}

impl<E> FromRef<ExamRouterState<E>> for Arc<SessionAuthority> {
    fn from_ref(state: &ExamRouterState<E>) -> Self {
        state.authority.clone()
    }
}

/// Admin endpoints for publishing and listing exam windows.
pub fn exam_form_router<E>(
    service: Arc<ExamFormService<E>>,
    authority: Arc<SessionAuthority>,
) -> Router
where
    E: ExamFormRepository + 'static,
{
    Router::new()
        .route(
            "/api/admin/form",
            get(latest_handler::<E>).post(create_handler::<E>),
        )
        .route("/api/admin/forms", get(list_handler::<E>))
        .with_state(ExamRouterState { service, authority })
}

pub(crate) async fn create_handler<E>(
    State(state): State<ExamRouterState<E>>,
    AdminSession(admin): AdminSession,
    Json(request): Json<NewExamForm>,
) -> Response
where
    E: ExamFormRepository + 'static,
{
    let service = state.service.clone();
    match offload(move || service.create(request)).await {
        Ok(form) => {
            tracing::debug!(admin = %admin.email, "exam form created by admin");
            (StatusCode::CREATED, Json(form)).into_response()
        }
        Err(error) => error.into_response(),
    }
}

/// Open to every caller; the candidate form shows the live window.
pub(crate) async fn latest_handler<E>(State(state): State<ExamRouterState<E>>) -> Response
where
    E: ExamFormRepository + 'static,
{
    let service = state.service.clone();
    match offload(move || service.latest()).await {
        Ok(form) => Json(form).into_response(),
        Err(error) => error.into_response(),
    }
}

pub(crate) async fn list_handler<E>(
    State(state): State<ExamRouterState<E>>,
    _admin: AdminSession,
) -> Response
where
    E: ExamFormRepository + 'static,
{
    let service = state.service.clone();
    match offload(move || service.list()).await {
        Ok(forms) => Json(forms).into_response(),
        Err(error) => error.into_response(),
    }
}
