use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde_json::json;

use super::domain::{AttemptId, AttemptSubmission};
use super::repository::{AttemptRepository, RepositoryError};
use super::service::{AttemptService, AttemptServiceError};
use crate::catalog::TestCatalog;
use crate::scoring::TestId;

/// Router builder exposing the catalog and attempt endpoints.
pub fn attempt_router<C, R>(service: Arc<AttemptService<C, R>>) -> Router
where
    C: TestCatalog + 'static,
    R: AttemptRepository + 'static,
{
    Router::new()
        .route("/api/v1/tests", get(list_tests_handler::<C, R>))
        .route("/api/v1/tests/:test_id", get(test_handler::<C, R>))
        .route("/api/v1/attempts", post(submit_handler::<C, R>))
        .route(
            "/api/v1/attempts/:attempt_id",
            get(attempt_handler::<C, R>),
        )
        .route(
            "/api/v1/attempts/:attempt_id/prompt",
            get(prompt_handler::<C, R>),
        )
        .with_state(service)
}

pub(crate) async fn list_tests_handler<C, R>(
    State(service): State<Arc<AttemptService<C, R>>>,
) -> Response
where
    C: TestCatalog + 'static,
    R: AttemptRepository + 'static,
{
    match service.tests() {
        Ok(tests) => (StatusCode::OK, axum::Json(tests)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn test_handler<C, R>(
    State(service): State<Arc<AttemptService<C, R>>>,
    Path(test_id): Path<String>,
) -> Response
where
    C: TestCatalog + 'static,
    R: AttemptRepository + 'static,
{
    match service.definition(&TestId(test_id)) {
        Ok(definition) => (StatusCode::OK, axum::Json(definition.as_ref())).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn submit_handler<C, R>(
    State(service): State<Arc<AttemptService<C, R>>>,
    axum::Json(submission): axum::Json<AttemptSubmission>,
) -> Response
where
    C: TestCatalog + 'static,
    R: AttemptRepository + 'static,
{
    match service.submit(submission) {
        Ok(record) => {
            let view = record.summary_view();
            (StatusCode::CREATED, axum::Json(view)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn attempt_handler<C, R>(
    State(service): State<Arc<AttemptService<C, R>>>,
    Path(attempt_id): Path<String>,
) -> Response
where
    C: TestCatalog + 'static,
    R: AttemptRepository + 'static,
{
    match service.get(&AttemptId(attempt_id)) {
        Ok(record) => (StatusCode::OK, axum::Json(record)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn prompt_handler<C, R>(
    State(service): State<Arc<AttemptService<C, R>>>,
    Path(attempt_id): Path<String>,
) -> Response
where
    C: TestCatalog + 'static,
    R: AttemptRepository + 'static,
{
    match service.interpretation_prompt(&AttemptId(attempt_id)) {
        Ok(prompt) => (StatusCode::OK, axum::Json(prompt)).into_response(),
        Err(error) => error_response(error),
    }
}

fn error_response(error: AttemptServiceError) -> Response {
    let status = match &error {
        AttemptServiceError::UnknownTest(_)
        | AttemptServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        AttemptServiceError::Scoring(_) => StatusCode::UNPROCESSABLE_ENTITY,
        AttemptServiceError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        AttemptServiceError::Repository(RepositoryError::Unavailable(_))
        | AttemptServiceError::Catalog(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    let payload = json!({
        "error": error.to_string(),
    });
    (status, axum::Json(payload)).into_response()
}
