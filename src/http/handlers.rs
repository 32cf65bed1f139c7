//! HTTP handlers for the REST API.
//!
//! Each handler corresponds to an API endpoint: it validates the request,
//! delegates to the service layer, and projects the result into its
//! response shape.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use tracing::info;

use super::dto::{
    AnswersQuery, DeleteAnswersQuery, DeletedResponse, FeaturePreconditionRequest,
    FeaturePreconditionResponse, HealthResponse, QuestionnaireRequest, QuestionnaireResponse,
    Validation, ValidationAnswerRequest, ValidationAnswerResponse, ValidationCombinationResult,
    ValidationSummary, ValidationValue,
};
use super::error::AppError;
use super::state::AppState;
use crate::api::{PreconditionId, QuestionnaireId};
use crate::db::services as db_services;

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

// =============================================================================
// Health Check
// =============================================================================

/// GET /health
///
/// Health check endpoint to verify the service is running and the database
/// is accessible.
pub async fn health_check(State(state): State<AppState>) -> HandlerResult<HealthResponse> {
    let db_status = match db_services::health_check(state.repository.as_ref()).await {
        Ok(true) => "connected".to_string(),
        Ok(false) => "disconnected".to_string(),
        Err(e) => format!("error: {}", e),
    };

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: "v1".to_string(),
        database: db_status,
    }))
}

// =============================================================================
// Feature Preconditions
// =============================================================================

/// POST /api/feature-preconditions
///
/// Create a new feature precondition from the submitted answer.
pub async fn create_precondition(
    State(state): State<AppState>,
    Json(request): Json<FeaturePreconditionRequest>,
) -> HandlerResult<FeaturePreconditionResponse> {
    info!("Creating feature precondition");

    let precondition =
        db_services::create_precondition(state.repository.as_ref(), &request.answer).await?;

    Ok(Json(precondition.into()))
}

/// PUT /api/feature-preconditions/{id}
///
/// Replace the answer of an existing feature precondition.
pub async fn update_precondition(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(request): Json<FeaturePreconditionRequest>,
) -> HandlerResult<FeaturePreconditionResponse> {
    info!("Updating feature precondition with id: {}", id);

    let precondition = db_services::update_precondition(
        state.repository.as_ref(),
        PreconditionId::new(id),
        &request.answer,
    )
    .await?;

    Ok(Json(precondition.into()))
}

// =============================================================================
// Questionnaires
// =============================================================================

/// GET /api/questionnaires
///
/// List every questionnaire with its validation answers.
pub async fn list_questionnaires(
    State(state): State<AppState>,
) -> HandlerResult<Vec<QuestionnaireResponse>> {
    let questionnaires = db_services::list_questionnaires(state.repository.as_ref()).await?;

    Ok(Json(questionnaires.into_iter().map(Into::into).collect()))
}

/// POST /api/questionnaires
///
/// Create a questionnaire, or rename an existing one when an id is given.
pub async fn save_questionnaire(
    State(state): State<AppState>,
    Json(request): Json<QuestionnaireRequest>,
) -> HandlerResult<QuestionnaireResponse> {
    request.validate().map_err(AppError::BadRequest)?;

    let questionnaire =
        db_services::save_questionnaire(state.repository.as_ref(), &request.into()).await?;

    Ok(Json(questionnaire.into()))
}

/// DELETE /api/questionnaires/{id}
///
/// Delete a questionnaire and its answers.
pub async fn delete_questionnaire(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> HandlerResult<DeletedResponse> {
    let deleted =
        db_services::delete_questionnaire(state.repository.as_ref(), QuestionnaireId::new(id))
            .await?;

    Ok(Json(DeletedResponse { deleted }))
}

// =============================================================================
// Validation Answers
// =============================================================================

/// GET /api/validation-answers?questionnaire_id=N
///
/// List every answer of a questionnaire.
pub async fn list_validation_answers(
    State(state): State<AppState>,
    Query(query): Query<AnswersQuery>,
) -> HandlerResult<Vec<ValidationAnswerResponse>> {
    let answers = db_services::list_validation_answers(
        state.repository.as_ref(),
        QuestionnaireId::new(query.questionnaire_id),
    )
    .await?;

    Ok(Json(answers.into_iter().map(Into::into).collect()))
}

/// POST /api/validation-answers
///
/// Save a validation answer (insert without id, overwrite with id).
pub async fn save_validation_answer(
    State(state): State<AppState>,
    Json(request): Json<ValidationAnswerRequest>,
) -> HandlerResult<ValidationAnswerResponse> {
    request.validate().map_err(AppError::BadRequest)?;

    let answer =
        db_services::save_validation_answer(state.repository.as_ref(), &request.into()).await?;

    Ok(Json(answer.into()))
}

/// DELETE /api/validation-answers?questionnaire_id=N&row_id=M
///
/// Delete all answers of one grid row.
pub async fn delete_validation_answer_row(
    State(state): State<AppState>,
    Query(query): Query<DeleteAnswersQuery>,
) -> HandlerResult<DeletedResponse> {
    let deleted = db_services::delete_validation_answer_row(
        state.repository.as_ref(),
        QuestionnaireId::new(query.questionnaire_id),
        query.row_id,
    )
    .await?;

    Ok(Json(DeletedResponse { deleted }))
}

// =============================================================================
// Validation Reference Data
// =============================================================================

/// GET /api/validations
pub async fn list_validations(State(state): State<AppState>) -> HandlerResult<Vec<Validation>> {
    let validations = db_services::list_validations(state.repository.as_ref()).await?;
    Ok(Json(validations))
}

/// GET /api/validation-summaries
pub async fn list_validation_summaries(
    State(state): State<AppState>,
) -> HandlerResult<Vec<ValidationSummary>> {
    let summaries = db_services::list_validation_summaries(state.repository.as_ref()).await?;
    Ok(Json(summaries))
}

/// GET /api/validation-values
pub async fn list_validation_values(
    State(state): State<AppState>,
) -> HandlerResult<Vec<ValidationValue>> {
    let values = db_services::list_validation_values(state.repository.as_ref()).await?;
    Ok(Json(values))
}

/// GET /api/validation-combination-results
pub async fn list_validation_combination_results(
    State(state): State<AppState>,
) -> HandlerResult<Vec<ValidationCombinationResult>> {
    let results =
        db_services::list_validation_combination_results(state.repository.as_ref()).await?;
    Ok(Json(results))
}
