//! Suggestion API endpoints.

use axum::{
    extract::{Path, Query, State},
    Json,
};

use super::{error, success, ApiResult};
use crate::errors::AppError;
use crate::filter::{self, FilterSpec};
use crate::models::{
    BatchStatusRequest, NewSuggestionRequest, Suggestion, UpdateSuggestionRequest,
};
use crate::AppState;

/// Description bounds enforced at the API boundary, mirroring the frontend
/// form rules.
const DESCRIPTION_MIN_CHARS: usize = 10;
const DESCRIPTION_MAX_CHARS: usize = 500;

/// Validate a description the way the suggestion form does.
fn validate_description(description: &str) -> Result<(), AppError> {
    let trimmed = description.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation("Description is required".to_string()));
    }
    if trimmed.chars().count() < DESCRIPTION_MIN_CHARS {
        return Err(AppError::Validation(format!(
            "Description must be at least {} characters",
            DESCRIPTION_MIN_CHARS
        )));
    }
    if trimmed.chars().count() > DESCRIPTION_MAX_CHARS {
        return Err(AppError::Validation(format!(
            "Description must be less than {} characters",
            DESCRIPTION_MAX_CHARS
        )));
    }
    Ok(())
}

/// GET /api/suggestions - List suggestions matching the filter parameters.
///
/// The free-text query is trimmed here (caller-side policy) before the
/// evaluator sees it.
pub async fn list_suggestions(
    State(state): State<AppState>,
    Query(spec): Query<FilterSpec>,
) -> ApiResult<Vec<Suggestion>> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);
    let spec = spec.normalized();

    let employees = match state.repo.employee_map().await {
        Ok(map) => map,
        Err(e) => return error(e, revision_id),
    };

    match state.repo.list_suggestions().await {
        Ok(suggestions) => {
            let matching = suggestions
                .into_iter()
                .filter(|suggestion| filter::matches(suggestion, &employees, &spec))
                .collect();
            success(matching, revision_id)
        }
        Err(e) => error(e, revision_id),
    }
}

/// GET /api/suggestions/:id - Get a single suggestion.
pub async fn get_suggestion(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Suggestion> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match state.repo.get_suggestion(&id).await {
        Ok(Some(suggestion)) => success(suggestion, revision_id),
        Ok(None) => error(
            AppError::NotFound(format!("Suggestion {} not found", id)),
            revision_id,
        ),
        Err(e) => error(e, revision_id),
    }
}

/// POST /api/suggestions - Create a new suggestion.
pub async fn create_suggestion(
    State(state): State<AppState>,
    Json(request): Json<NewSuggestionRequest>,
) -> ApiResult<Suggestion> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    // Validate before any store call
    if request.employee_id.trim().is_empty() {
        return error(
            AppError::Validation("Employee is required".to_string()),
            revision_id,
        );
    }
    if let Err(e) = validate_description(&request.description) {
        return error(e, revision_id);
    }

    match state.repo.create_suggestion(&request).await {
        Ok(suggestion) => {
            let new_revision = state.repo.get_revision_id().await.unwrap_or(revision_id);
            success(suggestion, new_revision)
        }
        Err(e) => error(e, revision_id),
    }
}

/// PUT /api/suggestions/:id - Update a suggestion.
pub async fn update_suggestion(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateSuggestionRequest>,
) -> ApiResult<Suggestion> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    if let Some(description) = &request.description {
        if let Err(e) = validate_description(description) {
            return error(e, revision_id);
        }
    }

    match state.repo.update_suggestion(&id, &request).await {
        Ok(suggestion) => {
            let new_revision = state.repo.get_revision_id().await.unwrap_or(revision_id);
            success(suggestion, new_revision)
        }
        Err(e) => error(e, revision_id),
    }
}

/// PUT /api/suggestions/batch - Batch update suggestion statuses.
///
/// Atomic: either every targeted record is updated or none is.
pub async fn batch_update_status(
    State(state): State<AppState>,
    Json(request): Json<BatchStatusRequest>,
) -> ApiResult<Vec<Suggestion>> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    if request.items.is_empty() {
        return error(
            AppError::Validation("No updates provided".to_string()),
            revision_id,
        );
    }

    match state.repo.batch_update_status(&request.items).await {
        Ok(suggestions) => {
            let new_revision = state.repo.get_revision_id().await.unwrap_or(revision_id);
            success(suggestions, new_revision)
        }
        Err(e) => error(e, revision_id),
    }
}
