//! Employee API endpoints.
//!
//! Employees are read-only through the API; they enter the store via the
//! seed importer.

use axum::extract::{Path, State};

use super::{error, success, ApiResult};
use crate::errors::AppError;
use crate::models::Employee;
use crate::AppState;

/// GET /api/employees - List all employees.
pub async fn list_employees(State(state): State<AppState>) -> ApiResult<Vec<Employee>> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match state.repo.list_employees().await {
        Ok(employees) => success(employees, revision_id),
        Err(e) => error(e, revision_id),
    }
}

/// GET /api/employees/:id - Get a single employee.
pub async fn get_employee(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Employee> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match state.repo.get_employee(&id).await {
        Ok(Some(employee)) => success(employee, revision_id),
        Ok(None) => error(
            AppError::NotFound(format!("Employee {} not found", id)),
            revision_id,
        ),
        Err(e) => error(e, revision_id),
    }
}
