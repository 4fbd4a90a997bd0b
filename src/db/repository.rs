//! Database repository for CRUD operations.
//!
//! Uses prepared statements and transactions for data integrity.

use std::collections::HashMap;

use chrono::Utc;
use sqlx::{Row, SqlitePool};

use crate::errors::AppError;
use crate::models::{
    BatchStatusItem, Category, Datastore, Employee, NewSuggestionRequest, Priority, RevisionInfo,
    RiskLevel, Source, Suggestion, SuggestionStatus, UpdateSuggestionRequest,
};

/// Database repository for all data operations.
#[derive(Clone)]
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Get the current revision ID.
    pub async fn get_revision_id(&self) -> Result<i64, AppError> {
        let row = sqlx::query("SELECT revision_id FROM meta WHERE id = 1")
            .fetch_one(&self.pool)
            .await?;
        Ok(row.get("revision_id"))
    }

    /// Get revision info.
    pub async fn get_revision_info(&self) -> Result<RevisionInfo, AppError> {
        let row = sqlx::query("SELECT revision_id, generated_at FROM meta WHERE id = 1")
            .fetch_one(&self.pool)
            .await?;
        Ok(RevisionInfo {
            revision_id: row.get("revision_id"),
            generated_at: row.get("generated_at"),
        })
    }

    /// Increment the revision ID and return the new value.
    pub async fn increment_revision(&self) -> Result<i64, AppError> {
        let now = Utc::now().to_rfc3339();
        sqlx::query("UPDATE meta SET revision_id = revision_id + 1, generated_at = ? WHERE id = 1")
            .bind(&now)
            .execute(&self.pool)
            .await?;
        self.get_revision_id().await
    }

    /// Get the full datastore.
    pub async fn get_datastore(&self) -> Result<Datastore, AppError> {
        let meta =
            sqlx::query("SELECT schema_version, revision_id, generated_at FROM meta WHERE id = 1")
                .fetch_one(&self.pool)
                .await?;

        let employees = self.list_employees().await?;
        let suggestions = self.list_suggestions().await?;

        Ok(Datastore {
            schema_version: meta.get("schema_version"),
            revision_id: meta.get("revision_id"),
            generated_at: meta.get("generated_at"),
            employees,
            suggestions,
        })
    }

    // ==================== EMPLOYEE OPERATIONS ====================

    /// List all employees.
    pub async fn list_employees(&self) -> Result<Vec<Employee>, AppError> {
        let rows =
            sqlx::query("SELECT id, name, department, risk_level FROM employees ORDER BY name")
                .fetch_all(&self.pool)
                .await?;

        Ok(rows.iter().map(employee_from_row).collect())
    }

    /// Get an employee by ID.
    pub async fn get_employee(&self, id: &str) -> Result<Option<Employee>, AppError> {
        let row = sqlx::query("SELECT id, name, department, risk_level FROM employees WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.as_ref().map(employee_from_row))
    }

    /// Build an id-to-employee lookup map for filter evaluation.
    pub async fn employee_map(&self) -> Result<HashMap<String, Employee>, AppError> {
        let employees = self.list_employees().await?;
        Ok(employees
            .into_iter()
            .map(|employee| (employee.id.clone(), employee))
            .collect())
    }

    // ==================== SUGGESTION OPERATIONS ====================

    /// List all suggestions, newest first.
    pub async fn list_suggestions(&self) -> Result<Vec<Suggestion>, AppError> {
        let rows = sqlx::query(
            r#"SELECT id, employee_id, employee_name, source, category, description,
                      status, priority, date_created, date_updated, date_completed,
                      notes, created_by
               FROM suggestions ORDER BY date_created DESC"#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(suggestion_from_row).collect())
    }

    /// Get a suggestion by ID.
    pub async fn get_suggestion(&self, id: &str) -> Result<Option<Suggestion>, AppError> {
        let row = sqlx::query(
            r#"SELECT id, employee_id, employee_name, source, category, description,
                      status, priority, date_created, date_updated, date_completed,
                      notes, created_by
               FROM suggestions WHERE id = ?"#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(suggestion_from_row))
    }

    /// Create a new suggestion.
    ///
    /// Forces status = PENDING and source = ADMIN, denormalizes the employee
    /// name at write time, and leaves date_completed null.
    pub async fn create_suggestion(
        &self,
        request: &NewSuggestionRequest,
    ) -> Result<Suggestion, AppError> {
        let employee = self
            .get_employee(&request.employee_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Employee {} not found", request.employee_id))
            })?;

        if request.description.trim().is_empty() {
            return Err(AppError::Validation("Description is required".to_string()));
        }

        let id = uuid::Uuid::new_v4().to_string();
        let now = Utc::now().to_rfc3339();
        let priority = request.priority.unwrap_or(Priority::Medium);

        sqlx::query(
            r#"INSERT INTO suggestions (
                id, employee_id, employee_name, source, category, description,
                status, priority, date_created, date_updated, date_completed,
                notes, created_by
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, NULL, ?, NULL)"#,
        )
        .bind(&id)
        .bind(&employee.id)
        .bind(&employee.name)
        .bind(Source::Admin.as_str())
        .bind(request.category.as_str())
        .bind(&request.description)
        .bind(SuggestionStatus::Pending.as_str())
        .bind(priority.as_str())
        .bind(&now)
        .bind(&now)
        .bind("")
        .execute(&self.pool)
        .await?;

        self.increment_revision().await?;

        Ok(Suggestion {
            id,
            employee_id: employee.id,
            employee_name: employee.name,
            source: Source::Admin,
            category: request.category,
            description: request.description.clone(),
            status: SuggestionStatus::Pending,
            priority,
            date_created: now.clone(),
            date_updated: now,
            date_completed: None,
            notes: Some(String::new()),
            created_by: None,
        })
    }

    /// Update a suggestion, merging the provided fields.
    ///
    /// date_completed is stamped when the resulting status is COMPLETED and
    /// is never cleared otherwise. A changed employee_id re-denormalizes the
    /// employee name.
    pub async fn update_suggestion(
        &self,
        id: &str,
        request: &UpdateSuggestionRequest,
    ) -> Result<Suggestion, AppError> {
        let existing = self
            .get_suggestion(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Suggestion {} not found", id)))?;

        let (employee_id, employee_name) = match &request.employee_id {
            Some(new_id) => {
                let employee = self.get_employee(new_id).await?.ok_or_else(|| {
                    AppError::NotFound(format!("Employee {} not found", new_id))
                })?;
                (employee.id, employee.name)
            }
            None => (existing.employee_id.clone(), existing.employee_name.clone()),
        };

        let now = Utc::now().to_rfc3339();
        let category = request.category.unwrap_or(existing.category);
        let description = request
            .description
            .as_ref()
            .unwrap_or(&existing.description);
        let priority = request.priority.unwrap_or(existing.priority);
        let status = request.status.unwrap_or(existing.status);
        let notes = request.notes.clone().or(existing.notes.clone());

        let date_completed = if status == SuggestionStatus::Completed {
            Some(now.clone())
        } else {
            existing.date_completed.clone()
        };

        let result = sqlx::query(
            r#"UPDATE suggestions SET
                employee_id = ?, employee_name = ?, category = ?, description = ?,
                priority = ?, status = ?, notes = ?, date_updated = ?, date_completed = ?
            WHERE id = ?"#,
        )
        .bind(&employee_id)
        .bind(&employee_name)
        .bind(category.as_str())
        .bind(description)
        .bind(priority.as_str())
        .bind(status.as_str())
        .bind(&notes)
        .bind(&now)
        .bind(&date_completed)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Suggestion {} not found", id)));
        }

        self.increment_revision().await?;

        Ok(Suggestion {
            id: id.to_string(),
            employee_id,
            employee_name,
            source: existing.source,
            category,
            description: description.clone(),
            status,
            priority,
            date_created: existing.date_created,
            date_updated: now,
            date_completed,
            notes,
            created_by: existing.created_by,
        })
    }

    /// Batch update suggestion statuses.
    ///
    /// All updates share one timestamp and are applied in a single
    /// transaction: any unresolvable id fails the whole batch with no state
    /// change. The revision increments once per successful batch.
    pub async fn batch_update_status(
        &self,
        items: &[BatchStatusItem],
    ) -> Result<Vec<Suggestion>, AppError> {
        let now = Utc::now().to_rfc3339();
        let mut results = Vec::new();

        let mut tx = self.pool.begin().await?;

        for item in items {
            let row = sqlx::query(
                r#"SELECT id, employee_id, employee_name, source, category, description,
                          status, priority, date_created, date_updated, date_completed,
                          notes, created_by
                   FROM suggestions WHERE id = ?"#,
            )
            .bind(&item.id)
            .fetch_optional(&mut *tx)
            .await?;

            let existing = row.as_ref().map(suggestion_from_row).ok_or_else(|| {
                AppError::NotFound(format!("Suggestion {} not found", item.id))
            })?;

            let date_completed = if item.status == SuggestionStatus::Completed {
                Some(now.clone())
            } else {
                existing.date_completed.clone()
            };

            sqlx::query(
                "UPDATE suggestions SET status = ?, date_updated = ?, date_completed = ? WHERE id = ?",
            )
            .bind(item.status.as_str())
            .bind(&now)
            .bind(&date_completed)
            .bind(&item.id)
            .execute(&mut *tx)
            .await?;

            results.push(Suggestion {
                status: item.status,
                date_updated: now.clone(),
                date_completed,
                ..existing
            });
        }

        // Increment revision once for the entire batch
        sqlx::query("UPDATE meta SET revision_id = revision_id + 1, generated_at = ? WHERE id = 1")
            .bind(&now)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(results)
    }

    // ==================== SEED OPERATIONS ====================

    /// True if the store holds no employees and no suggestions.
    pub async fn is_empty(&self) -> Result<bool, AppError> {
        let row = sqlx::query(
            "SELECT (SELECT COUNT(*) FROM employees) + (SELECT COUNT(*) FROM suggestions) AS total",
        )
        .fetch_one(&self.pool)
        .await?;
        let total: i64 = row.get("total");
        Ok(total == 0)
    }

    /// Import seed records, incrementing the revision once.
    pub async fn import_seed(
        &self,
        employees: &[Employee],
        suggestions: &[Suggestion],
    ) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        for employee in employees {
            sqlx::query(
                "INSERT OR REPLACE INTO employees (id, name, department, risk_level) VALUES (?, ?, ?, ?)",
            )
            .bind(&employee.id)
            .bind(&employee.name)
            .bind(&employee.department)
            .bind(employee.risk_level.map(|r| r.as_str()))
            .execute(&mut *tx)
            .await?;
        }

        for suggestion in suggestions {
            sqlx::query(
                r#"INSERT OR REPLACE INTO suggestions (
                    id, employee_id, employee_name, source, category, description,
                    status, priority, date_created, date_updated, date_completed,
                    notes, created_by
                ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"#,
            )
            .bind(&suggestion.id)
            .bind(&suggestion.employee_id)
            .bind(&suggestion.employee_name)
            .bind(suggestion.source.as_str())
            .bind(suggestion.category.as_str())
            .bind(&suggestion.description)
            .bind(suggestion.status.as_str())
            .bind(suggestion.priority.as_str())
            .bind(&suggestion.date_created)
            .bind(&suggestion.date_updated)
            .bind(&suggestion.date_completed)
            .bind(&suggestion.notes)
            .bind(&suggestion.created_by)
            .execute(&mut *tx)
            .await?;
        }

        let now = Utc::now().to_rfc3339();
        sqlx::query("UPDATE meta SET revision_id = revision_id + 1, generated_at = ? WHERE id = 1")
            .bind(&now)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }
}

// Helper functions for row conversion

fn employee_from_row(row: &sqlx::sqlite::SqliteRow) -> Employee {
    let risk_str: Option<String> = row.get("risk_level");
    Employee {
        id: row.get("id"),
        name: row.get("name"),
        department: row.get("department"),
        risk_level: risk_str.and_then(|s| RiskLevel::from_str(&s)),
    }
}

fn suggestion_from_row(row: &sqlx::sqlite::SqliteRow) -> Suggestion {
    let source_str: String = row.get("source");
    let category_str: String = row.get("category");
    let status_str: String = row.get("status");
    let priority_str: String = row.get("priority");

    Suggestion {
        id: row.get("id"),
        employee_id: row.get("employee_id"),
        employee_name: row.get("employee_name"),
        source: Source::from_str(&source_str).unwrap_or(Source::Vida),
        category: Category::from_str(&category_str).unwrap_or(Category::Lifestyle),
        description: row.get("description"),
        status: SuggestionStatus::from_str(&status_str).unwrap_or(SuggestionStatus::Pending),
        priority: Priority::from_str(&priority_str).unwrap_or(Priority::Medium),
        date_created: row.get("date_created"),
        date_updated: row.get("date_updated"),
        date_completed: row.get("date_completed"),
        notes: row.get("notes"),
        created_by: row.get("created_by"),
    }
}
