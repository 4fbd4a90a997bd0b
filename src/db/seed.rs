//! Seed fixture import.
//!
//! Loads the JSON sample fixture the frontend mock resolver shipped with and
//! normalizes its loosely-cased fields into the strict data model.

use std::path::Path;

use serde::Deserialize;

use crate::errors::AppError;
use crate::models::{
    Category, Employee, Priority, RiskLevel, Source, Suggestion, SuggestionStatus,
};

/// Root of the seed fixture file.
#[derive(Debug, Deserialize)]
pub struct SeedFile {
    #[serde(default)]
    pub employees: Vec<SeedEmployee>,
    #[serde(default)]
    pub suggestions: Vec<SeedSuggestion>,
}

/// Employee record as it appears in the fixture (casing unnormalized).
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedEmployee {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub risk_level: Option<String>,
}

/// Suggestion record as it appears in the fixture. The fixture calls the
/// category field "type".
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedSuggestion {
    pub id: String,
    pub employee_id: String,
    pub source: String,
    #[serde(rename = "type")]
    pub category: String,
    pub description: String,
    pub status: String,
    pub priority: String,
    pub date_created: String,
    pub date_updated: String,
    #[serde(default)]
    pub date_completed: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub created_by: Option<String>,
}

/// Read and parse a seed fixture file.
pub async fn load_seed(path: &Path) -> Result<SeedFile, AppError> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to read seed file: {}", e)))?;
    let seed: SeedFile = serde_json::from_slice(&bytes)
        .map_err(|e| AppError::BadRequest(format!("Invalid seed file: {}", e)))?;
    Ok(seed)
}

impl SeedFile {
    /// Normalize the fixture into model records.
    ///
    /// Employee names are denormalized onto suggestions here, with "Unknown"
    /// standing in for a dangling employee reference.
    pub fn into_records(self) -> (Vec<Employee>, Vec<Suggestion>) {
        let employees: Vec<Employee> = self
            .employees
            .into_iter()
            .map(|e| Employee {
                id: e.id,
                name: e.name,
                department: e.department,
                risk_level: e
                    .risk_level
                    .and_then(|r| RiskLevel::from_str(&r.to_uppercase())),
            })
            .collect();

        let suggestions = self
            .suggestions
            .into_iter()
            .map(|s| {
                let employee_name = employees
                    .iter()
                    .find(|e| e.id == s.employee_id)
                    .map(|e| e.name.clone())
                    .unwrap_or_else(|| "Unknown".to_string());

                Suggestion {
                    id: s.id,
                    employee_id: s.employee_id,
                    employee_name,
                    source: Source::from_str(&s.source.to_uppercase()).unwrap_or(Source::Vida),
                    category: normalize_category(&s.category),
                    description: s.description,
                    status: SuggestionStatus::from_str(&s.status.to_uppercase())
                        .unwrap_or(SuggestionStatus::Pending),
                    priority: Priority::from_str(&s.priority.to_uppercase())
                        .unwrap_or(Priority::Medium),
                    date_created: s.date_created,
                    date_updated: s.date_updated,
                    date_completed: s.date_completed,
                    notes: Some(s.notes.unwrap_or_default()),
                    created_by: s.created_by,
                }
            })
            .collect();

        (employees, suggestions)
    }
}

/// Map a fixture category string onto the category enumeration.
///
/// Accepts the BEHAVIORAL spelling; anything unrecognized is LIFESTYLE.
fn normalize_category(raw: &str) -> Category {
    match raw.to_uppercase().as_str() {
        "BEHAVIOURAL" | "BEHAVIORAL" => Category::Behavioural,
        "EQUIPMENT" => Category::Equipment,
        "EXERCISE" => Category::Exercise,
        _ => Category::Lifestyle,
    }
}
