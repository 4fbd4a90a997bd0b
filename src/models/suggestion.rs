//! Suggestion model matching the frontend Suggestion interface.

use serde::{Deserialize, Serialize};

/// Workflow status of a suggestion.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SuggestionStatus {
    Pending,
    InProgress,
    Completed,
    Dismissed,
    Overdue,
}

impl SuggestionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SuggestionStatus::Pending => "PENDING",
            SuggestionStatus::InProgress => "IN_PROGRESS",
            SuggestionStatus::Completed => "COMPLETED",
            SuggestionStatus::Dismissed => "DISMISSED",
            SuggestionStatus::Overdue => "OVERDUE",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "PENDING" => Some(SuggestionStatus::Pending),
            "IN_PROGRESS" => Some(SuggestionStatus::InProgress),
            "COMPLETED" => Some(SuggestionStatus::Completed),
            "DISMISSED" => Some(SuggestionStatus::Dismissed),
            "OVERDUE" => Some(SuggestionStatus::Overdue),
            _ => None,
        }
    }
}

/// Suggestion category.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Category {
    Exercise,
    Equipment,
    Behavioural,
    Lifestyle,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Exercise => "EXERCISE",
            Category::Equipment => "EQUIPMENT",
            Category::Behavioural => "BEHAVIOURAL",
            Category::Lifestyle => "LIFESTYLE",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "EXERCISE" => Some(Category::Exercise),
            "EQUIPMENT" => Some(Category::Equipment),
            "BEHAVIOURAL" => Some(Category::Behavioural),
            "LIFESTYLE" => Some(Category::Lifestyle),
            _ => None,
        }
    }
}

/// Suggestion priority.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::High => "HIGH",
            Priority::Medium => "MEDIUM",
            Priority::Low => "LOW",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "HIGH" => Some(Priority::High),
            "MEDIUM" => Some(Priority::Medium),
            "LOW" => Some(Priority::Low),
            _ => None,
        }
    }
}

/// Origin of a suggestion: a human operator or the automated system.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Source {
    Admin,
    Vida,
}

impl Source {
    pub fn as_str(&self) -> &'static str {
        match self {
            Source::Admin => "ADMIN",
            Source::Vida => "VIDA",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "ADMIN" => Some(Source::Admin),
            "VIDA" => Some(Source::Vida),
            _ => None,
        }
    }
}

/// A health/safety suggestion tied to an employee.
///
/// `employee_name` is denormalized from the referenced employee at write
/// time and is not live-updated if the employee is later renamed.
/// `date_completed` is stamped on every transition to COMPLETED and never
/// cleared afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Suggestion {
    pub id: String,
    pub employee_id: String,
    pub employee_name: String,
    pub source: Source,
    pub category: Category,
    pub description: String,
    pub status: SuggestionStatus,
    pub priority: Priority,
    pub date_created: String,
    pub date_updated: String,
    pub date_completed: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
}

/// Request body for creating a new suggestion.
///
/// Status and source are not accepted here: creation forces PENDING/ADMIN.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSuggestionRequest {
    pub employee_id: String,
    pub category: Category,
    pub description: String,
    #[serde(default)]
    pub priority: Option<Priority>,
}

/// Request body for updating an existing suggestion.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSuggestionRequest {
    #[serde(default)]
    pub employee_id: Option<String>,
    #[serde(default)]
    pub category: Option<Category>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub priority: Option<Priority>,
    #[serde(default)]
    pub status: Option<SuggestionStatus>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Request body for the batch status update.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchStatusRequest {
    pub items: Vec<BatchStatusItem>,
}

/// Single (id, status) pair in a batch status update.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchStatusItem {
    pub id: String,
    pub status: SuggestionStatus,
}
