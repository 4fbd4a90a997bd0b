//! Filter evaluation for the suggestions list.
//!
//! A filter specification is a set of optional predicates that are ANDed
//! together; an unspecified field imposes no constraint. The evaluator is a
//! pure function so re-filtering on every keystroke stays predictable.

use std::collections::HashMap;

use serde::Deserialize;

use crate::models::{Category, Employee, Priority, RiskLevel, Suggestion, SuggestionStatus};

/// Optional predicates narrowing the visible suggestion list.
///
/// Doubles as the query-parameter struct for GET /api/suggestions, so field
/// names follow the frontend's camelCase variables.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterSpec {
    #[serde(default)]
    pub q: Option<String>,
    #[serde(default)]
    pub status: Option<SuggestionStatus>,
    #[serde(default)]
    pub category: Option<Category>,
    #[serde(default)]
    pub priority: Option<Priority>,
    #[serde(default)]
    pub employee_id: Option<String>,
    #[serde(default)]
    pub risk_level: Option<RiskLevel>,
}

impl FilterSpec {
    /// Trim the free-text query, dropping it entirely when only whitespace
    /// remains. The evaluator itself never trims; this is the caller-side
    /// normalization applied by the HTTP handler.
    pub fn normalized(mut self) -> Self {
        self.q = self.q.and_then(|q| {
            let trimmed = q.trim().to_string();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed)
            }
        });
        self
    }
}

/// Decide whether a suggestion matches a filter specification.
///
/// The risk-level predicate resolves the suggestion's employee through the
/// lookup map; a suggestion whose employee cannot be resolved never matches
/// a risk-level filter. The free-text query is a case-insensitive substring
/// test against description, employee name, priority, status, category, and
/// source; a zero-length or absent query imposes no constraint, and the
/// query is compared as given (trimming is the caller's responsibility).
pub fn matches(
    suggestion: &Suggestion,
    employees: &HashMap<String, Employee>,
    spec: &FilterSpec,
) -> bool {
    if let Some(status) = spec.status {
        if suggestion.status != status {
            return false;
        }
    }

    if let Some(category) = spec.category {
        if suggestion.category != category {
            return false;
        }
    }

    if let Some(priority) = spec.priority {
        if suggestion.priority != priority {
            return false;
        }
    }

    if let Some(employee_id) = &spec.employee_id {
        if &suggestion.employee_id != employee_id {
            return false;
        }
    }

    if let Some(risk_level) = spec.risk_level {
        match employees.get(&suggestion.employee_id) {
            Some(employee) if employee.risk_level == Some(risk_level) => {}
            _ => return false,
        }
    }

    if let Some(q) = spec.q.as_deref().filter(|q| !q.is_empty()) {
        let needle = q.to_lowercase();
        let haystacks = [
            suggestion.description.as_str(),
            suggestion.employee_name.as_str(),
            suggestion.priority.as_str(),
            suggestion.status.as_str(),
            suggestion.category.as_str(),
            suggestion.source.as_str(),
        ];
        if !haystacks
            .iter()
            .any(|field| field.to_lowercase().contains(&needle))
        {
            return false;
        }
    }

    true
}
