//! Client-side core of the bulk status-update flow.
//!
//! A bulk update is planned as a pure computation, applied optimistically to
//! the in-view rows, then reconciled against the authoritative records once
//! the store confirms — or rolled back if it doesn't. The projection is an
//! explicit state machine rather than incidental callback ordering.

use std::collections::HashMap;

use serde::Serialize;

use crate::models::{BatchStatusItem, Suggestion, SuggestionStatus};

/// One planned record change: status plus the timestamps the optimistic
/// view should show. `date_completed` is None when the pre-mutation value
/// must be left untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusUpdate {
    pub id: String,
    pub status: SuggestionStatus,
    pub date_updated: String,
    pub date_completed: Option<String>,
}

impl StatusUpdate {
    /// Wire form for the batch mutation request.
    pub fn to_item(&self) -> BatchStatusItem {
        BatchStatusItem {
            id: self.id.clone(),
            status: self.status,
        }
    }
}

/// Plan a bulk status update for the selected ids.
///
/// Empty selection yields an empty plan; callers must then skip the store
/// round trip entirely (the interaction layer surfaces this as a disabled
/// control). The completion timestamp is stamped only when the target
/// status is COMPLETED.
pub fn plan_bulk_status(
    selected_ids: &[String],
    target_status: SuggestionStatus,
    now: &str,
) -> Vec<StatusUpdate> {
    selected_ids
        .iter()
        .map(|id| StatusUpdate {
            id: id.clone(),
            status: target_status,
            date_updated: now.to_string(),
            date_completed: if target_status == SuggestionStatus::Completed {
                Some(now.to_string())
            } else {
                None
            },
        })
        .collect()
}

/// Projection lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectionState {
    Idle,
    Optimistic,
    Reconciled,
    RolledBack,
}

/// A projection method was called in the wrong state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectionStateError {
    pub expected: ProjectionState,
    pub actual: ProjectionState,
}

impl std::fmt::Display for ProjectionStateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "projection in state {:?}, expected {:?}",
            self.actual, self.expected
        )
    }
}

impl std::error::Error for ProjectionStateError {}

/// Optimistic projection over the in-view records.
///
/// Lifecycle: Idle → (apply) → Optimistic → (confirm) → Reconciled
///                                        → (rollback) → RolledBack.
/// `apply` snapshots the pre-mutation records so `rollback` can restore
/// them exactly; `confirm` overwrites the tentative values with the
/// authoritative ones — the store's answer always wins, even when it
/// differs from what was requested.
#[derive(Debug, Default)]
pub struct OptimisticProjection {
    originals: Vec<Suggestion>,
    state: Option<ProjectionStateInner>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ProjectionStateInner {
    Optimistic,
    Reconciled,
    RolledBack,
}

impl OptimisticProjection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> ProjectionState {
        match self.state {
            None => ProjectionState::Idle,
            Some(ProjectionStateInner::Optimistic) => ProjectionState::Optimistic,
            Some(ProjectionStateInner::Reconciled) => ProjectionState::Reconciled,
            Some(ProjectionStateInner::RolledBack) => ProjectionState::RolledBack,
        }
    }

    /// Apply a plan tentatively to the in-view rows. Ids missing from the
    /// view are tolerated and skipped.
    pub fn apply(
        &mut self,
        view: &mut [Suggestion],
        updates: &[StatusUpdate],
    ) -> Result<(), ProjectionStateError> {
        if self.state.is_some() {
            return Err(ProjectionStateError {
                expected: ProjectionState::Idle,
                actual: self.state(),
            });
        }

        let by_id: HashMap<&str, &StatusUpdate> =
            updates.iter().map(|u| (u.id.as_str(), u)).collect();

        for row in view.iter_mut() {
            if let Some(update) = by_id.get(row.id.as_str()) {
                self.originals.push(row.clone());
                row.status = update.status;
                row.date_updated = update.date_updated.clone();
                if let Some(completed) = &update.date_completed {
                    row.date_completed = Some(completed.clone());
                }
            }
        }

        self.state = Some(ProjectionStateInner::Optimistic);
        Ok(())
    }

    /// Reconcile with the authoritative records returned by the store.
    pub fn confirm(
        &mut self,
        view: &mut [Suggestion],
        authoritative: &[Suggestion],
    ) -> Result<(), ProjectionStateError> {
        self.expect_optimistic()?;

        for record in authoritative {
            if let Some(row) = view.iter_mut().find(|row| row.id == record.id) {
                *row = record.clone();
            }
        }

        self.originals.clear();
        self.state = Some(ProjectionStateInner::Reconciled);
        Ok(())
    }

    /// Restore the snapshotted pre-mutation records after a store failure.
    pub fn rollback(&mut self, view: &mut [Suggestion]) -> Result<(), ProjectionStateError> {
        self.expect_optimistic()?;

        for original in self.originals.drain(..) {
            if let Some(row) = view.iter_mut().find(|row| row.id == original.id) {
                *row = original;
            }
        }

        self.state = Some(ProjectionStateInner::RolledBack);
        Ok(())
    }

    fn expect_optimistic(&self) -> Result<(), ProjectionStateError> {
        if self.state != Some(ProjectionStateInner::Optimistic) {
            return Err(ProjectionStateError {
                expected: ProjectionState::Optimistic,
                actual: self.state(),
            });
        }
        Ok(())
    }
}

/// Severity of a user-facing notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    Error,
    Info,
    Warning,
}

/// A user-facing notification event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub message: String,
    pub severity: Severity,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            severity: Severity::Success,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            severity: Severity::Error,
        }
    }

    /// Confirmation emitted after a successful bulk update. Wording is
    /// singular for exactly one record, plural otherwise.
    pub fn bulk_update_success(count: usize) -> Self {
        let noun = if count == 1 {
            "suggestion"
        } else {
            "suggestions"
        };
        Self::success(format!("Successfully updated {} {}", count, noun))
    }
}
