//! Integration tests for the board backend.

use std::sync::Arc;

use reqwest::Client;
use serde_json::{json, Value};
use tempfile::TempDir;

use crate::board::{plan_bulk_status, Notification, OptimisticProjection, ProjectionState};
use crate::config::Config;
use crate::db::{init_database, Repository};
use crate::models::{Employee, RiskLevel, Suggestion};
use crate::selection::Selection;
use crate::{create_router, AppState};

/// Test fixture for integration tests.
struct TestFixture {
    client: Client,
    base_url: String,
    repo: Arc<Repository>,
    _temp_dir: TempDir,
}

impl TestFixture {
    async fn new() -> Self {
        Self::with_psk(Some("test-api-key".to_string())).await
    }

    async fn with_psk(psk: Option<String>) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let db_path = temp_dir.path().join("test.sqlite");

        // Initialize database
        let pool = init_database(&db_path).await.expect("Failed to init DB");
        let repo = Arc::new(Repository::new(pool));

        // Create config
        let config = Config {
            api_psk: psk.clone(),
            db_path,
            seed_path: None,
            bind_addr: "127.0.0.1:0".parse().unwrap(),
            log_level: "warn".to_string(),
        };

        let state = AppState {
            repo: repo.clone(),
            config: Arc::new(config),
        };

        let app = create_router(state);

        // Bind to random port
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind");
        let addr = listener.local_addr().expect("Failed to get addr");
        let base_url = format!("http://{}", addr);

        // Spawn server
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        // Wait for server to start
        tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;

        let mut client_builder = Client::builder();
        if let Some(key) = psk {
            let mut headers = reqwest::header::HeaderMap::new();
            headers.insert("x-api-key", key.parse().unwrap());
            client_builder = client_builder.default_headers(headers);
        }

        TestFixture {
            client: client_builder.build().unwrap(),
            base_url,
            repo,
            _temp_dir: temp_dir,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Insert the standard employee roster directly through the repository.
    async fn seed_employees(&self) {
        let employees = vec![
            employee("emp-1", "Fatima Al-Rashid", Some(RiskLevel::High)),
            employee("emp-2", "Marcus Webb", Some(RiskLevel::Low)),
            employee("emp-3", "Priya Nair", None),
        ];
        self.repo
            .import_seed(&employees, &[])
            .await
            .expect("Failed to seed employees");
    }

    /// Create a suggestion through the API and return its id.
    async fn create_suggestion(&self, employee_id: &str, description: &str) -> String {
        let resp = self
            .client
            .post(self.url("/api/suggestions"))
            .json(&json!({
                "employeeId": employee_id,
                "category": "EXERCISE",
                "description": description
            }))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 200);
        let body: Value = resp.json().await.unwrap();
        body["data"]["id"].as_str().unwrap().to_string()
    }
}

fn employee(id: &str, name: &str, risk_level: Option<RiskLevel>) -> Employee {
    Employee {
        id: id.to_string(),
        name: name.to_string(),
        department: None,
        risk_level,
    }
}

#[tokio::test]
async fn test_health_check() {
    let fixture = TestFixture::new().await;

    let resp = fixture
        .client
        .get(fixture.url("/health"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(resp.text().await.unwrap(), "OK");
}

#[tokio::test]
async fn test_auth_missing_psk() {
    let fixture = TestFixture::new().await;

    // Fresh client without the default x-api-key header
    let client = Client::new();
    let resp = client
        .get(fixture.url("/api/datastore"))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 401);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn test_auth_invalid_psk() {
    let fixture = TestFixture::new().await;

    let client = Client::new();
    let resp = client
        .get(fixture.url("/api/datastore"))
        .header("x-api-key", "wrong-key")
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 401);
}

#[tokio::test]
async fn test_auth_valid_psk() {
    let fixture = TestFixture::new().await;

    let resp = fixture
        .client
        .get(fixture.url("/api/datastore"))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["success"], true);
}

#[tokio::test]
async fn test_datastore_get() {
    let fixture = TestFixture::new().await;

    let resp = fixture
        .client
        .get(fixture.url("/api/datastore"))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["success"], true);
    assert!(body["data"]["schemaVersion"].is_number());
    assert!(body["data"]["revisionId"].is_number());
    assert!(body["data"]["employees"].is_array());
    assert!(body["data"]["suggestions"].is_array());
    assert!(body["revisionId"].is_number());
}

#[tokio::test]
async fn test_employee_endpoints() {
    let fixture = TestFixture::new().await;
    fixture.seed_employees().await;

    let list_resp = fixture
        .client
        .get(fixture.url("/api/employees"))
        .send()
        .await
        .unwrap();
    assert_eq!(list_resp.status(), 200);
    let list_body: Value = list_resp.json().await.unwrap();
    assert_eq!(list_body["data"].as_array().unwrap().len(), 3);

    let get_resp = fixture
        .client
        .get(fixture.url("/api/employees/emp-1"))
        .send()
        .await
        .unwrap();
    assert_eq!(get_resp.status(), 200);
    let get_body: Value = get_resp.json().await.unwrap();
    assert_eq!(get_body["data"]["name"], "Fatima Al-Rashid");
    assert_eq!(get_body["data"]["riskLevel"], "HIGH");

    let missing_resp = fixture
        .client
        .get(fixture.url("/api/employees/emp-99"))
        .send()
        .await
        .unwrap();
    assert_eq!(missing_resp.status(), 404);
    let missing_body: Value = missing_resp.json().await.unwrap();
    assert_eq!(missing_body["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_create_suggestion_defaults() {
    let fixture = TestFixture::new().await;
    fixture.seed_employees().await;

    let resp = fixture
        .client
        .post(fixture.url("/api/suggestions"))
        .json(&json!({
            "employeeId": "emp-2",
            "category": "EQUIPMENT",
            "description": "New recommendation for employee"
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["success"], true);

    let data = &body["data"];
    assert_eq!(data["employeeName"], "Marcus Webb");
    assert_eq!(data["status"], "PENDING");
    assert_eq!(data["source"], "ADMIN");
    assert_eq!(data["priority"], "MEDIUM");
    assert_eq!(data["dateCompleted"], Value::Null);
    assert_eq!(data["dateCreated"], data["dateUpdated"]);
}

#[tokio::test]
async fn test_create_suggestion_unknown_employee() {
    let fixture = TestFixture::new().await;
    fixture.seed_employees().await;

    let resp = fixture
        .client
        .post(fixture.url("/api/suggestions"))
        .json(&json!({
            "employeeId": "emp-99",
            "category": "EXERCISE",
            "description": "New recommendation for employee"
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 404);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"]["code"], "NOT_FOUND");

    // No record was created
    let list_resp = fixture
        .client
        .get(fixture.url("/api/suggestions"))
        .send()
        .await
        .unwrap();
    let list_body: Value = list_resp.json().await.unwrap();
    assert_eq!(list_body["data"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_create_suggestion_description_bounds() {
    let fixture = TestFixture::new().await;
    fixture.seed_employees().await;

    // Too short
    let resp = fixture
        .client
        .post(fixture.url("/api/suggestions"))
        .json(&json!({
            "employeeId": "emp-1",
            "category": "EXERCISE",
            "description": "Stretch"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");

    // Whitespace only
    let resp2 = fixture
        .client
        .post(fixture.url("/api/suggestions"))
        .json(&json!({
            "employeeId": "emp-1",
            "category": "EXERCISE",
            "description": "          "
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp2.status(), 400);

    // Too long
    let resp3 = fixture
        .client
        .post(fixture.url("/api/suggestions"))
        .json(&json!({
            "employeeId": "emp-1",
            "category": "EXERCISE",
            "description": "x".repeat(501)
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp3.status(), 400);
}

#[tokio::test]
async fn test_update_suggestion_completion_stamping() {
    let fixture = TestFixture::new().await;
    fixture.seed_employees().await;
    let id = fixture
        .create_suggestion("emp-1", "Take regular stretch breaks at the desk")
        .await;

    // Complete the suggestion
    let complete_resp = fixture
        .client
        .put(fixture.url(&format!("/api/suggestions/{}", id)))
        .json(&json!({ "status": "COMPLETED" }))
        .send()
        .await
        .unwrap();
    assert_eq!(complete_resp.status(), 200);
    let complete_body: Value = complete_resp.json().await.unwrap();
    let completed_at = complete_body["data"]["dateCompleted"]
        .as_str()
        .unwrap()
        .to_string();
    assert_eq!(
        complete_body["data"]["dateCompleted"],
        complete_body["data"]["dateUpdated"]
    );

    // Reopen it: dateCompleted must survive untouched
    let reopen_resp = fixture
        .client
        .put(fixture.url(&format!("/api/suggestions/{}", id)))
        .json(&json!({ "status": "IN_PROGRESS" }))
        .send()
        .await
        .unwrap();
    assert_eq!(reopen_resp.status(), 200);
    let reopen_body: Value = reopen_resp.json().await.unwrap();
    assert_eq!(reopen_body["data"]["status"], "IN_PROGRESS");
    assert_eq!(reopen_body["data"]["dateCompleted"], completed_at.as_str());

    // Re-applying the same non-COMPLETED status still leaves it untouched
    let again_resp = fixture
        .client
        .put(fixture.url(&format!("/api/suggestions/{}", id)))
        .json(&json!({ "status": "IN_PROGRESS" }))
        .send()
        .await
        .unwrap();
    let again_body: Value = again_resp.json().await.unwrap();
    assert_eq!(again_body["data"]["dateCompleted"], completed_at.as_str());
}

#[tokio::test]
async fn test_update_suggestion_redenormalizes_employee_name() {
    let fixture = TestFixture::new().await;
    fixture.seed_employees().await;
    let id = fixture
        .create_suggestion("emp-1", "Take regular stretch breaks at the desk")
        .await;

    let resp = fixture
        .client
        .put(fixture.url(&format!("/api/suggestions/{}", id)))
        .json(&json!({ "employeeId": "emp-3" }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["employeeId"], "emp-3");
    assert_eq!(body["data"]["employeeName"], "Priya Nair");
}

#[tokio::test]
async fn test_update_suggestion_not_found() {
    let fixture = TestFixture::new().await;

    let resp = fixture
        .client
        .put(fixture.url("/api/suggestions/non-existent-id"))
        .json(&json!({ "status": "DISMISSED" }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 404);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_suggestions_filtering() {
    let fixture = TestFixture::new().await;
    fixture.seed_employees().await;

    let first = fixture
        .create_suggestion("emp-1", "Take regular stretch breaks at the desk")
        .await;
    fixture
        .create_suggestion("emp-2", "Provide a standing desk for the workstation")
        .await;

    // Move the first suggestion along so statuses differ
    fixture
        .client
        .put(fixture.url(&format!("/api/suggestions/{}", first)))
        .json(&json!({ "status": "IN_PROGRESS" }))
        .send()
        .await
        .unwrap();

    // No filters: everything comes back, newest first
    let all_resp = fixture
        .client
        .get(fixture.url("/api/suggestions"))
        .send()
        .await
        .unwrap();
    let all_body: Value = all_resp.json().await.unwrap();
    assert_eq!(all_body["data"].as_array().unwrap().len(), 2);

    // Status filter
    let status_resp = fixture
        .client
        .get(fixture.url("/api/suggestions?status=IN_PROGRESS"))
        .send()
        .await
        .unwrap();
    let status_body: Value = status_resp.json().await.unwrap();
    let rows = status_body["data"].as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["id"], first.as_str());

    // Employee filter
    let emp_resp = fixture
        .client
        .get(fixture.url("/api/suggestions?employeeId=emp-2"))
        .send()
        .await
        .unwrap();
    let emp_body: Value = emp_resp.json().await.unwrap();
    assert_eq!(emp_body["data"].as_array().unwrap().len(), 1);

    // Risk-level filter resolves through the employee
    let risk_resp = fixture
        .client
        .get(fixture.url("/api/suggestions?riskLevel=HIGH"))
        .send()
        .await
        .unwrap();
    let risk_body: Value = risk_resp.json().await.unwrap();
    let risk_rows = risk_body["data"].as_array().unwrap();
    assert_eq!(risk_rows.len(), 1);
    assert_eq!(risk_rows[0]["employeeId"], "emp-1");

    // Free-text search is case-insensitive and spans the employee name
    let q_resp = fixture
        .client
        .get(fixture.url("/api/suggestions?q=marcus"))
        .send()
        .await
        .unwrap();
    let q_body: Value = q_resp.json().await.unwrap();
    assert_eq!(q_body["data"].as_array().unwrap().len(), 1);

    // A query hitting the category enum text
    let q2_resp = fixture
        .client
        .get(fixture.url("/api/suggestions?q=Exercise"))
        .send()
        .await
        .unwrap();
    let q2_body: Value = q2_resp.json().await.unwrap();
    assert_eq!(q2_body["data"].as_array().unwrap().len(), 2);

    // Whitespace-only query is normalized away by the handler
    let ws_resp = fixture
        .client
        .get(fixture.url("/api/suggestions?q=%20%20"))
        .send()
        .await
        .unwrap();
    let ws_body: Value = ws_resp.json().await.unwrap();
    assert_eq!(ws_body["data"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_batch_update_status() {
    let fixture = TestFixture::new().await;
    fixture.seed_employees().await;

    let id1 = fixture
        .create_suggestion("emp-1", "Take regular stretch breaks at the desk")
        .await;
    let id2 = fixture
        .create_suggestion("emp-2", "Provide a standing desk for the workstation")
        .await;
    let id3 = fixture
        .create_suggestion("emp-3", "Schedule an ergonomic assessment session")
        .await;

    let revision_before: i64 = {
        let resp = fixture
            .client
            .get(fixture.url("/api/datastore/revision"))
            .send()
            .await
            .unwrap();
        let body: Value = resp.json().await.unwrap();
        body["data"]["revisionId"].as_i64().unwrap()
    };

    let batch_resp = fixture
        .client
        .put(fixture.url("/api/suggestions/batch"))
        .json(&json!({
            "items": [
                { "id": id1, "status": "IN_PROGRESS" },
                { "id": id2, "status": "IN_PROGRESS" }
            ]
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(batch_resp.status(), 200);
    let batch_body: Value = batch_resp.json().await.unwrap();
    assert_eq!(batch_body["success"], true);

    let updated = batch_body["data"].as_array().unwrap();
    assert_eq!(updated.len(), 2);
    for row in updated {
        assert_eq!(row["status"], "IN_PROGRESS");
        assert_eq!(row["dateCompleted"], Value::Null);
    }
    // Both updates share the batch timestamp
    assert_eq!(updated[0]["dateUpdated"], updated[1]["dateUpdated"]);

    // Batch increments the revision exactly once
    let revision_after = batch_body["revisionId"].as_i64().unwrap();
    assert_eq!(revision_after, revision_before + 1);

    // The untargeted suggestion is untouched
    let get3_resp = fixture
        .client
        .get(fixture.url(&format!("/api/suggestions/{}", id3)))
        .send()
        .await
        .unwrap();
    let get3_body: Value = get3_resp.json().await.unwrap();
    assert_eq!(get3_body["data"]["status"], "PENDING");
}

#[tokio::test]
async fn test_batch_update_completed_stamps_completion() {
    let fixture = TestFixture::new().await;
    fixture.seed_employees().await;
    let id = fixture
        .create_suggestion("emp-1", "Take regular stretch breaks at the desk")
        .await;

    let batch_resp = fixture
        .client
        .put(fixture.url("/api/suggestions/batch"))
        .json(&json!({
            "items": [ { "id": id, "status": "COMPLETED" } ]
        }))
        .send()
        .await
        .unwrap();

    let batch_body: Value = batch_resp.json().await.unwrap();
    let row = &batch_body["data"][0];
    assert_eq!(row["status"], "COMPLETED");
    assert_eq!(row["dateCompleted"], row["dateUpdated"]);
}

#[tokio::test]
async fn test_batch_update_is_atomic() {
    let fixture = TestFixture::new().await;
    fixture.seed_employees().await;
    let id = fixture
        .create_suggestion("emp-1", "Take regular stretch breaks at the desk")
        .await;

    let batch_resp = fixture
        .client
        .put(fixture.url("/api/suggestions/batch"))
        .json(&json!({
            "items": [
                { "id": id, "status": "DISMISSED" },
                { "id": "sug-missing", "status": "DISMISSED" }
            ]
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(batch_resp.status(), 404);
    let batch_body: Value = batch_resp.json().await.unwrap();
    assert_eq!(batch_body["error"]["code"], "NOT_FOUND");

    // The known suggestion was not updated either
    let get_resp = fixture
        .client
        .get(fixture.url(&format!("/api/suggestions/{}", id)))
        .send()
        .await
        .unwrap();
    let get_body: Value = get_resp.json().await.unwrap();
    assert_eq!(get_body["data"]["status"], "PENDING");
}

#[tokio::test]
async fn test_batch_update_empty_items() {
    let fixture = TestFixture::new().await;

    let resp = fixture
        .client
        .put(fixture.url("/api/suggestions/batch"))
        .json(&json!({ "items": [] }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_revision_increments_on_writes() {
    let fixture = TestFixture::new().await;
    fixture.seed_employees().await;

    let initial_resp = fixture
        .client
        .get(fixture.url("/api/datastore/revision"))
        .send()
        .await
        .unwrap();
    let initial_body: Value = initial_resp.json().await.unwrap();
    let initial_revision = initial_body["data"]["revisionId"].as_i64().unwrap();

    // Create
    let create_resp = fixture
        .client
        .post(fixture.url("/api/suggestions"))
        .json(&json!({
            "employeeId": "emp-1",
            "category": "LIFESTYLE",
            "description": "Encourage a short walk during lunch breaks"
        }))
        .send()
        .await
        .unwrap();
    let create_body: Value = create_resp.json().await.unwrap();
    let after_create = create_body["revisionId"].as_i64().unwrap();
    assert_eq!(after_create, initial_revision + 1);

    let id = create_body["data"]["id"].as_str().unwrap();

    // Update
    let update_resp = fixture
        .client
        .put(fixture.url(&format!("/api/suggestions/{}", id)))
        .json(&json!({ "priority": "HIGH" }))
        .send()
        .await
        .unwrap();
    let update_body: Value = update_resp.json().await.unwrap();
    let after_update = update_body["revisionId"].as_i64().unwrap();
    assert_eq!(after_update, initial_revision + 2);
}

#[tokio::test]
async fn test_not_found_errors() {
    let fixture = TestFixture::new().await;

    let resp = fixture
        .client
        .get(fixture.url("/api/suggestions/non-existent-id"))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 404);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

/// The full client flow behind the bulk-update dialog: select rows, plan
/// the update, project it optimistically, persist, reconcile, notify.
#[tokio::test]
async fn test_bulk_flow_select_plan_project_reconcile() {
    let fixture = TestFixture::new().await;
    fixture.seed_employees().await;

    fixture
        .create_suggestion("emp-1", "Take regular stretch breaks at the desk")
        .await;
    fixture
        .create_suggestion("emp-2", "Provide a standing desk for the workstation")
        .await;
    fixture
        .create_suggestion("emp-3", "Schedule an ergonomic assessment session")
        .await;

    // Fetch the current view
    let list_resp = fixture
        .client
        .get(fixture.url("/api/suggestions"))
        .send()
        .await
        .unwrap();
    let list_body: Value = list_resp.json().await.unwrap();
    let mut view: Vec<Suggestion> = serde_json::from_value(list_body["data"].clone()).unwrap();
    let all_ids: Vec<String> = view.iter().map(|s| s.id.clone()).collect();

    // Select all, then deselect one row
    let mut selection = Selection::new();
    selection.select_all();
    selection.toggle(&all_ids[2]);
    let summary = selection.summary(&all_ids);
    assert_eq!(summary.count, 2);

    // Plan and project optimistically
    let now = chrono::Utc::now().to_rfc3339();
    let plan = plan_bulk_status(&summary.ids, crate::models::SuggestionStatus::InProgress, &now);
    assert_eq!(plan.len(), 2);

    let mut projection = OptimisticProjection::new();
    projection.apply(&mut view, &plan).unwrap();
    let optimistic_count = view
        .iter()
        .filter(|s| s.status == crate::models::SuggestionStatus::InProgress)
        .count();
    assert_eq!(optimistic_count, 2);

    // Persist through the batch endpoint
    let items: Vec<Value> = plan
        .iter()
        .map(|u| {
            let item = u.to_item();
            json!({ "id": item.id, "status": item.status })
        })
        .collect();
    let batch_resp = fixture
        .client
        .put(fixture.url("/api/suggestions/batch"))
        .json(&json!({ "items": items }))
        .send()
        .await
        .unwrap();
    assert_eq!(batch_resp.status(), 200);
    let batch_body: Value = batch_resp.json().await.unwrap();
    let authoritative: Vec<Suggestion> =
        serde_json::from_value(batch_body["data"].clone()).unwrap();

    // Reconcile: the store's timestamps replace the optimistic guesses
    projection.confirm(&mut view, &authoritative).unwrap();
    assert_eq!(projection.state(), ProjectionState::Reconciled);
    for record in &authoritative {
        let row = view.iter().find(|s| s.id == record.id).unwrap();
        assert_eq!(row.date_updated, record.date_updated);
    }

    // Selection clears and the confirmation is emitted
    selection.clear();
    assert!(selection.is_empty(all_ids.len()));
    let notification = Notification::bulk_update_success(authoritative.len());
    assert_eq!(notification.message, "Successfully updated 2 suggestions");
}

/// A failed batch rolls the optimistic projection back and leaves the view
/// exactly as it was.
#[tokio::test]
async fn test_bulk_flow_rollback_on_store_failure() {
    let fixture = TestFixture::new().await;
    fixture.seed_employees().await;

    fixture
        .create_suggestion("emp-1", "Take regular stretch breaks at the desk")
        .await;

    let list_resp = fixture
        .client
        .get(fixture.url("/api/suggestions"))
        .send()
        .await
        .unwrap();
    let list_body: Value = list_resp.json().await.unwrap();
    let mut view: Vec<Suggestion> = serde_json::from_value(list_body["data"].clone()).unwrap();
    let before = view.clone();

    // Target the real row plus one that no longer exists
    let selected = vec![view[0].id.clone(), "sug-stale".to_string()];
    let now = chrono::Utc::now().to_rfc3339();
    let plan = plan_bulk_status(&selected, crate::models::SuggestionStatus::Completed, &now);

    let mut projection = OptimisticProjection::new();
    projection.apply(&mut view, &plan).unwrap();
    assert_eq!(view[0].status, crate::models::SuggestionStatus::Completed);

    let items: Vec<Value> = plan
        .iter()
        .map(|u| json!({ "id": u.id, "status": u.status }))
        .collect();
    let batch_resp = fixture
        .client
        .put(fixture.url("/api/suggestions/batch"))
        .json(&json!({ "items": items }))
        .send()
        .await
        .unwrap();
    assert_eq!(batch_resp.status(), 404);

    // Roll back the tentative view and verify nothing was persisted
    projection.rollback(&mut view).unwrap();
    assert_eq!(projection.state(), ProjectionState::RolledBack);
    assert_eq!(view[0].status, before[0].status);
    assert_eq!(view[0].date_updated, before[0].date_updated);

    let recheck_resp = fixture
        .client
        .get(fixture.url(&format!("/api/suggestions/{}", view[0].id)))
        .send()
        .await
        .unwrap();
    let recheck_body: Value = recheck_resp.json().await.unwrap();
    assert_eq!(recheck_body["data"]["status"], "PENDING");
    assert_eq!(recheck_body["data"]["dateCompleted"], Value::Null);
}
