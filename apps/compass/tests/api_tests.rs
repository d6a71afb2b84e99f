//! Integration tests for the Compass HTTP surface.
//!
//! Uses axum-test to drive the three-page flow without starting a real
//! server. The row sink is injected, so these tests observe exactly what
//! would land in the results sheet.

// Allow unwrap and panic in tests - these are standard for test code
#![allow(clippy::unwrap_used, clippy::panic)]

use axum::http::StatusCode;
use axum_test::TestServer;
use compass::api::{AppState, HealthResponse, IntakeForm, ReportResponse, create_router};
use compass_core::primitives::QUESTION_COUNT;
use compass_core::{CompassError, RowSink, SessionStore, SheetRow};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

// =============================================================================
// TEST SINKS
// =============================================================================

/// Records every appended row for assertions.
#[derive(Default)]
struct RecordingSink {
    rows: Mutex<Vec<SheetRow>>,
}

impl RecordingSink {
    fn rows(&self) -> Vec<SheetRow> {
        self.rows.lock().unwrap().clone()
    }
}

impl RowSink for RecordingSink {
    fn append_row(&self, row: &SheetRow) -> Result<(), CompassError> {
        self.rows.lock().unwrap().push(row.clone());
        Ok(())
    }
}

/// Always fails, simulating an unreachable results sheet.
struct FailingSink;

impl RowSink for FailingSink {
    fn append_row(&self, _row: &SheetRow) -> Result<(), CompassError> {
        Err(CompassError::Persistence("sheet unreachable".to_string()))
    }
}

// =============================================================================
// HELPER FUNCTIONS
// =============================================================================

/// Create a test server with an in-memory session store and the given sink.
fn create_test_server(sink: Arc<dyn RowSink>) -> TestServer {
    let state = AppState::new(SessionStore::in_memory(), sink);
    TestServer::new(create_router(state)).unwrap()
}

/// Start a fresh session and return its page path (`/s/{id}`).
async fn start_session(server: &TestServer) -> String {
    let response = server.get("/").await;
    response.assert_status(StatusCode::SEE_OTHER);
    response
        .headers()
        .get("location")
        .unwrap()
        .to_str()
        .unwrap()
        .to_string()
}

/// Advance a fresh session past intake.
async fn start_questionnaire(server: &TestServer) -> String {
    let path = start_session(server).await;
    let response = server
        .post(&format!("{}/intake", path))
        .form(&IntakeForm {
            name: "Ada".to_string(),
            affiliation: "MIT".to_string(),
        })
        .await;
    response.assert_status(StatusCode::SEE_OTHER);
    path
}

/// A complete questionnaire form with every answer set to `label`.
fn uniform_answers(label: &str) -> BTreeMap<String, String> {
    (1..=QUESTION_COUNT)
        .map(|pos| (format!("q{}", pos), label.to_string()))
        .collect()
}

// =============================================================================
// HEALTH ENDPOINT TESTS
// =============================================================================

#[tokio::test]
async fn test_health_endpoint() {
    let server = create_test_server(Arc::new(RecordingSink::default()));

    let response = server.get("/health").await;

    response.assert_status_ok();
    let health: HealthResponse = response.json();
    assert_eq!(health.status, "ok");
    assert_eq!(health.version, env!("CARGO_PKG_VERSION"));
}

// =============================================================================
// SESSION CREATION TESTS
// =============================================================================

#[tokio::test]
async fn test_root_allocates_a_session() {
    let server = create_test_server(Arc::new(RecordingSink::default()));

    let path = start_session(&server).await;
    assert!(path.starts_with("/s/"));

    let page = server.get(&path).await;
    page.assert_status_ok();
    assert!(page.text().contains("Welcome to the Self-Compassion Test"));
}

#[tokio::test]
async fn test_unknown_session_is_not_found() {
    let server = create_test_server(Arc::new(RecordingSink::default()));

    let page = server.get("/s/no-such-session").await;
    page.assert_status(StatusCode::NOT_FOUND);
    assert!(page.text().contains("Session not found"));
}

// =============================================================================
// INTAKE TESTS
// =============================================================================

#[tokio::test]
async fn test_incomplete_identity_stays_on_page_one() {
    let server = create_test_server(Arc::new(RecordingSink::default()));
    let path = start_session(&server).await;

    let response = server
        .post(&format!("{}/intake", path))
        .form(&IntakeForm {
            name: "Ada".to_string(),
            affiliation: "".to_string(),
        })
        .await;

    response.assert_status_ok();
    assert!(response.text().contains("Please fill in all fields"));
    // The submitted name survives the re-render.
    assert!(response.text().contains(r#"value="Ada""#));

    let page = server.get(&path).await;
    assert!(page.text().contains("Welcome to the Self-Compassion Test"));
}

#[tokio::test]
async fn test_valid_identity_reaches_the_questionnaire() {
    let server = create_test_server(Arc::new(RecordingSink::default()));
    let path = start_questionnaire(&server).await;

    let page = server.get(&path).await;
    page.assert_status_ok();
    let text = page.text();
    assert!(text.contains("Self-Compassion Questionnaire"));
    assert!(text.contains(r#"name="q1""#));
    assert!(text.contains(&format!(r#"name="q{}""#, QUESTION_COUNT)));
}

// =============================================================================
// QUESTIONNAIRE TESTS
// =============================================================================

#[tokio::test]
async fn test_incomplete_answers_stay_on_page_two() {
    let sink = Arc::new(RecordingSink::default());
    let server = create_test_server(sink.clone());
    let path = start_questionnaire(&server).await;

    let mut partial = uniform_answers("Often");
    partial.remove("q7");
    partial.remove("q20");

    let response = server
        .post(&format!("{}/questionnaire", path))
        .form(&partial)
        .await;

    response.assert_status_ok();
    assert!(response.text().contains("2 remaining"));
    // Nothing was persisted to the sheet.
    assert!(sink.rows().is_empty());

    // The partial selections survive on a fresh render.
    let page = server.get(&path).await;
    assert!(page.text().contains(r#"name="q1" value="Often" checked"#));
}

#[tokio::test]
async fn test_tampered_label_is_rejected() {
    let server = create_test_server(Arc::new(RecordingSink::default()));
    let path = start_questionnaire(&server).await;

    let mut answers = uniform_answers("Often");
    answers.insert("q3".to_string(), "Constantly".to_string());

    let response = server
        .post(&format!("{}/questionnaire", path))
        .form(&answers)
        .await;

    response.assert_status_ok();
    assert!(response.text().contains("Unrecognized response"));
}

#[tokio::test]
async fn test_complete_flow_scores_and_persists_once() {
    let sink = Arc::new(RecordingSink::default());
    let server = create_test_server(sink.clone());
    let path = start_questionnaire(&server).await;

    let response = server
        .post(&format!("{}/questionnaire", path))
        .form(&uniform_answers("Sometimes"))
        .await;
    response.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(
        response.headers().get("location").unwrap().to_str().unwrap(),
        path
    );

    // The results page shows all three medium cards.
    let page = server.get(&path).await;
    page.assert_status_ok();
    let text = page.text();
    assert!(text.contains("Thank You for Completing the Test!"));
    assert!(text.contains("3.00"));
    assert!(text.contains("Level: Medium"));
    assert!(text.contains("#FCD3DE"));

    // Exactly one raw row reached the sheet.
    let rows = sink.rows();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].name, "Ada");
    assert_eq!(rows[0].affiliation, "MIT");
    assert!(rows[0].labels.iter().all(|l| *l == "Sometimes"));

    // Refreshing the results page never re-appends.
    let _ = server.get(&path).await;
    let _ = server.get(&path).await;
    assert_eq!(sink.rows().len(), 1);
}

#[tokio::test]
async fn test_sink_failure_does_not_block_results() {
    let server = create_test_server(Arc::new(FailingSink));
    let path = start_questionnaire(&server).await;

    let response = server
        .post(&format!("{}/questionnaire", path))
        .form(&uniform_answers("Often"))
        .await;

    // The transition proceeds; the redirect carries the warning flag.
    response.assert_status(StatusCode::SEE_OTHER);
    let location = response
        .headers()
        .get("location")
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert_eq!(location, format!("{}?saved=0", path));

    let page = server.get(&location).await;
    page.assert_status_ok();
    let text = page.text();
    assert!(text.contains("could not be saved"));
    assert!(text.contains("Your Self-Compassion Profile"));
}

// =============================================================================
// RESTART TESTS
// =============================================================================

#[tokio::test]
async fn test_restart_discards_the_session_data() {
    let sink = Arc::new(RecordingSink::default());
    let server = create_test_server(sink.clone());
    let path = start_questionnaire(&server).await;

    server
        .post(&format!("{}/questionnaire", path))
        .form(&uniform_answers("Rarely"))
        .await
        .assert_status(StatusCode::SEE_OTHER);

    let response = server.post(&format!("{}/restart", path)).await;
    response.assert_status(StatusCode::SEE_OTHER);

    let page = server.get(&path).await;
    let text = page.text();
    assert!(text.contains("Welcome to the Self-Compassion Test"));
    assert!(!text.contains("checked"));

    // Restarting does not touch the already-appended row.
    assert_eq!(sink.rows().len(), 1);
}

// =============================================================================
// REPORT ENDPOINT TESTS
// =============================================================================

#[tokio::test]
async fn test_report_endpoint_lifecycle() {
    let server = create_test_server(Arc::new(RecordingSink::default()));
    let path = start_questionnaire(&server).await;
    let id = path.trim_start_matches("/s/").to_string();

    // Before submission: results are not available.
    let early = server.get(&format!("/api/s/{}/report", id)).await;
    early.assert_status(StatusCode::CONFLICT);

    server
        .post(&format!("{}/questionnaire", path))
        .form(&uniform_answers("Sometimes"))
        .await
        .assert_status(StatusCode::SEE_OTHER);

    let response = server.get(&format!("/api/s/{}/report", id)).await;
    response.assert_status_ok();
    let report: ReportResponse = response.json();

    let keys: Vec<&str> = report.sections.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["Section 1", "Section 2", "Section 3"]);
    for section in report.sections.values() {
        assert_eq!(section.average, 3.0);
        assert_eq!(section.level, "Medium");
        assert_eq!(section.color, "Pink");
    }
}

#[tokio::test]
async fn test_report_endpoint_unknown_session() {
    let server = create_test_server(Arc::new(RecordingSink::default()));

    let response = server.get("/api/s/no-such-session/report").await;
    response.assert_status(StatusCode::NOT_FOUND);
}
