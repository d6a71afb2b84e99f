//! # HTTP Endpoint Handlers
//!
//! Page rendering, form posts, and the JSON endpoints.
//!
//! Each handler loads the session named in the path from the store, drives
//! the state machine, and saves the state back. Mutating handlers hold the
//! store's write lock for the whole read-modify-write, so per-session
//! operations are serialized.

use super::{
    AppState,
    render,
    types::{ApiError, HealthResponse, IntakeForm, ReportResponse, sheet_from_form},
};
use axum::{
    Json,
    extract::{Form, Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use compass_core::{CompassError, Page, SessionState};
use std::collections::BTreeMap;
use uuid::Uuid;

// =============================================================================
// RESPONSE HELPERS
// =============================================================================

/// The canonical path for a session's pages.
fn session_path(id: &str) -> String {
    format!("/s/{}", id)
}

/// 404 for unknown session ids.
fn session_not_found() -> Response {
    (StatusCode::NOT_FOUND, Html(render::not_found_page())).into_response()
}

/// 500 for session-store failures. The store error is logged; the page
/// shows a generic message.
fn store_failure(err: &CompassError) -> Response {
    tracing::error!("session store failure: {}", err);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Html(render::error_page(
            "The survey could not be processed. Please try again.",
        )),
    )
        .into_response()
}

// =============================================================================
// HEALTH HANDLER
// =============================================================================

/// Health check endpoint.
pub async fn health_handler() -> impl IntoResponse {
    Json(HealthResponse::default())
}

// =============================================================================
// SESSION CREATION
// =============================================================================

/// `GET /` — allocate a fresh session and redirect to its first page.
pub async fn new_session_handler(State(state): State<AppState>) -> Response {
    let id = Uuid::new_v4().to_string();

    let mut store = state.store.write().await;
    match store.save(&id, &SessionState::new()) {
        Ok(()) => Redirect::to(&session_path(&id)).into_response(),
        Err(e) => store_failure(&e),
    }
}

// =============================================================================
// PAGE RENDERING
// =============================================================================

/// `GET /s/{id}` — render whichever page the session is on.
pub async fn page_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<BTreeMap<String, String>>,
) -> Response {
    let store = state.store.read().await;
    let session = match store.load(&id) {
        Ok(Some(session)) => session,
        Ok(None) => return session_not_found(),
        Err(e) => return store_failure(&e),
    };

    let path = session_path(&id);
    match session.page() {
        Page::Intake => Html(render::intake_page(&path, None, None)).into_response(),
        Page::Questionnaire => {
            Html(render::questionnaire_page(&path, session.answers(), None)).into_response()
        }
        Page::Results => match session.report() {
            Some(report) => {
                // The row is appended on the transition, never on render;
                // the flag only carries the warning across the redirect.
                let saved = params.get("saved").map(|v| v != "0").unwrap_or(true);
                Html(render::results_page(&path, report, saved)).into_response()
            }
            None => store_failure(&CompassError::Validation(
                "results page reached without a report".to_string(),
            )),
        },
    }
}

// =============================================================================
// INTAKE SUBMISSION
// =============================================================================

/// `POST /s/{id}/intake` — the `Intake -> Questionnaire` transition.
pub async fn intake_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(form): Form<IntakeForm>,
) -> Response {
    let mut store = state.store.write().await;
    let mut session = match store.load(&id) {
        Ok(Some(session)) => session,
        Ok(None) => return session_not_found(),
        Err(e) => return store_failure(&e),
    };

    let path = session_path(&id);

    let outcome = form
        .validate_lengths()
        .and_then(|()| session.begin_questionnaire(&form.name, &form.affiliation));

    match outcome {
        Ok(()) => match store.save(&id, &session) {
            Ok(()) => Redirect::to(&path).into_response(),
            Err(e) => store_failure(&e),
        },
        Err(warning) if session.page() == Page::Intake => {
            Html(render::intake_page(&path, Some(&form), Some(&warning.to_string())))
                .into_response()
        }
        // The session has already moved on; show where it actually is.
        Err(_) => Redirect::to(&path).into_response(),
    }
}

// =============================================================================
// QUESTIONNAIRE SUBMISSION
// =============================================================================

/// `POST /s/{id}/questionnaire` — the `Questionnaire -> Results` transition.
///
/// On success the one-shot `Submission` row goes to the sink; a sink failure
/// is logged, reported via the `saved=0` flag, and never blocks the results.
pub async fn questionnaire_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(fields): Form<BTreeMap<String, String>>,
) -> Response {
    let mut store = state.store.write().await;
    let mut session = match store.load(&id) {
        Ok(Some(session)) => session,
        Ok(None) => return session_not_found(),
        Err(e) => return store_failure(&e),
    };

    let path = session_path(&id);

    let sheet = match sheet_from_form(&fields) {
        Ok(sheet) => sheet,
        Err(warning) => {
            return Html(render::questionnaire_page(
                &path,
                session.answers(),
                Some(&warning.to_string()),
            ))
            .into_response();
        }
    };

    match session.submit_questionnaire(sheet) {
        Ok(submission) => {
            // Persist the transition before touching the sink, so a replay
            // of this POST cannot produce a second row.
            if let Err(e) = store.save(&id, &session) {
                return store_failure(&e);
            }
            drop(store);

            match state.sink.append_row(&submission.row) {
                Ok(()) => Redirect::to(&path).into_response(),
                Err(e) => {
                    tracing::warn!("row append failed for session {}: {}", id, e);
                    Redirect::to(&format!("{}?saved=0", path)).into_response()
                }
            }
        }
        Err(warning) if session.page() == Page::Questionnaire => {
            // Keep the partial answers so the re-rendered form retains them.
            if let Err(e) = store.save(&id, &session) {
                tracing::warn!("could not persist partial answers for {}: {}", id, e);
            }
            Html(render::questionnaire_page(
                &path,
                session.answers(),
                Some(&warning.to_string()),
            ))
            .into_response()
        }
        Err(_) => Redirect::to(&path).into_response(),
    }
}

// =============================================================================
// RESTART
// =============================================================================

/// `POST /s/{id}/restart` — the unconditional `Results -> Intake` reset.
pub async fn restart_handler(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let mut store = state.store.write().await;
    let mut session = match store.load(&id) {
        Ok(Some(session)) => session,
        Ok(None) => return session_not_found(),
        Err(e) => return store_failure(&e),
    };

    session.restart();
    match store.save(&id, &session) {
        Ok(()) => Redirect::to(&session_path(&id)).into_response(),
        Err(e) => store_failure(&e),
    }
}

// =============================================================================
// REPORT (JSON)
// =============================================================================

/// `GET /api/s/{id}/report` — the computed section results as JSON.
pub async fn report_handler(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let store = state.store.read().await;
    match store.load(&id) {
        Ok(Some(session)) => match session.report() {
            Some(report) => (StatusCode::OK, Json(ReportResponse::from_report(report)))
                .into_response(),
            None => (
                StatusCode::CONFLICT,
                Json(ApiError::new("Results are not available yet")),
            )
                .into_response(),
        },
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(ApiError::new("Unknown session")),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("session store failure: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiError::new("Session store unavailable")),
            )
                .into_response()
        }
    }
}
