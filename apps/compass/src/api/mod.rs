//! # Compass HTTP Module
//!
//! The axum-served survey: three rendered pages plus a small JSON surface.
//!
//! ## Endpoints
//!
//! - `GET /` - Start a fresh survey session (redirects to its page)
//! - `GET /s/{id}` - Render the session's current page
//! - `POST /s/{id}/intake` - Submit the identity form (page 1 -> 2)
//! - `POST /s/{id}/questionnaire` - Submit the answers (page 2 -> 3)
//! - `POST /s/{id}/restart` - Discard the session's data (page 3 -> 1)
//! - `GET /api/s/{id}/report` - Section results as JSON
//! - `GET /health` - Health check
//!
//! ## Security Configuration (Environment Variables)
//!
//! - `COMPASS_CORS_ORIGINS`: Comma-separated list of allowed origins, or "*" for all (default: localhost only)
//! - `COMPASS_RATE_LIMIT`: Requests per second (default: 100, 0 to disable)

mod handlers;
mod middleware;
mod render;
mod types;

// Re-exports for external use
pub use middleware::{create_rate_limiter, rate_limit_from_env};
// Re-export handlers and types for integration tests (via `compass::api::*`)
#[allow(unused_imports)]
pub use handlers::{
    health_handler, intake_handler, new_session_handler, page_handler, questionnaire_handler,
    report_handler, restart_handler,
};
#[allow(unused_imports)]
pub use types::{ApiError, HealthResponse, IntakeForm, ReportResponse, SectionJson};

use axum::{
    Router,
    http::{HeaderValue, Method, header},
    middleware as axum_middleware,
    routing::{get, post},
};
use compass_core::{CompassError, RowSink, SessionStore};
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

// =============================================================================
// SERVER STATE
// =============================================================================

/// Shared server state: the session store and the injected row sink.
#[derive(Clone)]
pub struct AppState {
    /// Session store, serialized behind a write lock.
    pub store: Arc<RwLock<SessionStore>>,
    /// Append-only log for completed submissions.
    pub sink: Arc<dyn RowSink>,
}

impl AppState {
    /// Create new app state from a store and a sink.
    #[must_use]
    pub fn new(store: SessionStore, sink: Arc<dyn RowSink>) -> Self {
        Self {
            store: Arc::new(RwLock::new(store)),
            sink,
        }
    }
}

// =============================================================================
// CORS CONFIGURATION
// =============================================================================

/// Build CORS layer from environment configuration.
///
/// Reads `COMPASS_CORS_ORIGINS`:
/// - If "*": allows all origins (development mode - use with caution!)
/// - If not set: defaults to localhost only (restrictive default)
/// - Otherwise: parses comma-separated list of allowed origins
fn build_cors_layer() -> CorsLayer {
    let origins_env = std::env::var("COMPASS_CORS_ORIGINS").ok();

    match origins_env.as_deref() {
        Some("*") => {
            tracing::warn!(
                "CORS: Allowing ALL origins (COMPASS_CORS_ORIGINS=*). This is insecure for production!"
            );
            CorsLayer::permissive()
        }
        Some(origins) => {
            let allowed_origins: Vec<HeaderValue> = origins
                .split(',')
                .filter_map(|s| {
                    let trimmed = s.trim();
                    match trimmed.parse::<HeaderValue>() {
                        Ok(hv) => {
                            tracing::info!("CORS: Allowing origin: {}", trimmed);
                            Some(hv)
                        }
                        Err(e) => {
                            tracing::warn!("CORS: Invalid origin '{}': {}", trimmed, e);
                            None
                        }
                    }
                })
                .collect();

            if allowed_origins.is_empty() {
                tracing::warn!(
                    "CORS: No valid origins in COMPASS_CORS_ORIGINS, defaulting to localhost only"
                );
                build_localhost_cors()
            } else {
                CorsLayer::new()
                    .allow_origin(allowed_origins)
                    .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
                    .allow_headers([header::CONTENT_TYPE])
            }
        }
        None => {
            tracing::info!("CORS: No COMPASS_CORS_ORIGINS set, defaulting to localhost only");
            build_localhost_cors()
        }
    }
}

/// Build a restrictive CORS layer that only allows localhost origins.
fn build_localhost_cors() -> CorsLayer {
    let localhost_origins = vec![
        "http://localhost:3000".parse::<HeaderValue>().ok(),
        "http://localhost:8080".parse::<HeaderValue>().ok(),
        "http://127.0.0.1:3000".parse::<HeaderValue>().ok(),
        "http://127.0.0.1:8080".parse::<HeaderValue>().ok(),
    ];
    let origins: Vec<HeaderValue> = localhost_origins.into_iter().flatten().collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
}

// =============================================================================
// ROUTER CREATION
// =============================================================================

/// Create the axum router with all endpoints and middleware.
///
/// Middleware stack (outer to inner):
/// 1. CORS - handles preflight requests
/// 2. Tracing - logs all requests
/// 3. Body limit - form posts are small
/// 4. Rate Limiting - protects the open survey endpoint (if enabled)
pub fn create_router(state: AppState) -> Router {
    let cors = build_cors_layer();

    let rate_limit = rate_limit_from_env();
    let rate_limiter = if rate_limit > 0 {
        tracing::info!("Rate limiting enabled: {} requests/second", rate_limit);
        Some(create_rate_limiter(rate_limit))
    } else {
        tracing::info!("Rate limiting disabled");
        None
    };

    let mut router = Router::new()
        .route("/", get(handlers::new_session_handler))
        .route("/health", get(handlers::health_handler))
        .route("/s/{id}", get(handlers::page_handler))
        .route("/s/{id}/intake", post(handlers::intake_handler))
        .route("/s/{id}/questionnaire", post(handlers::questionnaire_handler))
        .route("/s/{id}/restart", post(handlers::restart_handler))
        .route("/api/s/{id}/report", get(handlers::report_handler));

    // Apply rate limiting middleware
    if let Some(limiter) = rate_limiter {
        router = router.layer(axum_middleware::from_fn_with_state(
            limiter,
            middleware::rate_limit_middleware,
        ));
    }

    // Apply CORS, body limit, and tracing (outermost layers)
    router
        .layer(axum::extract::DefaultBodyLimit::max(64 * 1024))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// =============================================================================
// SERVER STARTUP
// =============================================================================

/// Start the HTTP server.
pub async fn run_server(
    addr: &str,
    store: SessionStore,
    sink: Arc<dyn RowSink>,
) -> Result<(), CompassError> {
    let state = AppState::new(store, sink);
    let router = create_router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| CompassError::Io(format!("Bind failed: {}", e)))?;

    tracing::info!("Compass HTTP server listening on {}", addr);

    axum::serve(listener, router)
        .await
        .map_err(|e| CompassError::Io(format!("Server error: {}", e)))
}
