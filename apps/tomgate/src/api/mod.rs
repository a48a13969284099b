//! # tomgate HTTP API Module
//!
//! A stateless evaluation API over the phase engine, built on axum.
//!
//! ## Endpoints
//!
//! - `GET /health` - Health check
//! - `GET /config` - Effective configuration
//! - `GET /phases` - Effective phases in order
//! - `GET /hash` - Checksum and BLAKE3 hash of the effective configuration
//! - `POST /derive` - Derive a phase from signals
//! - `POST /readiness` - Readiness of an item in its phase
//! - `POST /transition` - Transition info for a proposed change
//! - `POST /summary` - Phase counts for a list of items
//!
//! Every route except `/health` accepts `?preset=<key>` to evaluate against a
//! preset other than the configured one.
//!
//! ## Security Configuration (Environment Variables)
//!
//! - `TOMGATE_CORS_ORIGINS`: Comma-separated list of allowed origins, or "*" for all (default: localhost only)
//! - `TOMGATE_RATE_LIMIT`: Requests per second (default: 100, 0 to disable)
//! - `TOMGATE_API_KEY`: If set, requires Bearer token authentication

mod auth;
mod handlers;
mod middleware;
mod types;

pub use auth::{API_KEY_ENV, get_api_key_from_env};
pub use middleware::{RATE_LIMIT_ENV, create_rate_limiter, get_rate_limit_from_env};
pub use types::{
    DeriveRequest, HashResponse, HealthResponse, PhasesResponse, PresetQuery, ReadinessRequest,
    ReadinessResponse, SummaryRequest, SummaryResponse, TransitionRequest, TransitionResponse,
};

use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method, header},
    middleware as axum_middleware,
    routing::{get, post},
};
use std::sync::Arc;
use tomgate_core::{TomConfig, TomError, merge_preset_profile, resolver::with_active_preset};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Environment variable holding the allowed CORS origins.
pub const CORS_ORIGINS_ENV: &str = "TOMGATE_CORS_ORIGINS";

/// Maximum request body size (16 MB). Summary requests carry whole portfolios.
const MAX_BODY_BYTES: usize = 16 * 1024 * 1024;

// =============================================================================
// SERVER STATE
// =============================================================================

/// Shared server state: the loaded base configuration, read-only.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<TomConfig>,
}

impl AppState {
    #[must_use]
    pub fn new(config: TomConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    /// Effective configuration for `preset`, or for the configured preset.
    #[must_use]
    pub fn effective(&self, preset: Option<&str>) -> TomConfig {
        match preset.filter(|p| !p.is_empty()) {
            Some(preset) => merge_preset_profile(&with_active_preset(&self.config, preset)),
            None => merge_preset_profile(&self.config),
        }
    }
}

// =============================================================================
// CORS CONFIGURATION
// =============================================================================

/// Build CORS layer from `TOMGATE_CORS_ORIGINS`.
///
/// - `*`: allows all origins (development only)
/// - unset: localhost only
/// - otherwise: comma-separated list of allowed origins
fn build_cors_layer() -> CorsLayer {
    let origins_env = std::env::var(CORS_ORIGINS_ENV).ok();

    match origins_env.as_deref() {
        Some("*") => {
            tracing::warn!(
                "CORS: Allowing ALL origins ({}=*). This is insecure for production!",
                CORS_ORIGINS_ENV
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
                    "CORS: No valid origins in {}, defaulting to localhost only",
                    CORS_ORIGINS_ENV
                );
                build_localhost_cors()
            } else {
                CorsLayer::new()
                    .allow_origin(allowed_origins)
                    .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
                    .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
            }
        }
        None => {
            tracing::info!(
                "CORS: No {} set, defaulting to localhost only",
                CORS_ORIGINS_ENV
            );
            build_localhost_cors()
        }
    }
}

/// Restrictive CORS layer allowing only localhost origins.
fn build_localhost_cors() -> CorsLayer {
    let origins: Vec<HeaderValue> = [
        "http://localhost:3000",
        "http://localhost:8080",
        "http://127.0.0.1:3000",
        "http://127.0.0.1:8080",
    ]
    .into_iter()
    .filter_map(|o| o.parse::<HeaderValue>().ok())
    .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}

// =============================================================================
// ROUTER CREATION
// =============================================================================

/// Create the axum router with all endpoints and middleware.
///
/// Middleware stack (outer to inner):
/// 1. Tracing - logs all requests
/// 2. CORS - handles preflight requests
/// 3. Body limit
/// 4. Rate Limiting (if enabled)
/// 5. Authentication (if configured)
pub fn create_router(state: AppState) -> Router {
    let rate_limit = get_rate_limit_from_env();
    let rate_limiter = if rate_limit > 0 {
        tracing::info!("Rate limiting enabled: {} requests/second", rate_limit);
        Some(create_rate_limiter(rate_limit))
    } else {
        tracing::info!("Rate limiting disabled");
        None
    };

    let has_auth = get_api_key_from_env().is_some();
    if has_auth {
        tracing::info!("API key authentication enabled");
    } else {
        tracing::warn!(
            "API key authentication DISABLED - all endpoints are publicly accessible! \
             Set {} to enable authentication.",
            API_KEY_ENV
        );
    }

    let mut router = Router::new()
        .route("/health", get(handlers::health_handler))
        .route("/config", get(handlers::config_handler))
        .route("/phases", get(handlers::phases_handler))
        .route("/hash", get(handlers::hash_handler))
        .route("/derive", post(handlers::derive_handler))
        .route("/readiness", post(handlers::readiness_handler))
        .route("/transition", post(handlers::transition_handler))
        .route("/summary", post(handlers::summary_handler));

    if has_auth {
        router = router.layer(axum_middleware::from_fn(auth::api_key_auth_middleware));
    }

    if let Some(limiter) = rate_limiter {
        router = router.layer(axum_middleware::from_fn_with_state(
            limiter,
            middleware::rate_limit_middleware,
        ));
    }

    router
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(build_cors_layer())
                .layer(DefaultBodyLimit::max(MAX_BODY_BYTES)),
        )
        .with_state(state)
}

// =============================================================================
// SERVER STARTUP
// =============================================================================

/// Start the HTTP server.
pub async fn run_server(addr: &str, config: TomConfig) -> Result<(), TomError> {
    let router = create_router(AppState::new(config));

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| TomError::IoError(format!("Bind failed: {}", e)))?;

    tracing::info!("tomgate HTTP server listening on {}", addr);

    axum::serve(listener, router)
        .await
        .map_err(|e| TomError::IoError(format!("Server error: {}", e)))
}

// =============================================================================
// TESTS
// =============================================================================
