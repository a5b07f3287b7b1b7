mod lookup;

use std::sync::Arc;

use axum::{
    http::{header, Method, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::Serialize;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use rewind_core::{AppConfig, Environment};
use rewind_pipeline::LookupError;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
}

/// Uniform error envelope the front end consumes alongside the success
/// payload. `details` carries internal error text and is populated only in
/// development mode.
#[derive(Debug, Serialize)]
pub struct ApiError {
    #[serde(skip)]
    pub status: StatusCode,
    pub error: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            error: true,
            message: message.into(),
            suggestion: None,
            details: None,
        }
    }

    fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status, Json(self)).into_response()
    }
}

/// Map a pipeline failure to the external response contract.
///
/// User-facing messages stay localized and sanitized; the raw error text is
/// attached as `details` only in development mode, and upstream statuses go
/// to the logs, never to production clients.
pub(super) fn map_lookup_error(env: Environment, error: &LookupError) -> ApiError {
    let api_error = match error {
        LookupError::MissingHandle => {
            ApiError::new(StatusCode::BAD_REQUEST, "Username is required")
        }
        LookupError::AccountNotFound(handle) => ApiError::new(
            StatusCode::NOT_FOUND,
            format!("User @{handle} tidak ditemukan di X!"),
        ),
        LookupError::NoMatchingContent => ApiError::new(
            StatusCode::BAD_REQUEST,
            "Anda belum pernah posting tentang GMIC/SEISMIC!",
        )
        .with_suggestion("Buat minimal 1 tweet yang mention: GMIC, SEISMIC, atau @SeismicSys"),
        LookupError::QuotaExceeded => ApiError::new(
            StatusCode::SERVICE_UNAVAILABLE,
            "Insufficient API credits. Please check the provider account.",
        ),
        LookupError::RateLimited => ApiError::new(
            StatusCode::TOO_MANY_REQUESTS,
            "Terlalu banyak permintaan. Coba lagi nanti.",
        )
        .with_suggestion("Tunggu beberapa menit sebelum mencoba lagi"),
        LookupError::UpstreamError { status } => {
            tracing::error!(upstream_status = status, "upstream request failed");
            ApiError::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Terjadi kesalahan saat mengambil data",
            )
        }
        LookupError::AllMirrorsExhausted { attempted } => {
            tracing::error!(attempted, "all mirror endpoints exhausted");
            ApiError::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Terjadi kesalahan saat mengambil data",
            )
            .with_suggestion("Coba lagi dalam beberapa menit")
        }
        LookupError::Http(_)
        | LookupError::Xml(_)
        | LookupError::Deserialize { .. }
        | LookupError::Normalization(_) => {
            tracing::error!(error = %error, "lookup pipeline failed");
            ApiError::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Terjadi kesalahan saat mengambil data",
            )
        }
    };

    if env == Environment::Development {
        let mut api_error = api_error;
        api_error.details = Some(error.to_string());
        api_error
    } else {
        api_error
    }
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/api/lookup", get(lookup::lookup))
        .route("/healthz", get(health))
        .layer(build_cors())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
