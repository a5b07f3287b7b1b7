use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use rewind_pipeline::{run_lookup, LookupPayload};

use super::{map_lookup_error, ApiError, AppState};

#[derive(Debug, Deserialize)]
pub(super) struct LookupQuery {
    handle: Option<String>,
}

/// `GET /api/lookup?handle=<string>`.
///
/// A missing or blank `handle` is rejected before any upstream call; every
/// other failure comes out of the pipeline already typed and is mapped to
/// the response contract in one place.
pub(super) async fn lookup(
    State(state): State<AppState>,
    Query(query): Query<LookupQuery>,
) -> Result<Json<LookupPayload>, ApiError> {
    let handle = query.handle.unwrap_or_default();
    tracing::info!(handle = %handle, "lookup requested");

    run_lookup(&state.config, &handle)
        .await
        .map(Json)
        .map_err(|e| map_lookup_error(state.config.env, &e))
}
