use axum::{Router, extract::DefaultBodyLimit, middleware, routing::post};

use crate::middleware::role::require_candidate;
use crate::state::AppState;

use super::controller::submit_answer;

/// Room for the multipart envelope and text parts on top of one recording.
const MULTIPART_OVERHEAD_BYTES: usize = 1024 * 1024;

pub fn init_answers_router(state: AppState) -> Router<AppState> {
    let max_bytes = usize::try_from(state.uploads.max_bytes()).unwrap_or(usize::MAX);
    let body_limit = max_bytes
        .saturating_mul(2)
        .saturating_add(MULTIPART_OVERHEAD_BYTES);

    Router::new().route(
        "/",
        post(submit_answer)
            .layer(DefaultBodyLimit::max(body_limit))
            .route_layer(middleware::from_fn_with_state(state, require_candidate)),
    )
}
