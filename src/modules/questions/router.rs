use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::middleware::role::require_interviewer;
use crate::state::AppState;

use super::controller::{create_question, get_question, list_questions};

pub fn init_questions_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(list_questions).merge(
                post(create_question)
                    .route_layer(middleware::from_fn_with_state(state, require_interviewer)),
            ),
        )
        .route("/{id}", get(get_question))
}
