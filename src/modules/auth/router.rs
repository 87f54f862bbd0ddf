use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::middleware::role::require_authenticated;
use crate::state::AppState;

use super::controller::{login_user, me, register_user};

pub fn init_auth_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/me",
            get(me).route_layer(middleware::from_fn_with_state(state, require_authenticated)),
        )
        .route("/register", post(register_user))
        .route("/login", post(login_user))
}
