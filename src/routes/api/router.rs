use std::sync::Arc;

use axum::Router;

use crate::state::AppState;

use super::{tickets, users};

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(tickets::router(state.clone()))
        .merge(users::router(state))
}
