use std::sync::Arc;

use axum::Router;

use crate::state::AppState;

use super::{docs, tickets};

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(tickets::router(state))
        .merge(docs::router())
}
