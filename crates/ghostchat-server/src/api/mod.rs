pub mod chat;
pub mod health;
pub mod response;
pub mod state;

use axum::{
    Router,
    routing::{get, post},
};

pub use response::{ApiError, ErrorResponse};
pub use state::AppState;

/// Routes of the dev API, without middleware.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/chat", post(chat::chat))
        .route("/health", get(health::health))
        .with_state(state)
}
