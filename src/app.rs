use crate::handlers;
use crate::state::AppState;
use axum::{
    Router,
    routing::{delete, get},
};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/today", get(handlers::get_today))
        .route("/api/day/:date", get(handlers::get_day))
        .route("/api/history", get(handlers::get_history))
        .route("/api/drinks", get(handlers::list_drinks).post(handlers::add_drink))
        .route("/api/drinks/:id", delete(handlers::delete_drink))
        .route("/api/profile", get(handlers::get_profile).put(handlers::put_profile))
        .route("/api/reminders", get(handlers::get_reminders).put(handlers::put_reminders))
        .route("/api/catalog", get(handlers::get_catalog))
        .with_state(state)
}
