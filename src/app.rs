use crate::handlers;
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post, put},
};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/api/stats", get(handlers::get_stats))
        .route("/api/members", get(handlers::list_members).post(handlers::create_member))
        .route("/api/members/search", get(handlers::search_members))
        .route(
            "/api/members/:id",
            put(handlers::update_member).delete(handlers::delete_member),
        )
        .route("/api/payments", get(handlers::list_payments).post(handlers::create_payment))
        .route("/api/attendance", get(handlers::list_attendance).post(handlers::check_in))
        .route("/api/routines", get(handlers::list_routines).post(handlers::save_routine))
        .route("/api/routines/generate", post(handlers::generate_routine))
        .with_state(state)
}
