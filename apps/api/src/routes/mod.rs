pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::auth::handlers as auth;
use crate::parsing::handlers as parsing;
use crate::resumes::handlers as resumes;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let upload_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/health", get(health::health_handler))
        // Accounts
        .route("/api/auth/register", post(auth::handle_register))
        .route("/api/auth/login", post(auth::handle_login))
        .route("/api/auth/me", get(auth::handle_me))
        // Saved résumés
        .route(
            "/api/resumes",
            post(resumes::handle_create_resume).get(resumes::handle_list_resumes),
        )
        .route(
            "/api/resumes/:id",
            get(resumes::handle_get_resume)
                .put(resumes::handle_update_resume)
                .delete(resumes::handle_delete_resume),
        )
        // Parsing
        .route("/api/parse-resume", post(parsing::handle_parse_resume))
        .route("/api/resume-advice", post(parsing::handle_resume_advice))
        .layer(DefaultBodyLimit::max(upload_limit))
        .with_state(state)
}
