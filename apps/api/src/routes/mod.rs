pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, patch, post, put},
    Router,
};

use crate::export::handlers as export;
use crate::resume::handlers;
use crate::state::AppState;

/// Multipart framing overhead allowed on top of the image limit.
const UPLOAD_OVERHEAD_BYTES: usize = 64 * 1024;

pub fn build_router(state: AppState) -> Router {
    let upload_limit = state.config.max_profile_image_bytes + UPLOAD_OVERHEAD_BYTES;

    Router::new()
        .route("/health", get(health::health_handler))
        // Document
        .route("/api/v1/resume", get(handlers::handle_get_resume))
        .route("/api/v1/resume/mutations", post(handlers::handle_mutation))
        .route(
            "/api/v1/resume/personal",
            patch(handlers::handle_update_personal),
        )
        .route(
            "/api/v1/resume/personal/image",
            post(handlers::handle_upload_image)
                .delete(handlers::handle_remove_image)
                .layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route(
            "/api/v1/resume/objective",
            put(handlers::handle_update_objective),
        )
        .route(
            "/api/v1/resume/skills/categories",
            post(handlers::handle_add_skill_category),
        )
        .route(
            "/api/v1/resume/skills/categories/:id",
            delete(handlers::handle_remove_skill_category),
        )
        // Settings
        .route("/api/v1/settings", patch(handlers::handle_update_settings))
        .route(
            "/api/v1/settings/text-size/increase",
            post(handlers::handle_increase_text_size),
        )
        .route(
            "/api/v1/settings/text-size/decrease",
            post(handlers::handle_decrease_text_size),
        )
        .route(
            "/api/v1/settings/text-size/reset",
            post(handlers::handle_reset_text_size),
        )
        // Persistence
        .route("/api/v1/resume/save", post(handlers::handle_save))
        .route("/api/v1/resume/load", post(handlers::handle_load))
        .route("/api/v1/resume/reset", post(handlers::handle_reset))
        .route(
            "/api/v1/resume/autosave",
            put(handlers::handle_toggle_autosave),
        )
        // Output
        .route("/api/v1/preview", get(export::handle_preview))
        .route("/api/v1/export/pdf", get(export::handle_export_pdf))
        .with_state(state)
}
