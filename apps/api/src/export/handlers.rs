use axum::{
    extract::State,
    http::header,
    response::{Html, IntoResponse},
};
use tracing::info;

use crate::errors::AppError;
use crate::export::ExportOptions;
use crate::render::render_document;
use crate::state::AppState;

/// GET /api/v1/preview
pub async fn handle_preview(State(state): State<AppState>) -> Html<String> {
    let snapshot = state.store.snapshot().await;
    Html(render_document(&snapshot.resume, &snapshot.settings))
}

/// GET /api/v1/export/pdf
/// Renders the current preview and returns it as a downloadable letter-size PDF.
pub async fn handle_export_pdf(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let snapshot = state.store.snapshot().await;
    let html = render_document(&snapshot.resume, &snapshot.settings);
    let options = ExportOptions::default();

    let pdf = state.pdf.render_pdf(&html, &options).await?;
    info!("Exported {} ({} bytes)", options.filename, pdf.len());

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", options.filename),
            ),
        ],
        pdf,
    ))
}
