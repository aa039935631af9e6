use std::sync::Arc;

use crate::config::Config;
use crate::export::PdfRenderer;
use crate::resume::store::ResumeStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// The single live resume and its settings.
    pub store: Arc<ResumeStore>,
    /// Pluggable PDF backend. Default: `CommandPdfRenderer` running `PDF_RENDERER_BIN`.
    pub pdf: Arc<dyn PdfRenderer>,
    pub config: Config,
}
