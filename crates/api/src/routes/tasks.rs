//! Route definitions for the annotator workspace.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{annotations, tasks};
use crate::state::AppState;

/// Routes mounted at `/tasks`.
///
/// ```text
/// GET  /annotator/{id}           -> workspace
/// GET  /annotator/{id}/summary   -> summary
/// POST /annotate                 -> create annotation
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/annotator/{id}", get(tasks::workspace))
        .route("/annotator/{id}/summary", get(tasks::summary))
        .route("/annotate", post(annotations::create))
}
