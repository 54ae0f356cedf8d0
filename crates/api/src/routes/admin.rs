//! Route definitions for the `/admin` surface.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{activity_logs, annotations, annotators, datasets, statistics, text_pairs};
use crate::state::AppState;

/// Routes mounted at `/admin`. Every handler requires the admin role.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/annotators", get(annotators::list).post(annotators::create))
        .route(
            "/annotators/{id}",
            get(annotators::get)
                .put(annotators::update)
                .delete(annotators::delete),
        )
        .route("/datasets", get(datasets::list).post(datasets::create))
        .route("/datasets/{id}", get(datasets::get))
        .route("/datasets/{id}/details", get(datasets::details))
        .route(
            "/datasets/{id}/available-annotators",
            get(datasets::available_annotators),
        )
        .route("/datasets/{id}/assign", post(datasets::assign))
        .route("/datasets/{id}/download", get(datasets::download))
        .route("/text-pairs/dataset/{id}", get(text_pairs::list_by_dataset))
        .route(
            "/text-pairs/dataset/{id}/unassign/{annotator_id}",
            post(text_pairs::unassign),
        )
        .route("/annotations", post(annotations::create_as_admin))
        .route("/statistics", get(statistics::dashboard))
        .route("/activity-logs", get(activity_logs::list))
}
