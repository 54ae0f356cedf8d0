pub mod admin;
pub mod auth;
pub mod health;
pub mod tasks;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/login                                        login (public)
/// /auth/logout                                       logout (requires auth)
///
/// /admin/annotators                                  list, create
/// /admin/annotators/{id}                             get, update, deactivate
/// /admin/datasets                                    paged listing, multipart create
/// /admin/datasets/{id}                               get
/// /admin/datasets/{id}/details                       details with annotation counts
/// /admin/datasets/{id}/available-annotators          annotators without tasks here
/// /admin/datasets/{id}/assign                        distribute unassigned pairs (POST)
/// /admin/datasets/{id}/download                      CSV export
/// /admin/text-pairs/dataset/{id}                     text-pair browser
/// /admin/text-pairs/dataset/{id}/unassign/{aid}      release open tasks (POST)
/// /admin/annotations                                 record annotation for an annotator
/// /admin/statistics                                  dashboard
/// /admin/activity-logs                               audit trail
///
/// /tasks/annotator/{id}                              workspace (?dataset_id&page)
/// /tasks/annotator/{id}/summary                      per-dataset task summary
/// /tasks/annotate                                    record own annotation (POST)
/// ```
///
/// Everything under `/admin` requires the admin role; `/tasks` requires any
/// authenticated user acting for themselves (admins may act for anyone).
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/admin", admin::router())
        .nest("/tasks", tasks::router())
}
