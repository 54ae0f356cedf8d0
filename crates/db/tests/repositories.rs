//! Repository-level integration tests against a real PostgreSQL database.

use annotate_core::ingest::ParsedPair;
use annotate_db::models::class::DatasetClass;
use annotate_db::models::dataset::{CreateDataset, Dataset};
use annotate_db::models::role::UserRole;
use annotate_db::models::status::TaskStatus;
use annotate_db::models::task::NewTask;
use annotate_db::models::text_pair::TextPair;
use annotate_db::models::user::{CreateUser, User};
use annotate_db::repositories::{
    AnnotationRepo, ClassRepo, DatasetRepo, ProgressMarkerRepo, TaskRepo, TextPairRepo, UserRepo,
};
use chrono::{Duration, Utc};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn seed_dataset(
    pool: &PgPool,
    pairs: usize,
    classes: &[&str],
) -> (Dataset, Vec<TextPair>, Vec<DatasetClass>) {
    let mut tx = pool.begin().await.unwrap();
    let dataset = DatasetRepo::create(
        &mut tx,
        &CreateDataset {
            name: "seeded".into(),
            description: None,
        },
    )
    .await
    .unwrap();
    let parsed: Vec<ParsedPair> = (0..pairs)
        .map(|i| ParsedPair {
            text1: format!("left {i}"),
            text2: format!("right {i}"),
        })
        .collect();
    TextPairRepo::create_batch(&mut tx, dataset.id, &parsed)
        .await
        .unwrap();
    let names: Vec<String> = classes.iter().map(|c| c.to_string()).collect();
    let classes = ClassRepo::create_batch(&mut tx, dataset.id, &names)
        .await
        .unwrap();
    tx.commit().await.unwrap();

    let pairs = TextPairRepo::list_by_dataset(pool, dataset.id).await.unwrap();
    (dataset, pairs, classes)
}

async fn seed_user(pool: &PgPool, username: &str, role: UserRole) -> User {
    UserRepo::create(
        pool,
        &CreateUser {
            first_name: "Test".into(),
            last_name: username.into(),
            username: username.into(),
            email: format!("{username}@test.com"),
            password_hash: "not-a-real-hash".into(),
            role_id: role.id(),
        },
    )
    .await
    .unwrap()
}

async fn assign_all(pool: &PgPool, dataset_id: i64, user_id: i64) -> Vec<i64> {
    let mut tx = pool.begin().await.unwrap();
    let ids = TextPairRepo::lock_unassigned_ids(&mut tx, dataset_id)
        .await
        .unwrap();
    let tasks: Vec<NewTask> = ids
        .iter()
        .map(|&text_pair_id| NewTask {
            user_id,
            text_pair_id,
        })
        .collect();
    TaskRepo::create_batch(&mut tx, dataset_id, &tasks, Utc::now() + Duration::days(7))
        .await
        .unwrap();
    TextPairRepo::mark_assigned(&mut tx, &ids).await.unwrap();
    tx.commit().await.unwrap();
    ids
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_seeded_roles_match_enum(pool: PgPool) {
    let names: Vec<(i64, String)> = sqlx::query_as("SELECT id, name FROM roles ORDER BY id")
        .fetch_all(&pool)
        .await
        .unwrap();
    assert_eq!(
        names,
        vec![
            (UserRole::Admin.id(), "admin".to_string()),
            (UserRole::Annotator.id(), "annotator".to_string()),
        ]
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_classes_keep_input_order(pool: PgPool) {
    let (dataset, _, _) = seed_dataset(&pool, 1, &["positive", "negative", "neutral"]).await;
    let classes = ClassRepo::list_by_dataset(&pool, dataset.id).await.unwrap();
    let names: Vec<&str> = classes.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["positive", "negative", "neutral"]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_lock_unassigned_skips_assigned_pairs(pool: PgPool) {
    let (dataset, pairs, _) = seed_dataset(&pool, 4, &["a"]).await;

    let mut tx = pool.begin().await.unwrap();
    TextPairRepo::mark_assigned(&mut tx, &[pairs[0].id, pairs[2].id])
        .await
        .unwrap();
    let ids = TextPairRepo::lock_unassigned_ids(&mut tx, dataset.id)
        .await
        .unwrap();
    tx.commit().await.unwrap();

    assert_eq!(ids, vec![pairs[1].id, pairs[3].id]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_release_keeps_annotated_pairs_assigned(pool: PgPool) {
    let (dataset, pairs, classes) = seed_dataset(&pool, 3, &["yes", "no"]).await;
    let annotator = seed_user(&pool, "releaser", UserRole::Annotator).await;
    let ids = assign_all(&pool, dataset.id, annotator.id).await;

    let mut tx = pool.begin().await.unwrap();
    AnnotationRepo::create(&mut tx, pairs[0].id, annotator.id, classes[0].id)
        .await
        .unwrap();
    let released = TextPairRepo::release_unannotated(&mut tx, &ids).await.unwrap();
    tx.commit().await.unwrap();

    assert_eq!(released, 2);
    let after = TextPairRepo::list_by_dataset(&pool, dataset.id).await.unwrap();
    assert!(after[0].assigned, "annotated pair must stay assigned");
    assert!(!after[1].assigned);
    assert!(!after[2].assigned);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_duplicate_annotation_violates_unique_index(pool: PgPool) {
    let (_, pairs, classes) = seed_dataset(&pool, 1, &["x"]).await;
    let annotator = seed_user(&pool, "dup", UserRole::Annotator).await;

    let mut tx = pool.begin().await.unwrap();
    assert!(!AnnotationRepo::exists(&mut tx, pairs[0].id, annotator.id)
        .await
        .unwrap());
    AnnotationRepo::create(&mut tx, pairs[0].id, annotator.id, classes[0].id)
        .await
        .unwrap();
    assert!(AnnotationRepo::exists(&mut tx, pairs[0].id, annotator.id)
        .await
        .unwrap());
    tx.commit().await.unwrap();

    let mut tx = pool.begin().await.unwrap();
    let err = AnnotationRepo::create(&mut tx, pairs[0].id, annotator.id, classes[0].id)
        .await
        .unwrap_err();
    match err {
        sqlx::Error::Database(db) => {
            assert_eq!(db.code().as_deref(), Some("23505"));
            assert_eq!(db.constraint(), Some("uq_annotations_text_pair_user"));
        }
        other => panic!("expected a database error, got {other:?}"),
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_complete_for_pair_and_totals(pool: PgPool) {
    let (dataset, pairs, _) = seed_dataset(&pool, 4, &["x"]).await;
    let annotator = seed_user(&pool, "finisher", UserRole::Annotator).await;
    assign_all(&pool, dataset.id, annotator.id).await;

    let mut tx = pool.begin().await.unwrap();
    let updated = TaskRepo::complete_for_pair(&mut tx, pairs[1].id, annotator.id)
        .await
        .unwrap();
    tx.commit().await.unwrap();
    assert_eq!(updated, 1);

    let totals = TaskRepo::totals_for_dataset(&pool, dataset.id).await.unwrap();
    assert_eq!((totals.total, totals.completed), (4, 1));

    let tasks = TaskRepo::list_for_annotator(&pool, dataset.id, annotator.id)
        .await
        .unwrap();
    let done = tasks
        .iter()
        .find(|t| t.text_pair_id == pairs[1].id)
        .unwrap();
    assert_eq!(done.status_id, TaskStatus::Done.id());
    assert!(done.completed_at.is_some());
    assert!(done.deadline_at.is_some(), "deadline is kept after completion");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_release_detaches_tasks(pool: PgPool) {
    let (dataset, _, _) = seed_dataset(&pool, 2, &["x"]).await;
    let annotator = seed_user(&pool, "leaver", UserRole::Annotator).await;
    assign_all(&pool, dataset.id, annotator.id).await;

    let mut tx = pool.begin().await.unwrap();
    let tasks = TaskRepo::lock_for_annotator(&mut tx, dataset.id, annotator.id)
        .await
        .unwrap();
    let ids: Vec<i64> = tasks.iter().map(|t| t.id).collect();
    TaskRepo::release(&mut tx, &ids).await.unwrap();
    tx.commit().await.unwrap();

    assert_eq!(
        TaskRepo::count_for_annotator(&pool, dataset.id, annotator.id)
            .await
            .unwrap(),
        0
    );
    let task = TaskRepo::find_by_id(&pool, ids[0]).await.unwrap().unwrap();
    assert_eq!(task.user_id, None);
    assert_eq!(task.status_id, TaskStatus::Pending.id());
    assert_eq!(task.deadline_at, None);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_count_annotated_is_distinct_per_pair(pool: PgPool) {
    let (dataset, pairs, classes) = seed_dataset(&pool, 3, &["x", "y"]).await;
    let a = seed_user(&pool, "ann_a", UserRole::Annotator).await;
    let b = seed_user(&pool, "ann_b", UserRole::Annotator).await;

    let mut tx = pool.begin().await.unwrap();
    AnnotationRepo::create(&mut tx, pairs[0].id, a.id, classes[0].id)
        .await
        .unwrap();
    AnnotationRepo::create(&mut tx, pairs[0].id, b.id, classes[1].id)
        .await
        .unwrap();
    AnnotationRepo::create(&mut tx, pairs[2].id, a.id, classes[1].id)
        .await
        .unwrap();
    tx.commit().await.unwrap();

    assert_eq!(
        TextPairRepo::count_annotated(&pool, dataset.id).await.unwrap(),
        2
    );
    assert_eq!(
        TextPairRepo::count_by_dataset(&pool, dataset.id).await.unwrap(),
        3
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_export_uses_latest_annotation(pool: PgPool) {
    let (dataset, pairs, classes) = seed_dataset(&pool, 2, &["first", "second"]).await;
    let a = seed_user(&pool, "early", UserRole::Annotator).await;
    let b = seed_user(&pool, "late", UserRole::Annotator).await;

    let mut tx = pool.begin().await.unwrap();
    AnnotationRepo::create(&mut tx, pairs[0].id, a.id, classes[0].id)
        .await
        .unwrap();
    AnnotationRepo::create(&mut tx, pairs[0].id, b.id, classes[1].id)
        .await
        .unwrap();
    tx.commit().await.unwrap();

    let rows = TextPairRepo::list_for_export(&pool, dataset.id).await.unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].class_name.as_deref(), Some("second"));
    assert_eq!(rows[1].class_name, None);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_progress_marker_upsert_overwrites(pool: PgPool) {
    let (dataset, _, _) = seed_dataset(&pool, 1, &["x"]).await;
    let annotator = seed_user(&pool, "pager", UserRole::Annotator).await;

    assert!(ProgressMarkerRepo::find(&pool, annotator.id, dataset.id)
        .await
        .unwrap()
        .is_none());
    ProgressMarkerRepo::upsert(&pool, annotator.id, dataset.id, 3)
        .await
        .unwrap();
    let marker = ProgressMarkerRepo::upsert(&pool, annotator.id, dataset.id, 5)
        .await
        .unwrap();
    assert_eq!(marker.last_page, 5);

    let rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM user_dataset_progress")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(rows, 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_available_annotators_exclude_assigned(pool: PgPool) {
    let (dataset, _, _) = seed_dataset(&pool, 2, &["x"]).await;
    let busy = seed_user(&pool, "busy", UserRole::Annotator).await;
    let free = seed_user(&pool, "free", UserRole::Annotator).await;
    seed_user(&pool, "boss", UserRole::Admin).await;
    assign_all(&pool, dataset.id, busy.id).await;

    let available = UserRepo::list_available_for_dataset(&pool, dataset.id)
        .await
        .unwrap();
    let ids: Vec<i64> = available.iter().map(|u| u.id).collect();
    assert_eq!(ids, vec![free.id]);

    let assigned = UserRepo::list_assigned_to_dataset(&pool, dataset.id)
        .await
        .unwrap();
    assert_eq!(assigned.len(), 1);
    assert_eq!(assigned[0].id, busy.id);
    assert_eq!(assigned[0].task_count, 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_find_annotators_by_ids_drops_admins(pool: PgPool) {
    let annotator = seed_user(&pool, "picked", UserRole::Annotator).await;
    let admin = seed_user(&pool, "not_picked", UserRole::Admin).await;

    let found = UserRepo::find_annotators_by_ids(&pool, &[admin.id, annotator.id, 9999])
        .await
        .unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, annotator.id);
}
