//! Admin statistics dashboard.
//!
//! Every card is computed independently from the current store, with the
//! "change" label comparing against the state 24 hours ago (or yesterday,
//! for the per-day annotation count).

use std::collections::HashMap;

use annotate_core::activity::{actions, ActivityKind};
use annotate_core::progress::{completion_pct_floor, progress_pct};
use annotate_core::statistics::{
    absolute_change, fill_daily_trend, format_rate, percentage_change, percentage_point_change,
    relative_time, top_annotators, trend_start, AnnotatorScore, DailyCount,
    RECENT_ACTIVITY_LIMIT, TOP_ANNOTATORS_LIMIT, TREND_DAYS,
};
use annotate_core::types::{DbId, Timestamp};
use annotate_db::models::role::UserRole;
use annotate_db::models::task::DatasetStatusCounts;
use annotate_db::repositories::{
    ActivityLogRepo, AnnotationRepo, DatasetRepo, TaskRepo, UserRepo,
};
use chrono::{Duration, NaiveDate, NaiveTime, Utc};
use serde::Serialize;
use sqlx::PgPool;

use crate::engine::activity::ActivityRecorder;
use crate::error::AppResult;

/// A headline number with its change label.
#[derive(Debug, Serialize)]
pub struct MetricCard<T: Serialize> {
    pub value: T,
    pub change: String,
}

#[derive(Debug, Serialize)]
pub struct RecentActivity {
    pub id: DbId,
    pub action: String,
    pub description: String,
    pub time: String,
    pub kind: ActivityKind,
}

#[derive(Debug, Serialize)]
pub struct Dashboard {
    pub total_datasets: MetricCard<i64>,
    pub active_annotators: MetricCard<i64>,
    pub annotations_today: MetricCard<i64>,
    pub completion_rate: MetricCard<String>,
    pub recent_activities: Vec<RecentActivity>,
    pub dataset_tasks: Vec<DatasetStatusCounts>,
    pub top_annotators: Vec<AnnotatorScore>,
    pub daily_annotations: Vec<DailyCount>,
}

pub async fn dashboard(
    pool: &PgPool,
    activity: &ActivityRecorder,
    actor_id: DbId,
) -> AppResult<Dashboard> {
    let result = build_dashboard(pool, Utc::now()).await;
    if let Err(err) = &result {
        activity
            .record_failure(
                actions::STATISTICS_ERROR,
                "Failed to compute statistics",
                err,
                Some(actor_id),
            )
            .await;
    }
    result
}

fn start_of_day(day: NaiveDate) -> Timestamp {
    day.and_time(NaiveTime::MIN).and_utc()
}

async fn build_dashboard(pool: &PgPool, now: Timestamp) -> AppResult<Dashboard> {
    let day_ago = now - Duration::hours(24);
    let today = now.date_naive();
    let today_start = start_of_day(today);
    let yesterday_start = today_start - Duration::days(1);

    let datasets = DatasetRepo::count(pool).await?;
    let datasets_before = DatasetRepo::count_created_before(pool, day_ago).await?;

    let annotators = UserRepo::count_active_annotators(pool, None).await?;
    let annotators_before = UserRepo::count_active_annotators(pool, Some(day_ago)).await?;

    let annotated_today = AnnotationRepo::count_between(pool, today_start, now).await?;
    let annotated_yesterday =
        AnnotationRepo::count_between(pool, yesterday_start, today_start).await?;

    let (tasks, done) = TaskRepo::global_totals(pool, None).await?;
    let (tasks_before, done_before) = TaskRepo::global_totals(pool, Some(day_ago)).await?;
    let rate = progress_pct(done, tasks);
    let rate_before = progress_pct(done_before, tasks_before);

    let recent_activities = ActivityLogRepo::list(pool, RECENT_ACTIVITY_LIMIT, 0)
        .await?
        .into_iter()
        .map(|log| RecentActivity {
            kind: ActivityKind::of(&log.action),
            time: relative_time(log.created_at, now),
            id: log.id,
            action: log.action,
            description: log.description,
        })
        .collect();

    let dataset_tasks = TaskRepo::status_counts_by_dataset(pool).await?;

    let scores = TaskRepo::totals_by_annotator(pool, UserRole::Annotator.id())
        .await?
        .into_iter()
        .map(|row| AnnotatorScore {
            name: format!("{} {}", row.first_name, row.last_name),
            completion: completion_pct_floor(row.completed, row.total),
        })
        .collect();

    let since = start_of_day(trend_start(today, TREND_DAYS));
    let per_day: HashMap<NaiveDate, i64> = AnnotationRepo::daily_counts_since(pool, since)
        .await?
        .into_iter()
        .map(|row| (row.day, row.count))
        .collect();

    Ok(Dashboard {
        total_datasets: MetricCard {
            value: datasets,
            change: percentage_change(datasets_before, datasets),
        },
        active_annotators: MetricCard {
            value: annotators,
            change: absolute_change(annotators_before, annotators),
        },
        annotations_today: MetricCard {
            value: annotated_today,
            change: percentage_change(annotated_yesterday, annotated_today),
        },
        completion_rate: MetricCard {
            value: format_rate(rate),
            change: percentage_point_change(rate_before, rate),
        },
        recent_activities,
        dataset_tasks,
        top_annotators: top_annotators(scores, TOP_ANNOTATORS_LIMIT),
        daily_annotations: fill_daily_trend(&per_day, today, TREND_DAYS),
    })
}
