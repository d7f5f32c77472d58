use std::sync::Arc;

use crate::{
    error::{ApiError, ApiResult},
    main_lib::AppState,
};
use axum::{
    extract::{Path, Query, State},
    http::{header::IF_MATCH, HeaderMap, StatusCode},
    routing::get,
    Json, Router,
};
use chrono::{DateTime, Utc};
use goal_planner_core::goals::{
    summarize_goals, Goal, GoalPatch, GoalProgress, GoalsSummary, NewGoal,
};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct ProgressQuery {
    now: Option<DateTime<Utc>>,
}

/// Reads the expected version from `If-Match`. Accepts `3`, `"3"` and
/// `W/"3"`; `*` means no version check.
fn expected_version(headers: &HeaderMap) -> ApiResult<Option<i64>> {
    let Some(value) = headers.get(IF_MATCH) else {
        return Ok(None);
    };
    let raw = value
        .to_str()
        .map_err(|_| ApiError::BadRequest("If-Match header is not valid text".to_string()))?
        .trim();
    if raw == "*" {
        return Ok(None);
    }
    let tag = raw.strip_prefix("W/").unwrap_or(raw).trim_matches('"');
    tag.parse::<i64>()
        .map(Some)
        .map_err(|_| ApiError::BadRequest(format!("If-Match must be a goal version, got '{}'", raw)))
}

async fn list_goals(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<Goal>>> {
    let goals = state.goal_store.list_goals().await?;
    Ok(Json(goals))
}

async fn get_goal(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Goal>> {
    let goal = state.goal_store.get_goal(&id).await?;
    Ok(Json(goal))
}

async fn create_goal(
    State(state): State<Arc<AppState>>,
    Json(new_goal): Json<NewGoal>,
) -> ApiResult<(StatusCode, Json<Goal>)> {
    let goal = state.goal_store.create_goal(new_goal).await?;
    tracing::debug!("Created goal {}", goal.id);
    Ok((StatusCode::CREATED, Json(goal)))
}

async fn update_goal(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(patch): Json<GoalPatch>,
) -> ApiResult<Json<Goal>> {
    let version = expected_version(&headers)?;
    let goal = state.goal_store.update_goal(&id, patch, version).await?;
    Ok(Json(goal))
}

async fn delete_goal(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<StatusCode> {
    state.goal_store.delete_goal(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn goals_progress(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ProgressQuery>,
) -> ApiResult<Json<Vec<GoalProgress>>> {
    let now = query.now.unwrap_or_else(Utc::now);
    let goals = state.goal_store.list_goals().await?;
    Ok(Json(
        goals.iter().map(|g| GoalProgress::evaluate(g, now)).collect(),
    ))
}

async fn goals_summary(State(state): State<Arc<AppState>>) -> ApiResult<Json<GoalsSummary>> {
    let goals = state.goal_store.list_goals().await?;
    Ok(Json(summarize_goals(&goals)?))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/goals", get(list_goals).post(create_goal))
        .route("/goals/progress", get(goals_progress))
        .route("/goals/summary", get(goals_summary))
        .route(
            "/goals/{id}",
            get(get_goal).patch(update_goal).delete(delete_goal),
        )
}
