//! HTTP endpoint handlers

use std::sync::Arc;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use tracing::{info, warn};

use crate::{
    state::AppState,
    timer::{Timer, TimerId},
};
use super::responses::{CreateTimerRequest, HealthResponse, StatusResponse, TimerView};

fn find_timer(state: &AppState, id: TimerId) -> Result<Arc<Timer>, StatusCode> {
    state.timers.get(id).ok_or_else(|| {
        warn!("Unknown timer requested: {}", id);
        StatusCode::NOT_FOUND
    })
}

/// Handle GET /timers - List all timers
pub async fn list_timers_handler(State(state): State<Arc<AppState>>) -> Json<Vec<TimerView>> {
    let views = state
        .timers
        .list()
        .iter()
        .map(|timer| TimerView::of(timer))
        .collect();
    Json(views)
}

/// Handle POST /timers - Create a timer
pub async fn create_timer_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CreateTimerRequest>,
) -> Result<(StatusCode, Json<TimerView>), StatusCode> {
    let Some(timer) = state.create_timer(request.kind, request.id) else {
        warn!("Create endpoint called with an id already in use");
        return Err(StatusCode::CONFLICT);
    };
    info!("Create endpoint called - {} timer {}", timer.kind().name(), timer.id());
    Ok((StatusCode::CREATED, Json(TimerView::of(&timer))))
}

/// Handle GET /timers/:id - Show one timer
pub async fn get_timer_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<TimerId>,
) -> Result<Json<TimerView>, StatusCode> {
    let timer = find_timer(&state, id)?;
    Ok(Json(TimerView::of(&timer)))
}

/// Handle DELETE /timers/:id - Remove a timer
pub async fn delete_timer_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<TimerId>,
) -> StatusCode {
    match state.remove_timer(id) {
        Some(_) => StatusCode::NO_CONTENT,
        None => StatusCode::NOT_FOUND,
    }
}

/// Handle POST /timers/:id/start - Start or resume a timer
pub async fn start_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<TimerId>,
) -> Result<Json<TimerView>, StatusCode> {
    let timer = find_timer(&state, id)?;
    timer.start();
    state.record_action(&format!("start {}", id));
    Ok(Json(TimerView::of(&timer)))
}

/// Handle POST /timers/:id/pause - Pause a timer
pub async fn pause_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<TimerId>,
) -> Result<Json<TimerView>, StatusCode> {
    let timer = find_timer(&state, id)?;
    timer.pause();
    state.record_action(&format!("pause {}", id));
    Ok(Json(TimerView::of(&timer)))
}

/// Handle POST /timers/:id/stop - Complete a timer now
pub async fn stop_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<TimerId>,
) -> Result<Json<TimerView>, StatusCode> {
    let timer = find_timer(&state, id)?;
    timer.stop();
    state.record_action(&format!("stop {}", id));
    Ok(Json(TimerView::of(&timer)))
}

/// Handle POST /timers/:id/toggle - Pause if running, otherwise start
pub async fn toggle_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<TimerId>,
) -> Result<Json<TimerView>, StatusCode> {
    let timer = find_timer(&state, id)?;
    timer.toggle();
    state.record_action(&format!("toggle {}", id));
    Ok(Json(TimerView::of(&timer)))
}

/// Handle GET /status - Return current server status
pub async fn status_handler(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    let timers = state.timers.list();
    let running_count = timers.iter().filter(|timer| timer.is_running()).count();
    let (last_action, last_action_time) = state.get_last_action();

    Json(StatusResponse {
        timer_count: timers.len(),
        running_count,
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    })
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
