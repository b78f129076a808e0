use std::collections::HashMap;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use jiff::{SignedDuration, Timestamp};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use fourc_export::render::render_summary;
use fourc_scoring::{ScoreResult, Session, SessionState, UnitSystem};

use crate::error::ApiError;
use crate::state::{evict, AppState, SessionEntry};

#[derive(Serialize)]
pub struct VariableView {
    key: String,
    display_name: String,
    unit: UnitSystem,
    has_alternate: bool,
    selected: Option<String>,
    points: Option<u32>,
}

#[derive(Serialize)]
pub struct SessionView {
    id: Uuid,
    created_at: Timestamp,
    last_used: Timestamp,
    state: SessionState,
    answered: usize,
    total: Option<u32>,
    variables: Vec<VariableView>,
    result: Option<ScoreResult>,
}

#[derive(Deserialize)]
pub struct SelectValue {
    label: String,
}

#[derive(Deserialize)]
pub struct SetUnits {
    unit: UnitSystem,
}

fn session_view(id: Uuid, entry: &SessionEntry) -> Result<SessionView, ApiError> {
    let session = &entry.session;

    let mut variables = Vec::new();
    for variable in session.table().list_variables() {
        let unit = session.unit_system(&variable.key);
        variables.push(VariableView {
            key: variable.key.clone(),
            display_name: variable.mapping(unit).display_name.clone(),
            unit,
            has_alternate: variable.has_alternate(),
            selected: session.highlighted_label(&variable.key)?.map(str::to_string),
            points: session.contribution(&variable.key),
        });
    }

    Ok(SessionView {
        id,
        created_at: entry.created_at,
        last_used: entry.last_used,
        state: session.state(),
        answered: session.answered(),
        total: session.current_total().map(|t| t.value()),
        variables,
        result: session.result()?,
    })
}

fn not_found(id: Uuid) -> ApiError {
    ApiError::NotFound(format!("session not found: {id}"))
}

/// Fetch a session and mark it used. A session past its idle limit is
/// dropped here even if the periodic sweep has not reached it yet.
fn live_entry(
    sessions: &mut HashMap<Uuid, SessionEntry>,
    id: Uuid,
    ttl: SignedDuration,
) -> Result<&mut SessionEntry, ApiError> {
    let now = Timestamp::now();
    if sessions.get(&id).is_some_and(|e| e.is_expired(now, ttl)) {
        sessions.remove(&id);
        tracing::info!(session = %id, "session expired");
    }

    let entry = sessions.get_mut(&id).ok_or_else(|| not_found(id))?;
    entry.last_used = now;
    Ok(entry)
}

pub async fn create_session(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<SessionView>), ApiError> {
    let id = Uuid::new_v4();
    let now = Timestamp::now();
    let entry = SessionEntry::new(Session::new(state.table.clone()), now);
    let view = session_view(id, &entry)?;

    let mut sessions = state.sessions.lock().await;
    evict(&mut sessions, now, state.session_ttl);
    sessions.insert(id, entry);
    tracing::info!(session = %id, active = sessions.len(), "session created");

    Ok((StatusCode::CREATED, Json(view)))
}

pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, ApiError> {
    let mut sessions = state.sessions.lock().await;
    let entry = live_entry(&mut sessions, id, state.session_ttl)?;
    Ok(Json(session_view(id, entry)?))
}

pub async fn select_value(
    State(state): State<AppState>,
    Path((id, key)): Path<(Uuid, String)>,
    Json(body): Json<SelectValue>,
) -> Result<Json<SessionView>, ApiError> {
    let mut sessions = state.sessions.lock().await;
    let entry = live_entry(&mut sessions, id, state.session_ttl)?;

    entry.session.select_value(&key, &body.label)?;
    Ok(Json(session_view(id, entry)?))
}

pub async fn set_units(
    State(state): State<AppState>,
    Path((id, key)): Path<(Uuid, String)>,
    Json(body): Json<SetUnits>,
) -> Result<Json<SessionView>, ApiError> {
    let mut sessions = state.sessions.lock().await;
    let entry = live_entry(&mut sessions, id, state.session_ttl)?;

    entry.session.set_unit_system(&key, body.unit)?;
    Ok(Json(session_view(id, entry)?))
}

pub async fn get_result(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ScoreResult>, ApiError> {
    let mut sessions = state.sessions.lock().await;
    let session = &live_entry(&mut sessions, id, state.session_ttl)?.session;

    let total = session.current_total().ok_or_else(|| {
        ApiError::Conflict(format!(
            "{} of {} variables answered; a score needs all of them",
            session.answered(),
            session.table().list_variables().len()
        ))
    })?;
    Ok(Json(session.result_for(total)?))
}

pub async fn get_summary(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<String, ApiError> {
    let mut sessions = state.sessions.lock().await;
    let entry = live_entry(&mut sessions, id, state.session_ttl)?;
    Ok(render_summary(&entry.session)?)
}

pub async fn delete_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let mut sessions = state.sessions.lock().await;
    sessions.remove(&id).ok_or_else(|| not_found(id))?;
    tracing::info!(session = %id, active = sessions.len(), "session ended");
    Ok(StatusCode::NO_CONTENT)
}
