use axum::extract::{Path, State};
use axum::Json;

use fourc_export::render::render_explanation;
use fourc_scoring::{PlotPoint, RiskBand, VariableDefinition};

use crate::error::ApiError;
use crate::state::AppState;

pub async fn list_variables(State(state): State<AppState>) -> Json<Vec<VariableDefinition>> {
    Json(state.table.list_variables().to_vec())
}

pub async fn get_variable(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<VariableDefinition>, ApiError> {
    let variable = state
        .table
        .variable(&key)
        .ok_or_else(|| ApiError::NotFound(format!("variable not found: {key}")))?;

    Ok(Json(variable.clone()))
}

pub async fn list_categories(State(state): State<AppState>) -> Json<Vec<RiskBand>> {
    Json(state.table.bands().to_vec())
}

pub async fn mortality_curve(State(state): State<AppState>) -> Json<Vec<PlotPoint>> {
    Json(state.table.plot_series())
}

pub async fn explanation(State(state): State<AppState>) -> Result<String, ApiError> {
    Ok(render_explanation(&state.table)?)
}
