use axum::Json;
use axum::extract::State;
use axum::response::IntoResponse;

use super::repo_to_api;
use crate::infra::http::api::error::ApiError;
use crate::infra::http::api::state::ApiState;

pub async fn list_dashboards(
    State(state): State<ApiState>,
) -> Result<impl IntoResponse, ApiError> {
    let response = state
        .dashboards
        .list_dashboards()
        .await
        .map_err(repo_to_api)?;

    Ok(Json(response))
}
