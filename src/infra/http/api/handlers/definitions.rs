//! Report definition handlers

use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use reporting_api_types::{ReportConfigHit, ReportConfigListQuery, ReportConfigListResponse};
use serde_json::Value;

use crate::application::definitions::ListDefinitionsCommand;
use crate::application::repos::StoredDefinition;

use super::definition_to_api;
use crate::infra::http::api::error::ApiError;
use crate::infra::http::api::state::ApiState;

pub async fn create_definition(
    State(state): State<ApiState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(document) = payload.map_err(json_rejection)?;

    let id = state
        .definitions
        .create(&document)
        .await
        .map_err(definition_to_api)?;

    Ok(Json(id))
}

pub async fn list_definitions(
    State(state): State<ApiState>,
    query: Result<Query<ReportConfigListQuery>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Query(query) = query
        .map_err(|err| ApiError::bad_request("invalid query", Some(err.body_text())))?;

    let page = state
        .definitions
        .list(ListDefinitionsCommand {
            size: query.size,
            sort_field: query.sort_field,
            sort_direction: query.sort_direction,
        })
        .await
        .map_err(definition_to_api)?;

    Ok(Json(ReportConfigListResponse {
        total: page.total,
        data: page.items.into_iter().map(hit).collect(),
    }))
}

pub async fn get_definition(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let stored = state
        .definitions
        .get(&id)
        .await
        .map_err(definition_to_api)?;

    Ok(Json(hit(stored)))
}

pub async fn update_definition(
    State(state): State<ApiState>,
    Path(id): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(document) = payload.map_err(json_rejection)?;

    state
        .definitions
        .update(&id, &document)
        .await
        .map_err(definition_to_api)?;

    Ok(Json(id))
}

pub async fn delete_definition(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .definitions
        .delete(&id)
        .await
        .map_err(definition_to_api)?;

    Ok(StatusCode::OK)
}

fn hit(stored: StoredDefinition) -> ReportConfigHit {
    ReportConfigHit {
        id: stored.id,
        source: stored.document,
    }
}

fn json_rejection(err: JsonRejection) -> ApiError {
    ApiError::bad_request("invalid JSON body", Some(err.body_text()))
}
