//! API handlers organized by resource type.
//!
//! Error conversions shared by the handlers live here.

mod dashboards;
mod definitions;
mod health;

pub use dashboards::*;
pub use definitions::*;
pub use health::*;

use axum::http::StatusCode;

use crate::application::definitions::DefinitionError;
use crate::application::repos::RepoError;

use super::error::{ApiError, codes};

pub(crate) fn repo_to_api(err: RepoError) -> ApiError {
    match err {
        RepoError::NotFound { id } => ApiError::not_found(
            "resource not found",
            Some(format!("no document with id `{id}`")),
        ),
        RepoError::Store { status, reason } => ApiError::new(
            StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY),
            codes::STORE,
            "Store request failed",
            Some(reason),
        ),
        RepoError::Unavailable(msg) => ApiError::new(
            StatusCode::BAD_GATEWAY,
            codes::STORE_UNAVAILABLE,
            "Store unavailable",
            Some(msg),
        ),
        RepoError::Decode(msg) => ApiError::new(
            StatusCode::BAD_GATEWAY,
            codes::STORE,
            "Unexpected store response",
            Some(msg),
        ),
    }
}

pub(crate) fn definition_to_api(err: DefinitionError) -> ApiError {
    match err {
        DefinitionError::Validation(err) => ApiError::invalid_definition(err.to_string()),
        DefinitionError::NotFound { id } => ApiError::not_found(
            "report definition not found",
            Some(format!("no report definition with id `{id}`")),
        ),
        DefinitionError::Repo(repo) => repo_to_api(repo),
        DefinitionError::Timestamp(err) => ApiError::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            codes::INTERNAL,
            "Internal error",
            Some(err.to_string()),
        ),
    }
}
