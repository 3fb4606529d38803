use std::sync::Arc;

use metrics::counter;
use once_cell::sync::Lazy;
use regex::Regex;
use reporting_api_types::SortDirection;
use serde_json::Value;
use thiserror::Error;
use time::{OffsetDateTime, format_description::well_known::Rfc3339};
use tracing::{info, warn};

use crate::application::repos::{
    DefinitionPage, ListDefinitionsParams, RepoError, ReportDefinitionsRepo, SortSpec,
    StoredDefinition,
};
use crate::domain::{ValidationError, validate_definition};

pub const METRIC_DEFINITIONS_CREATED: &str = "reporting_definitions_created_total";
pub const METRIC_DEFINITIONS_UPDATED: &str = "reporting_definitions_updated_total";
pub const METRIC_DEFINITIONS_DELETED: &str = "reporting_definitions_deleted_total";
pub const METRIC_VALIDATION_FAILURES: &str = "reporting_validation_failures_total";
pub const METRIC_STORE_ERRORS: &str = "reporting_store_errors_total";

const TIME_CREATED: &str = "time_created";
const LAST_UPDATED: &str = "last_updated";

static SORT_FIELD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_.@-]+$").expect("sort field pattern compiles"));

#[derive(Debug, Error)]
pub enum DefinitionError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("report definition `{id}` not found")]
    NotFound { id: String },
    #[error(transparent)]
    Repo(RepoError),
    #[error("failed to format timestamp: {0}")]
    Timestamp(#[from] time::error::Format),
}

impl From<RepoError> for DefinitionError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound { id } => Self::NotFound { id },
            other => Self::Repo(other),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLimits {
    pub default_size: u32,
    pub max_size: u32,
}

impl Default for PageLimits {
    fn default() -> Self {
        Self {
            default_size: reporting_api_types::DEFAULT_LIST_SIZE,
            max_size: 1000,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ListDefinitionsCommand {
    pub size: Option<u32>,
    pub sort_field: Option<String>,
    pub sort_direction: Option<SortDirection>,
}

/// Validates report definitions, stamps their timestamps and persists them.
///
/// Documents are stored as submitted; validation only gates them.
#[derive(Clone)]
pub struct ReportDefinitionService {
    repo: Arc<dyn ReportDefinitionsRepo>,
    limits: PageLimits,
}

impl ReportDefinitionService {
    pub fn new(repo: Arc<dyn ReportDefinitionsRepo>, limits: PageLimits) -> Self {
        Self { repo, limits }
    }

    pub async fn create(&self, document: &Value) -> Result<String, DefinitionError> {
        let definition = validate(document)?;

        let now = timestamp()?;
        let mut stored = document.clone();
        if let Some(fields) = stored.as_object_mut() {
            fields.insert(TIME_CREATED.into(), Value::String(now.clone()));
            fields.insert(LAST_UPDATED.into(), Value::String(now));
        }

        let id = self
            .repo
            .create_definition(&stored)
            .await
            .map_err(store_failure)?;

        counter!(METRIC_DEFINITIONS_CREATED).increment(1);
        info!(
            target = "reporting::definitions",
            id = %id,
            report_name = %definition.report_name,
            report_source = %definition.report_params.source(),
            delivery = ?definition.delivery_channel(),
            trigger = ?definition.trigger_type(),
            schedule = ?definition.schedule_type(),
            "report definition created"
        );
        Ok(id)
    }

    pub async fn list(
        &self,
        command: ListDefinitionsCommand,
    ) -> Result<DefinitionPage, DefinitionError> {
        let size = command
            .size
            .unwrap_or(self.limits.default_size)
            .min(self.limits.max_size);

        let sort = match command.sort_field {
            Some(field) => {
                if !SORT_FIELD.is_match(&field) {
                    return Err(ValidationError::new(
                        "sortField",
                        format!("value [{field}] is not a sortable field name"),
                    )
                    .into());
                }
                Some(SortSpec {
                    field,
                    direction: command.sort_direction.unwrap_or(SortDirection::Desc),
                })
            }
            None => None,
        };

        self.repo
            .list_definitions(&ListDefinitionsParams { size, sort })
            .await
            .map_err(store_failure)
    }

    pub async fn get(&self, id: &str) -> Result<StoredDefinition, DefinitionError> {
        self.repo
            .find_definition(id)
            .await
            .map_err(store_failure)?
            .ok_or_else(|| DefinitionError::NotFound { id: id.to_string() })
    }

    /// Replace an existing definition. `time_created` is carried over from the
    /// stored document and `last_updated` is refreshed.
    pub async fn update(&self, id: &str, document: &Value) -> Result<(), DefinitionError> {
        let definition = validate(document)?;
        let existing = self.get(id).await?;

        let now = timestamp()?;
        let created = existing
            .document
            .get(TIME_CREATED)
            .cloned()
            .unwrap_or_else(|| Value::String(now.clone()));

        let mut stored = document.clone();
        if let Some(fields) = stored.as_object_mut() {
            fields.insert(TIME_CREATED.into(), created);
            fields.insert(LAST_UPDATED.into(), Value::String(now));
        }

        self.repo
            .replace_definition(id, &stored)
            .await
            .map_err(store_failure)?;

        counter!(METRIC_DEFINITIONS_UPDATED).increment(1);
        info!(
            target = "reporting::definitions",
            id = %id,
            report_name = %definition.report_name,
            delivery = ?definition.delivery_channel(),
            schedule = ?definition.schedule_type(),
            "report definition updated"
        );
        Ok(())
    }

    pub async fn delete(&self, id: &str) -> Result<(), DefinitionError> {
        self.repo
            .delete_definition(id)
            .await
            .map_err(store_failure)?;

        counter!(METRIC_DEFINITIONS_DELETED).increment(1);
        info!(
            target = "reporting::definitions",
            id = %id,
            "report definition deleted"
        );
        Ok(())
    }
}

fn validate(document: &Value) -> Result<crate::domain::ReportDefinition, DefinitionError> {
    validate_definition(document).map_err(|err| {
        counter!(METRIC_VALIDATION_FAILURES).increment(1);
        warn!(
            target = "reporting::definitions",
            path = %err.path,
            reason = %err.reason,
            "report definition rejected"
        );
        DefinitionError::from(err)
    })
}

fn store_failure(err: RepoError) -> DefinitionError {
    if !matches!(err, RepoError::NotFound { .. }) {
        counter!(METRIC_STORE_ERRORS).increment(1);
    }
    DefinitionError::from(err)
}

fn timestamp() -> Result<String, time::error::Format> {
    OffsetDateTime::now_utc().format(&Rfc3339)
}
