//! Repository traits describing persistence adapters.

use async_trait::async_trait;
use reporting_api_types::SortDirection;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("document `{id}` not found")]
    NotFound { id: String },
    #[error("store responded with status {status}: {reason}")]
    Store { status: u16, reason: String },
    #[error("store unreachable: {0}")]
    Unavailable(String),
    #[error("unexpected store response: {0}")]
    Decode(String),
}

impl RepoError {
    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound { id: id.into() }
    }

    pub fn store(status: u16, reason: impl Into<String>) -> Self {
        Self::Store {
            status,
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    pub field: String,
    pub direction: SortDirection,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListDefinitionsParams {
    pub size: u32,
    pub sort: Option<SortSpec>,
}

/// A persisted document together with its store-assigned identifier.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredDefinition {
    pub id: String,
    pub document: Value,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DefinitionPage {
    pub total: u64,
    pub items: Vec<StoredDefinition>,
}

#[async_trait]
pub trait ReportDefinitionsRepo: Send + Sync {
    /// Index a new document and return the generated identifier.
    async fn create_definition(&self, document: &Value) -> Result<String, RepoError>;

    async fn list_definitions(
        &self,
        params: &ListDefinitionsParams,
    ) -> Result<DefinitionPage, RepoError>;

    async fn find_definition(&self, id: &str) -> Result<Option<StoredDefinition>, RepoError>;

    /// Overwrite an existing document. Fails with [`RepoError::NotFound`] when absent.
    async fn replace_definition(&self, id: &str, document: &Value) -> Result<(), RepoError>;

    async fn delete_definition(&self, id: &str) -> Result<(), RepoError>;
}

#[async_trait]
pub trait SavedObjectsRepo: Send + Sync {
    /// Raw search response for saved objects of the given type.
    async fn search_saved_objects(&self, object_type: &str) -> Result<Value, RepoError>;
}

#[async_trait]
pub trait StoreHealthRepo: Send + Sync {
    async fn ping(&self) -> Result<(), RepoError>;
}
