use std::sync::Arc;

use serde_json::Value;

use crate::application::repos::{RepoError, SavedObjectsRepo};

const DASHBOARD_TYPE: &str = "dashboard";

/// Read-only access to dashboards stored as saved objects.
#[derive(Clone)]
pub struct DashboardService {
    saved_objects: Arc<dyn SavedObjectsRepo>,
}

impl DashboardService {
    pub fn new(saved_objects: Arc<dyn SavedObjectsRepo>) -> Self {
        Self { saved_objects }
    }

    /// The store's search response for every saved dashboard, unmodified.
    pub async fn list_dashboards(&self) -> Result<Value, RepoError> {
        self.saved_objects.search_saved_objects(DASHBOARD_TYPE).await
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use serde_json::json;
    use tokio::sync::Mutex;

    use super::*;

    #[derive(Default)]
    struct RecordingRepo {
        requested: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl SavedObjectsRepo for RecordingRepo {
        async fn search_saved_objects(&self, object_type: &str) -> Result<Value, RepoError> {
            self.requested.lock().await.push(object_type.to_string());
            Ok(json!({ "hits": { "total": 0, "hits": [] } }))
        }
    }

    #[tokio::test]
    async fn searches_for_dashboard_objects() {
        let repo = Arc::new(RecordingRepo::default());
        let service = DashboardService::new(repo.clone());

        let response = service.list_dashboards().await.expect("search");

        assert_eq!(response["hits"]["total"], 0);
        assert_eq!(*repo.requested.lock().await, vec!["dashboard".to_string()]);
    }
}
