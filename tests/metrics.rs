use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use metrics_util::debugging::{DebugValue, DebuggingRecorder};
use reporting::application::definitions::{
    METRIC_DEFINITIONS_CREATED, METRIC_DEFINITIONS_DELETED, METRIC_DEFINITIONS_UPDATED,
    METRIC_STORE_ERRORS, METRIC_VALIDATION_FAILURES, PageLimits, ReportDefinitionService,
};
use reporting::application::repos::{
    DefinitionPage, ListDefinitionsParams, RepoError, ReportDefinitionsRepo, StoredDefinition,
};
use serde_json::{Value, json};
use tokio::sync::Mutex;

#[derive(Default)]
struct InMemoryDefinitions {
    docs: Mutex<BTreeMap<String, Value>>,
}

#[async_trait]
impl ReportDefinitionsRepo for InMemoryDefinitions {
    async fn create_definition(&self, document: &Value) -> Result<String, RepoError> {
        let mut docs = self.docs.lock().await;
        let id = format!("doc-{}", docs.len());
        docs.insert(id.clone(), document.clone());
        Ok(id)
    }

    async fn list_definitions(
        &self,
        _params: &ListDefinitionsParams,
    ) -> Result<DefinitionPage, RepoError> {
        Err(RepoError::store(503, "no shard available"))
    }

    async fn find_definition(&self, id: &str) -> Result<Option<StoredDefinition>, RepoError> {
        Ok(self.docs.lock().await.get(id).map(|document| StoredDefinition {
            id: id.to_string(),
            document: document.clone(),
        }))
    }

    async fn replace_definition(&self, id: &str, document: &Value) -> Result<(), RepoError> {
        self.docs
            .lock()
            .await
            .insert(id.to_string(), document.clone());
        Ok(())
    }

    async fn delete_definition(&self, id: &str) -> Result<(), RepoError> {
        match self.docs.lock().await.remove(id) {
            Some(_) => Ok(()),
            None => Err(RepoError::not_found(id)),
        }
    }
}

fn on_demand_visualization() -> Value {
    json!({
        "report_name": "Top_sellers",
        "report_source": "Visualization",
        "report_params": {
            "url": "http://kibana.local/app/visualize#/edit/1",
            "report_format": "png"
        },
        "trigger": {
            "trigger_type": "Schedule",
            "trigger_params": { "schedule_type": "Now" }
        }
    })
}

#[tokio::test]
async fn definition_lifecycle_emits_expected_counters() {
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();
    recorder
        .install()
        .expect("debug metrics recorder should install in this test process");

    let service = ReportDefinitionService::new(
        Arc::new(InMemoryDefinitions::default()),
        PageLimits::default(),
    );

    let id = service
        .create(&on_demand_visualization())
        .await
        .expect("created");
    service
        .update(&id, &on_demand_visualization())
        .await
        .expect("updated");

    let mut invalid = on_demand_visualization();
    invalid["report_params"]["report_format"] = json!("csv");
    service.create(&invalid).await.expect_err("rejected");

    service.list(Default::default()).await.expect_err("store error");
    service.delete(&id).await.expect("deleted");
    service.delete(&id).await.expect_err("already deleted");

    let counters: HashMap<String, u64> = snapshotter
        .snapshot()
        .into_vec()
        .into_iter()
        .filter_map(|(composite_key, _, _, value)| match value {
            DebugValue::Counter(count) => Some((composite_key.key().name().to_string(), count)),
            _ => None,
        })
        .collect();

    let expected = [
        (METRIC_DEFINITIONS_CREATED, 1),
        (METRIC_DEFINITIONS_UPDATED, 1),
        (METRIC_DEFINITIONS_DELETED, 1),
        (METRIC_VALIDATION_FAILURES, 1),
        (METRIC_STORE_ERRORS, 1),
    ];

    for (metric, count) in expected {
        assert_eq!(counters.get(metric), Some(&count), "counter {metric}");
    }
}
