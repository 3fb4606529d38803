use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use http_body_util::BodyExt;
use reporting::application::dashboards::DashboardService;
use reporting::application::definitions::{PageLimits, ReportDefinitionService};
use reporting::application::repos::{
    DefinitionPage, ListDefinitionsParams, RepoError, ReportDefinitionsRepo, SavedObjectsRepo,
    StoreHealthRepo, StoredDefinition,
};
use reporting::infra::http::{ApiState, build_router};
use reporting_api_types::{ReportConfigHit, ReportConfigListResponse};
use serde_json::{Value, json};
use tokio::sync::Mutex;
use tower::ServiceExt;

#[derive(Default)]
struct InMemoryStore {
    docs: Mutex<BTreeMap<String, Value>>,
    next_id: AtomicUsize,
    down: AtomicBool,
}

impl InMemoryStore {
    fn check(&self) -> Result<(), RepoError> {
        if self.down.load(Ordering::SeqCst) {
            return Err(RepoError::Unavailable("connection refused".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl ReportDefinitionsRepo for InMemoryStore {
    async fn create_definition(&self, document: &Value) -> Result<String, RepoError> {
        self.check()?;
        let id = format!("doc-{}", self.next_id.fetch_add(1, Ordering::SeqCst));
        self.docs.lock().await.insert(id.clone(), document.clone());
        Ok(id)
    }

    async fn list_definitions(
        &self,
        params: &ListDefinitionsParams,
    ) -> Result<DefinitionPage, RepoError> {
        self.check()?;
        let docs = self.docs.lock().await;
        Ok(DefinitionPage {
            total: docs.len() as u64,
            items: docs
                .iter()
                .take(params.size as usize)
                .map(|(id, document)| StoredDefinition {
                    id: id.clone(),
                    document: document.clone(),
                })
                .collect(),
        })
    }

    async fn find_definition(&self, id: &str) -> Result<Option<StoredDefinition>, RepoError> {
        self.check()?;
        Ok(self.docs.lock().await.get(id).map(|document| StoredDefinition {
            id: id.to_string(),
            document: document.clone(),
        }))
    }

    async fn replace_definition(&self, id: &str, document: &Value) -> Result<(), RepoError> {
        self.check()?;
        match self.docs.lock().await.get_mut(id) {
            Some(existing) => {
                *existing = document.clone();
                Ok(())
            }
            None => Err(RepoError::not_found(id)),
        }
    }

    async fn delete_definition(&self, id: &str) -> Result<(), RepoError> {
        self.check()?;
        match self.docs.lock().await.remove(id) {
            Some(_) => Ok(()),
            None => Err(RepoError::not_found(id)),
        }
    }
}

#[async_trait]
impl SavedObjectsRepo for InMemoryStore {
    async fn search_saved_objects(&self, object_type: &str) -> Result<Value, RepoError> {
        self.check()?;
        Ok(json!({
            "hits": {
                "total": 1,
                "hits": [{ "_id": format!("{object_type}:sales"), "_source": { "type": object_type } }]
            }
        }))
    }
}

#[async_trait]
impl StoreHealthRepo for InMemoryStore {
    async fn ping(&self) -> Result<(), RepoError> {
        self.check()
    }
}

fn app() -> (Router, Arc<InMemoryStore>) {
    let store = Arc::new(InMemoryStore::default());
    let state = ApiState {
        definitions: Arc::new(ReportDefinitionService::new(
            store.clone(),
            PageLimits::default(),
        )),
        dashboards: Arc::new(DashboardService::new(store.clone())),
        store_health: store.clone(),
    };
    (build_router(state), store)
}

fn daily_dashboard() -> Value {
    json!({
        "report_name": "Daily",
        "report_source": "Dashboard",
        "report_params": {
            "url": "http://x",
            "window_width": 1200,
            "window_height": 800,
            "report_format": "pdf"
        },
        "delivery": {
            "channel": "Email",
            "delivery_params": {
                "subject": "s",
                "body": "b",
                "recipients": ["a@b.com"]
            }
        },
        "trigger": {
            "trigger_type": "Schedule",
            "trigger_params": {
                "schedule_type": "Cron Based",
                "schedule": {
                    "cron": { "expression": "0 17 * * *", "time_zone": "PST" }
                }
            }
        }
    })
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<&Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(value) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };
    let request = builder.body(body).expect("request should build");
    let response = app
        .clone()
        .oneshot(request)
        .await
        .expect("router should respond");

    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body should collect")
        .to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("body should be json")
    };
    (status, value)
}

fn without_timestamps(mut document: Value) -> Value {
    if let Some(fields) = document.as_object_mut() {
        fields.remove("time_created");
        fields.remove("last_updated");
    }
    document
}

#[tokio::test]
async fn create_then_get_round_trips_with_timestamps() {
    let (app, _) = app();

    let (status, id) = send(
        &app,
        Method::POST,
        "/api/reporting/reportConfig",
        Some(&daily_dashboard()),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let id = id.as_str().expect("id is a json string").to_string();

    let (status, body) = send(
        &app,
        Method::GET,
        &format!("/api/reporting/reportConfigs/{id}"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let hit: ReportConfigHit = serde_json::from_value(body).expect("hit shape");
    assert_eq!(hit.id, id);
    assert!(hit.source["time_created"].is_string());
    assert!(hit.source["last_updated"].is_string());
    assert_eq!(without_timestamps(hit.source), daily_dashboard());
}

#[tokio::test]
async fn invalid_definition_is_rejected_with_reason() {
    let (app, store) = app();
    let mut doc = daily_dashboard();
    doc["delivery"]["delivery_params"]["recipients"] = json!(["not-an-address"]);

    let (status, body) = send(&app, Method::POST, "/api/reporting/reportConfig", Some(&doc)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "invalid_input");
    assert_eq!(body["error"]["message"], "Invalid report definition");
    let hint = body["error"]["hint"].as_str().expect("hint");
    assert!(hint.contains("recipients"), "{hint}");
    assert!(store.docs.lock().await.is_empty());
}

#[tokio::test]
async fn malformed_json_is_a_bad_request() {
    let (app, _) = app();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/reporting/reportConfig")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{ nope"))
        .expect("request should build");

    let response = app.oneshot(request).await.expect("router should respond");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn list_returns_total_and_hits() {
    let (app, _) = app();
    for _ in 0..3 {
        send(
            &app,
            Method::POST,
            "/api/reporting/reportConfig",
            Some(&daily_dashboard()),
        )
        .await;
    }

    let (status, body) = send(
        &app,
        Method::GET,
        "/api/reporting/reportConfigs?size=2&sortField=last_updated&sortDirection=asc",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let page: ReportConfigListResponse = serde_json::from_value(body).expect("list shape");
    assert_eq!(page.total, 3);
    assert_eq!(page.data.len(), 2);
    assert_eq!(page.data[0].source["report_name"], "Daily");
}

#[tokio::test]
async fn list_rejects_unknown_sort_direction() {
    let (app, _) = app();
    let (status, body) = send(
        &app,
        Method::GET,
        "/api/reporting/reportConfigs?sortDirection=sideways",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "bad_request");
}

#[tokio::test]
async fn update_replaces_document() {
    let (app, _) = app();
    let (_, id) = send(
        &app,
        Method::POST,
        "/api/reporting/reportConfig",
        Some(&daily_dashboard()),
    )
    .await;
    let id = id.as_str().expect("id").to_string();

    let mut changed = daily_dashboard();
    changed["report_params"]["report_format"] = json!("png");
    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/api/reporting/reportConfigs/{id}"),
        Some(&changed),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!(id));

    let (_, body) = send(
        &app,
        Method::GET,
        &format!("/api/reporting/reportConfigs/{id}"),
        None,
    )
    .await;
    assert_eq!(body["_source"]["report_params"]["report_format"], "png");
}

#[tokio::test]
async fn update_of_missing_definition_is_not_found() {
    let (app, _) = app();
    let (status, body) = send(
        &app,
        Method::PUT,
        "/api/reporting/reportConfigs/missing",
        Some(&daily_dashboard()),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "not_found");
}

#[tokio::test]
async fn delete_removes_and_then_reports_not_found() {
    let (app, _) = app();
    let (_, id) = send(
        &app,
        Method::POST,
        "/api/reporting/reportConfig",
        Some(&daily_dashboard()),
    )
    .await;
    let uri = format!("/api/reporting/reportConfigs/{}", id.as_str().expect("id"));

    let (status, _) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "not_found");
}

#[tokio::test]
async fn dashboards_are_passed_through() {
    let (app, _) = app();
    let (status, body) = send(&app, Method::GET, "/api/reporting/getDashboards", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["hits"]["hits"][0]["_source"]["type"], "dashboard");
}

#[tokio::test]
async fn unreachable_store_maps_to_bad_gateway_and_unhealthy() {
    let (app, store) = app();

    let (status, _) = send(&app, Method::GET, "/api/reporting/health", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    store.down.store(true, Ordering::SeqCst);

    let (status, body) = send(&app, Method::GET, "/api/reporting/reportConfigs", None).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"]["code"], "store_unavailable");

    let (status, _) = send(&app, Method::GET, "/api/reporting/health", None).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}
