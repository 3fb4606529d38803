use async_trait::async_trait;
use reqwest::{Method, StatusCode};
use serde_json::{Map, Value, json};

use crate::application::repos::{
    DefinitionPage, ListDefinitionsParams, RepoError, ReportDefinitionsRepo, StoredDefinition,
};

use super::ElasticsearchRepositories;
use super::util::{map_transport_error, read_json};

const REFRESH: (&str, &str) = ("refresh", "wait_for");

#[async_trait]
impl ReportDefinitionsRepo for ElasticsearchRepositories {
    async fn create_definition(&self, document: &Value) -> Result<String, RepoError> {
        let url = self.url(&[self.index.as_str(), "_doc"])?;
        let response = self
            .request(Method::POST, url)
            .query(&[REFRESH])
            .json(document)
            .send()
            .await
            .map_err(map_transport_error)?;

        let body = read_json(response).await?;
        body.get("_id")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| RepoError::Decode("index response is missing `_id`".into()))
    }

    async fn list_definitions(
        &self,
        params: &ListDefinitionsParams,
    ) -> Result<DefinitionPage, RepoError> {
        let url = self.url(&[self.index.as_str(), "_search"])?;
        let response = self
            .request(Method::POST, url)
            .json(&search_body(params))
            .send()
            .await
            .map_err(map_transport_error)?;

        parse_search_response(&read_json(response).await?)
    }

    async fn find_definition(&self, id: &str) -> Result<Option<StoredDefinition>, RepoError> {
        let url = self.url(&[self.index.as_str(), "_doc", id])?;
        let response = self
            .request(Method::GET, url)
            .send()
            .await
            .map_err(map_transport_error)?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let body = read_json(response).await?;
        if body.get("found").and_then(Value::as_bool) == Some(false) {
            return Ok(None);
        }
        hit_to_stored(&body).map(Some)
    }

    async fn replace_definition(&self, id: &str, document: &Value) -> Result<(), RepoError> {
        let url = self.url(&[self.index.as_str(), "_doc", id])?;

        let exists = self
            .request(Method::HEAD, url.clone())
            .send()
            .await
            .map_err(map_transport_error)?;
        match exists.status() {
            status if status.is_success() => {}
            StatusCode::NOT_FOUND => return Err(RepoError::not_found(id)),
            status => {
                return Err(RepoError::store(
                    status.as_u16(),
                    format!("unexpected status while checking document `{id}`"),
                ));
            }
        }

        let response = self
            .request(Method::PUT, url)
            .query(&[REFRESH])
            .json(document)
            .send()
            .await
            .map_err(map_transport_error)?;
        read_json(response).await.map(|_| ())
    }

    async fn delete_definition(&self, id: &str) -> Result<(), RepoError> {
        let url = self.url(&[self.index.as_str(), "_doc", id])?;
        let response = self
            .request(Method::DELETE, url)
            .query(&[REFRESH])
            .send()
            .await
            .map_err(map_transport_error)?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(RepoError::not_found(id));
        }
        read_json(response).await.map(|_| ())
    }
}

fn search_body(params: &ListDefinitionsParams) -> Value {
    let mut body = Map::new();
    body.insert("size".into(), json!(params.size));
    body.insert("track_total_hits".into(), json!(true));
    body.insert("query".into(), json!({ "match_all": {} }));
    if let Some(sort) = &params.sort {
        let mut clause = Map::new();
        clause.insert(
            sort.field.clone(),
            json!({ "order": sort.direction.as_str(), "unmapped_type": "keyword" }),
        );
        body.insert("sort".into(), json!([Value::Object(clause)]));
    }
    Value::Object(body)
}

fn parse_search_response(body: &Value) -> Result<DefinitionPage, RepoError> {
    let hits = body
        .get("hits")
        .ok_or_else(|| RepoError::Decode("search response is missing `hits`".into()))?;

    // Older clusters report a bare number, newer ones `{ "value": n, "relation": .. }`.
    let total = match hits.get("total") {
        Some(Value::Number(number)) => number.as_u64(),
        Some(total) => total.get("value").and_then(Value::as_u64),
        None => None,
    }
    .ok_or_else(|| RepoError::Decode("search response is missing `hits.total`".into()))?;

    let items = hits
        .get("hits")
        .and_then(Value::as_array)
        .map(|entries| entries.iter().map(hit_to_stored).collect::<Result<Vec<_>, _>>())
        .unwrap_or_else(|| Ok(Vec::new()))?;

    Ok(DefinitionPage { total, items })
}

fn hit_to_stored(hit: &Value) -> Result<StoredDefinition, RepoError> {
    let id = hit
        .get("_id")
        .and_then(Value::as_str)
        .ok_or_else(|| RepoError::Decode("document is missing `_id`".into()))?;
    let document = hit
        .get("_source")
        .cloned()
        .ok_or_else(|| RepoError::Decode(format!("document `{id}` is missing `_source`")))?;
    Ok(StoredDefinition {
        id: id.to_string(),
        document,
    })
}

#[cfg(test)]
mod tests {
    use reporting_api_types::SortDirection;

    use super::*;
    use crate::application::repos::SortSpec;

    #[test]
    fn search_body_includes_sort_when_requested() {
        let body = search_body(&ListDefinitionsParams {
            size: 25,
            sort: Some(SortSpec {
                field: "last_updated".into(),
                direction: SortDirection::Asc,
            }),
        });
        assert_eq!(body["size"], 25);
        assert_eq!(body["sort"][0]["last_updated"]["order"], "asc");
    }

    #[test]
    fn search_body_omits_sort_by_default() {
        let body = search_body(&ListDefinitionsParams {
            size: 100,
            sort: None,
        });
        assert!(body.get("sort").is_none());
        assert_eq!(body["track_total_hits"], true);
    }

    #[test]
    fn parses_object_and_numeric_totals() {
        let modern = json!({
            "hits": {
                "total": { "value": 1, "relation": "eq" },
                "hits": [{ "_id": "a", "_source": { "report_name": "Daily" } }]
            }
        });
        let page = parse_search_response(&modern).expect("page");
        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].id, "a");
        assert_eq!(page.items[0].document["report_name"], "Daily");

        let legacy = json!({ "hits": { "total": 0, "hits": [] } });
        assert_eq!(parse_search_response(&legacy).expect("page").total, 0);
    }

    #[test]
    fn rejects_malformed_search_responses() {
        assert!(matches!(
            parse_search_response(&json!({ "took": 1 })),
            Err(RepoError::Decode(_))
        ));
    }
}
