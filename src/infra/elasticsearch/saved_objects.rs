use async_trait::async_trait;
use reqwest::Method;
use serde_json::Value;

use crate::application::repos::{RepoError, SavedObjectsRepo, StoreHealthRepo};

use super::ElasticsearchRepositories;
use super::util::{map_transport_error, read_json};

#[async_trait]
impl SavedObjectsRepo for ElasticsearchRepositories {
    async fn search_saved_objects(&self, object_type: &str) -> Result<Value, RepoError> {
        let url = self.url(&[self.saved_objects_index.as_str(), "_search"])?;
        let query = format!("type:{object_type}");
        let response = self
            .request(Method::GET, url)
            .query(&[("q", query.as_str())])
            .send()
            .await
            .map_err(map_transport_error)?;

        read_json(response).await
    }
}

#[async_trait]
impl StoreHealthRepo for ElasticsearchRepositories {
    async fn ping(&self) -> Result<(), RepoError> {
        let url = self.url(&[])?;
        let response = self
            .request(Method::GET, url)
            .send()
            .await
            .map_err(map_transport_error)?;

        read_json(response).await.map(|_| ())
    }
}
