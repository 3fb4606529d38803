//! Elasticsearch-backed repository implementations.
//!
//! Every call is a single REST request through one pooled `reqwest::Client`.
//! Failures are not retried: non-success responses become
//! [`RepoError::Store`] carrying the store's status code, and transport
//! failures become [`RepoError::Unavailable`].

mod definitions;
mod saved_objects;
mod util;

use reqwest::{Client, Method, RequestBuilder, StatusCode, Url};
use serde_json::{Value, json};
use tracing::info;

use crate::application::repos::RepoError;
use crate::config::StoreSettings;
use crate::infra::error::InfraError;

#[derive(Debug, Clone)]
struct Credentials {
    username: String,
    password: Option<String>,
}

#[derive(Clone)]
pub struct ElasticsearchRepositories {
    client: Client,
    base: Url,
    index: String,
    saved_objects_index: String,
    credentials: Option<Credentials>,
}

impl ElasticsearchRepositories {
    pub fn new(
        client: Client,
        base: Url,
        index: impl Into<String>,
        saved_objects_index: impl Into<String>,
    ) -> Self {
        Self {
            client,
            base,
            index: index.into(),
            saved_objects_index: saved_objects_index.into(),
            credentials: None,
        }
    }

    pub fn with_basic_auth(mut self, username: impl Into<String>, password: Option<String>) -> Self {
        self.credentials = Some(Credentials {
            username: username.into(),
            password,
        });
        self
    }

    /// Build the pooled client described by the store settings.
    pub fn connect(settings: &StoreSettings) -> Result<Self, InfraError> {
        let client = Client::builder()
            .timeout(settings.timeout)
            .user_agent(concat!("reporting/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|err| InfraError::store(format!("failed to build http client: {err}")))?;

        let repositories = Self::new(
            client,
            settings.url.clone(),
            settings.index.clone(),
            settings.saved_objects_index.clone(),
        );

        Ok(match settings.username.as_ref() {
            Some(username) => repositories.with_basic_auth(username.clone(), settings.password.clone()),
            None => repositories,
        })
    }

    pub fn index(&self) -> &str {
        &self.index
    }

    /// Create the definitions index with its mapping when it does not exist yet.
    pub async fn ensure_index(&self) -> Result<(), RepoError> {
        let url = self.url(&[self.index.as_str()])?;
        let response = self
            .request(Method::HEAD, url.clone())
            .send()
            .await
            .map_err(util::map_transport_error)?;

        match response.status() {
            status if status.is_success() => return Ok(()),
            StatusCode::NOT_FOUND => {}
            status => {
                return Err(RepoError::store(
                    status.as_u16(),
                    format!("unexpected status while checking index `{}`", self.index),
                ));
            }
        }

        let response = self
            .request(Method::PUT, url)
            .json(&index_mapping())
            .send()
            .await
            .map_err(util::map_transport_error)?;
        util::read_json(response).await?;

        info!(
            target = "reporting::store",
            index = %self.index,
            "created report definitions index"
        );
        Ok(())
    }

    fn url(&self, segments: &[&str]) -> Result<Url, RepoError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| RepoError::Unavailable(format!("store url `{}` cannot be a base", self.base)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let builder = self.client.request(method, url);
        match &self.credentials {
            Some(credentials) => {
                builder.basic_auth(&credentials.username, credentials.password.as_deref())
            }
            None => builder,
        }
    }
}

fn index_mapping() -> Value {
    json!({
        "mappings": {
            "properties": {
                "report_name": { "type": "keyword" },
                "report_source": { "type": "keyword" },
                "time_created": { "type": "date" },
                "last_updated": { "type": "date" }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn repositories(base: &str) -> ElasticsearchRepositories {
        ElasticsearchRepositories::new(
            Client::new(),
            Url::parse(base).expect("valid base"),
            "report_config",
            ".kibana",
        )
    }

    #[test]
    fn url_appends_encoded_segments() {
        let repos = repositories("http://localhost:9200");
        let url = repos
            .url(&["report_config", "_doc", "a/b c"])
            .expect("url");
        assert_eq!(url.as_str(), "http://localhost:9200/report_config/_doc/a%2Fb%20c");
    }

    #[test]
    fn url_keeps_base_path_prefix() {
        let repos = repositories("http://proxy.local/es/");
        let url = repos.url(&["report_config", "_search"]).expect("url");
        assert_eq!(url.as_str(), "http://proxy.local/es/report_config/_search");
    }
}
