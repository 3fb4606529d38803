#![deny(clippy::all, clippy::pedantic)]

use reporting_api_types::{API_PREFIX, ApiErrorBody};
use reqwest::{Client, Method, Response, Url};
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::args::Cli;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("server URL is required (use --url or REPORTING_URL)")]
    MissingUrl,
    #[error("failed to read input file {path}: {source}")]
    InputFile {
        path: String,
        source: std::io::Error,
    },
    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server error: {0}")]
    Server(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

#[derive(Clone, Debug)]
pub struct Ctx {
    pub client: Client,
    pub base: Url,
}

impl Ctx {
    pub fn new(base: &str) -> Result<Self, CliError> {
        let base = Url::parse(base)?;
        if base.cannot_be_a_base() {
            return Err(CliError::InvalidInput(format!("`{base}` cannot be a base URL")));
        }
        let client = Client::builder().user_agent(Self::user_agent()).build()?;
        Ok(Self { client, base })
    }

    pub fn user_agent() -> &'static str {
        concat!("reporting-cli/", env!("CARGO_PKG_VERSION"))
    }

    /// Route URL under the API prefix; each segment is percent-encoded.
    pub fn url(&self, segments: &[&str]) -> Result<Url, CliError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|()| CliError::InvalidInput(format!("`{}` cannot be a base URL", self.base)))?
            .pop_if_empty()
            .extend(API_PREFIX.split('/').filter(|segment| !segment.is_empty()))
            .extend(segments);
        Ok(url)
    }

    pub async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        segments: &[&str],
        query: Option<&[(&str, String)]>,
        body: Option<serde_json::Value>,
    ) -> Result<T, CliError> {
        let mut url = self.url(segments)?;
        if let Some(q) = query {
            let mut qp = url.query_pairs_mut();
            for (k, v) in q {
                qp.append_pair(k, v);
            }
        }

        let mut req = self.client.request(method, url);
        if let Some(b) = body {
            req = req.json(&b);
        }

        let resp = req.send().await?;
        Self::handle(resp).await
    }

    pub async fn request_no_body(&self, method: Method, segments: &[&str]) -> Result<(), CliError> {
        let url = self.url(segments)?;
        let resp = self.client.request(method, url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(server_error(status, &text));
        }
        Ok(())
    }

    async fn handle<T: DeserializeOwned>(resp: Response) -> Result<T, CliError> {
        let status = resp.status();
        let bytes = resp.bytes().await?;
        if !status.is_success() {
            let text = String::from_utf8_lossy(&bytes).into_owned();
            return Err(server_error(status, &text));
        }
        let val = serde_json::from_slice(&bytes)
            .map_err(|e| CliError::Server(format!("failed to parse body: {e}")))?;
        Ok(val)
    }
}

/// Prefer the API's structured error body; fall back to the raw text.
fn server_error(status: reqwest::StatusCode, text: &str) -> CliError {
    match serde_json::from_str::<ApiErrorBody>(text) {
        Ok(body) => {
            let hint = body
                .error
                .hint
                .map(|hint| format!(" ({hint})"))
                .unwrap_or_default();
            CliError::Server(format!(
                "status {status}: {} [{}]{hint}",
                body.error.message, body.error.code
            ))
        }
        Err(_) => CliError::Server(format!("status {status} body {text}")),
    }
}

pub fn build_ctx_from_cli(cli: &Cli) -> Result<Ctx, CliError> {
    let url = cli.url.clone().ok_or(CliError::MissingUrl)?;
    Ctx::new(&url)
}
