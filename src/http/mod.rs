//! HTTP transport: request values, the middleware chain and the client.

pub mod authenticator;
pub mod pipeline;
pub mod request;
pub mod session_guard;

use std::sync::Arc;

use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::api::api_url;
use crate::config::{ApiConfig, ApiPaths};
use crate::error::{ClientError, ClientResult};

pub use authenticator::BearerAuthenticator;
pub use pipeline::{Pipeline, RequestMiddleware, ResponseMiddleware, ResponseOutcome};
pub use request::{ApiRequest, FilePart, RequestBody};
pub use session_guard::SessionGuard;

/// Shared HTTP client; every call goes through the middleware pipeline.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    api: Arc<ApiConfig>,
    pipeline: Arc<Pipeline>,
}

impl ApiClient {
    pub fn new(api: &ApiConfig, pipeline: Pipeline) -> ClientResult<Self> {
        let host = api.host.trim();
        if !host.is_empty() {
            url::Url::parse(host)
                .map_err(|e| ClientError::Config(format!("invalid API host '{host}': {e}")))?;
        }

        let http = reqwest::Client::builder()
            .cookie_store(true)
            .build()
            .map_err(|e| ClientError::Config(e.to_string()))?;

        Ok(Self {
            http,
            api: Arc::new(api.clone()),
            pipeline: Arc::new(pipeline),
        })
    }

    pub fn paths(&self) -> &ApiPaths {
        &self.api.paths
    }

    pub fn url(&self, parts: &[&str]) -> String {
        api_url(&self.api.host, &self.api.base_path, parts)
    }

    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    /// Send a request and return the raw response body of a 2xx.
    pub async fn execute(&self, request: ApiRequest) -> ClientResult<String> {
        let request = self.pipeline.apply_request(request);
        debug!(
            "{} {} (bearer: {})",
            request.method,
            request.url,
            if request.authorization().is_some() { "yes" } else { "no" }
        );

        match self.send(&request).await {
            Ok(body) => Ok(body),
            Err(err) => Err(self.pipeline.handle_error(&request, err).await),
        }
    }

    pub async fn send_json<T: DeserializeOwned>(&self, request: ApiRequest) -> ClientResult<T> {
        let body = self.execute(request).await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Like `send_json`, with an empty or `null` body read as an empty list.
    pub async fn send_list<T: DeserializeOwned>(&self, request: ApiRequest) -> ClientResult<Vec<T>> {
        let body = self.execute(request).await?;
        let body = body.trim();
        if body.is_empty() || body == "null" {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_str(body)?)
    }

    /// For calls whose response body is not used.
    pub async fn send_unit(&self, request: ApiRequest) -> ClientResult<()> {
        self.execute(request).await.map(|_| ())
    }

    async fn send(&self, request: &ApiRequest) -> ClientResult<String> {
        let mut builder = self
            .http
            .request(request.method.clone(), &request.url)
            .headers(request.headers.clone());

        builder = match &request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.json(value),
            RequestBody::File(file) => {
                let part = Part::bytes(file.bytes.clone())
                    .file_name(file.file_name.clone())
                    .mime_str(&file.mime)
                    .map_err(|e| ClientError::Transport(e.to_string()))?;
                builder.multipart(Form::new().part(file.field.clone(), part))
            }
        };

        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            debug!("{} {} failed with {}", request.method, request.url, status);
            return Err(ClientError::Http {
                status: status.as_u16(),
                body,
            });
        }
        Ok(body)
    }
}
